//! Render pipelines.
//!
//! - `basic` builds the lit mesh, wireframe, shadow and flat pipelines
//! - `light` holds the light uniform, its bind groups and the shadow map

pub mod basic;
pub mod light;

use crate::pipelines::basic::{mk_flat_pipeline, mk_mesh_pipeline, mk_shadow_pipeline};

#[derive(Debug)]
pub struct Pipelines {
    pub mesh: wgpu::RenderPipeline,
    pub wireframe: wgpu::RenderPipeline,
    pub shadow: wgpu::RenderPipeline,
    pub lines: wgpu::RenderPipeline,
    pub points: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        light: &light::LightResources,
    ) -> Self {
        let lit = |topology| {
            mk_mesh_pipeline(
                device,
                config,
                camera_bind_group_layout,
                &light.bind_group_layout,
                topology,
            )
        };
        let flat = |topology| {
            mk_flat_pipeline(
                device,
                config,
                camera_bind_group_layout,
                &light.bind_group_layout,
                topology,
            )
        };
        Self {
            mesh: lit(wgpu::PrimitiveTopology::TriangleList),
            wireframe: lit(wgpu::PrimitiveTopology::LineList),
            shadow: mk_shadow_pipeline(device, &light.shadow_bind_group_layout),
            lines: flat(wgpu::PrimitiveTopology::LineList),
            points: flat(wgpu::PrimitiveTopology::PointList),
        }
    }
}
