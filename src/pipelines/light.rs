//! Scene lighting on the GPU: the packed light uniform, its bind groups and
//! the shadow map of the shadow-casting directional light.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3, ortho};
use wgpu::util::DeviceExt;

use crate::{
    camera::OPENGL_TO_WGPU_MATRIX,
    data_structures::texture::DepthTexture,
    scene::{LightKind, Scene},
};

pub const MAX_POINT_LIGHTS: usize = 4;

/// Half extent of the square area covered by the shadow map.
const SHADOW_EXTENT: f32 = 30.0;
/// Distance of the shadow camera from the origin, along the light direction.
const SHADOW_DISTANCE: f32 = 40.0;

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightRaw {
    /// World position, range in `w` (zero never fades).
    position: [f32; 4],
    /// Linear color premultiplied by intensity.
    color: [f32; 4],
}

// Uniforms require 16 byte (4 float) spacing, hence vec4 everywhere.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    shadow_view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    /// Unit vector towards the directional light, `w` is 1 when there is one.
    direction: [f32; 4],
    /// Directional color, `w` is 1 when it casts a shadow.
    directional: [f32; 4],
    fog_color: [f32; 4],
    /// Near, far, enabled flag and the number of point lights.
    fog: [f32; 4],
    points: [PointLightRaw; MAX_POINT_LIGHTS],
}

impl LightUniform {
    pub fn new() -> Self {
        Self {
            shadow_view_proj: Matrix4::identity().into(),
            ambient: [0.0; 4],
            direction: [0.0; 4],
            directional: [0.0; 4],
            fog_color: [0.0; 4],
            fog: [0.0; 4],
            points: [PointLightRaw::default(); MAX_POINT_LIGHTS],
        }
    }

    /// Packs the lights and fog of `scene`. Only the first directional light
    /// is used and point lights beyond [`MAX_POINT_LIGHTS`] are dropped.
    pub fn from_scene(scene: &Scene) -> Self {
        let mut uniform = Self::new();
        let mut points = 0;
        let mut has_directional = false;

        for light in &scene.lights {
            let [r, g, b] = light.color.to_linear().map(|c| c * light.intensity);
            match light.kind {
                LightKind::Ambient => {
                    uniform.ambient[0] += r;
                    uniform.ambient[1] += g;
                    uniform.ambient[2] += b;
                }
                LightKind::Directional { casts_shadow } if !has_directional => {
                    has_directional = true;
                    let towards = light.position.to_vec();
                    let towards = if towards.magnitude2() > 0.0 {
                        towards.normalize()
                    } else {
                        Vector3::unit_y()
                    };
                    uniform.direction = towards.extend(1.0).into();
                    uniform.directional = [r, g, b, if casts_shadow { 1.0 } else { 0.0 }];
                    uniform.shadow_view_proj = shadow_view_proj(towards).into();
                }
                LightKind::Directional { .. } => {
                    log::warn!("Only one directional light is supported, ignoring another one");
                }
                LightKind::Point { range } if points < MAX_POINT_LIGHTS => {
                    uniform.points[points] = PointLightRaw {
                        position: light.position.to_vec().extend(range).into(),
                        color: [r, g, b, 1.0],
                    };
                    points += 1;
                }
                LightKind::Point { .. } => {
                    log::warn!("More than {MAX_POINT_LIGHTS} point lights, ignoring the rest");
                }
            }
        }

        if let Some(fog) = scene.fog {
            let [r, g, b] = fog.color.to_linear();
            uniform.fog_color = [r, g, b, 1.0];
            uniform.fog[0] = fog.near;
            uniform.fog[1] = fog.far;
            uniform.fog[2] = 1.0;
        }
        uniform.fog[3] = points as f32;
        uniform
    }

    pub fn casts_shadow(&self) -> bool {
        self.directional[3] > 0.5
    }
}

impl Default for LightUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Orthographic view-projection looking from the light towards the origin.
fn shadow_view_proj(towards: Vector3<f32>) -> Matrix4<f32> {
    let eye = Point3::from_vec(towards * SHADOW_DISTANCE);
    let up = if towards.cross(Vector3::unit_y()).magnitude2() < 1e-6 {
        Vector3::unit_z()
    } else {
        Vector3::unit_y()
    };
    let view = Matrix4::look_at_rh(eye, Point3::origin(), up);
    let projection = ortho(
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        1.0,
        SHADOW_DISTANCE * 2.0,
    );
    OPENGL_TO_WGPU_MATRIX * projection * view
}

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub shadow_map: DepthTexture,
    /// Uniform, shadow map and comparison sampler, for the lit pass.
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
    /// Uniform only, for the shadow pass which writes the shadow map.
    pub shadow_bind_group: wgpu::BindGroup,
    pub shadow_bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device) -> anyhow::Result<Self> {
        let uniform = LightUniform::new();
        let buffer = mk_buffer(device, uniform);
        let shadow_map = DepthTexture::create_shadow_map(device);
        let sampler = shadow_map
            .sampler
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("the shadow map has no sampler"))?;

        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some("light_bind_group"),
        });

        let shadow_bind_group_layout = mk_shadow_bind_group_layout(device);
        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &shadow_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("shadow_bind_group"),
        });

        Ok(Self {
            uniform,
            buffer,
            shadow_map,
            bind_group,
            bind_group_layout,
            shadow_bind_group,
            shadow_bind_group_layout,
        })
    }

    pub fn update(&mut self, queue: &wgpu::Queue, scene: &Scene) {
        let uniform = LightUniform::from_scene(scene);
        if uniform != self.uniform {
            self.uniform = uniform;
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn uniform_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            uniform_entry(),
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Depth,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                count: None,
            },
        ],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_shadow_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[uniform_entry()],
        label: Some("shadow_bind_group_layout"),
    })
}
