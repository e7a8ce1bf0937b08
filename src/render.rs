//! Scene rendering and pipeline batching.
//!
//! Every frame the scene graph is flattened into batches: meshes sharing a
//! geometry and a fill mode become one [`Instanced`] draw, line and point nodes
//! become [`Flat`] draws. Geometry buffers are uploaded once per
//! [`GeometryId`]; instance and flat vertex buffers are reused and only grown
//! when their content no longer fits.
//!
//! A frame consists of an optional shadow pass (only when the scene has a
//! shadow-casting directional light) followed by the main pass.

use std::{
    collections::{BTreeMap, HashMap},
    iter,
    sync::Arc,
};

use cgmath::{Matrix4, SquareMatrix, Vector4};
use wgpu::util::DeviceExt;

use crate::{
    camera::PerspectiveCamera,
    context::Context,
    data_structures::{
        model::{FlatVertex, Geometry, GeometryId},
        scene_graph::{FlatPrimitive, SceneNode, traverse_world},
        transform::InstanceRaw,
    },
    scene::Scene,
};

/// Index and vertex buffers of one uploaded geometry.
#[derive(Debug)]
pub struct GpuGeometry {
    pub vertices: wgpu::Buffer,
    pub triangles: wgpu::Buffer,
    pub triangle_indices: u32,
    pub edges: wgpu::Buffer,
    pub edge_indices: u32,
}

impl GpuGeometry {
    pub fn new(device: &wgpu::Device, geometry: &Geometry) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Geometry Vertex Buffer"),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let triangles = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Geometry Index Buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let edges = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Geometry Edge Buffer"),
            contents: bytemuck::cast_slice(&geometry.edges),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertices,
            triangles,
            triangle_indices: geometry.indices.len() as u32,
            edges,
            edge_indices: geometry.edges.len() as u32,
        }
    }
}

/// A vertex buffer that is rewritten in place and grows on demand.
#[derive(Debug)]
struct GrowableBuffer {
    buffer: wgpu::Buffer,
    capacity: wgpu::BufferAddress,
    label: &'static str,
}

impl GrowableBuffer {
    fn new(device: &wgpu::Device, label: &'static str, size: wgpu::BufferAddress) -> Self {
        let capacity = size.max(256).next_power_of_two();
        Self {
            buffer: mk_vertex_buffer(device, label, capacity),
            capacity,
            label,
        }
    }

    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        let size = bytes.len() as wgpu::BufferAddress;
        if size > self.capacity {
            self.capacity = size.next_power_of_two();
            self.buffer = mk_vertex_buffer(device, self.label, self.capacity);
        }
        queue.write_buffer(&self.buffer, 0, bytes);
    }
}

fn mk_vertex_buffer(
    device: &wgpu::Device,
    label: &'static str,
    size: wgpu::BufferAddress,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Batch key: one draw per geometry and fill mode.
type BatchKey = (GeometryId, bool);

/// Data for one instanced draw of a shared geometry.
pub struct Instanced<'a> {
    pub geometry: &'a GpuGeometry,
    pub instance: &'a wgpu::Buffer,
    pub amount: u32,
    pub wireframe: bool,
}

/// Data for one line or point list draw.
pub struct Flat<'a> {
    pub vertex: &'a wgpu::Buffer,
    pub amount: u32,
    pub primitive: FlatPrimitive,
}

#[derive(Debug)]
struct FlatEntry {
    buffer: GrowableBuffer,
    amount: u32,
    primitive: FlatPrimitive,
    world: [[f32; 4]; 4],
    seen: bool,
}

/// Per-frame collection of what the scene wants drawn.
#[derive(Default)]
struct Frame {
    batches: BTreeMap<BatchKey, Vec<InstanceRaw>>,
    new_geometries: Vec<Arc<Geometry>>,
    flats: Vec<FlatDraw>,
}

struct FlatDraw {
    name: String,
    primitive: FlatPrimitive,
    world: Matrix4<f32>,
    vertices: Option<Vec<FlatVertex>>,
}

/// Owns the GPU copies of the scene's geometry and draws the scene.
#[derive(Debug, Default)]
pub struct Renderer {
    geometries: HashMap<GeometryId, GpuGeometry>,
    instances: HashMap<BatchKey, GrowableBuffer>,
    batch_sizes: BTreeMap<BatchKey, u32>,
    flats: BTreeMap<String, FlatEntry>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of geometries uploaded so far.
    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn render(
        &mut self,
        ctx: &mut Context,
        scene: &mut Scene,
        camera: &PerspectiveCamera,
    ) -> Result<(), wgpu::SurfaceError> {
        // Rendering requires the surface to be configured
        if !ctx.is_surface_configured() {
            return Ok(());
        }

        ctx.update_uniforms(camera, scene);
        self.prepare(ctx, scene);

        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let (basics, flats) = self.draws();

        if ctx.light.uniform.casts_shadow() {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.light.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            shadow_pass.set_pipeline(&ctx.pipelines.shadow);
            shadow_pass.set_bind_group(0, &ctx.light.shadow_bind_group, &[]);
            for instanced in &basics {
                shadow_pass.set_vertex_buffer(0, instanced.geometry.vertices.slice(..));
                shadow_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                shadow_pass
                    .set_index_buffer(instanced.geometry.triangles.slice(..), wgpu::IndexFormat::Uint32);
                shadow_pass.draw_indexed(
                    0..instanced.geometry.triangle_indices,
                    0,
                    0..instanced.amount,
                );
            }
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_bind_group(0, &ctx.camera.bind_group, &[]);
            render_pass.set_bind_group(1, &ctx.light.bind_group, &[]);

            for instanced in &basics {
                let (pipeline, indices, count) = if instanced.wireframe {
                    (
                        &ctx.pipelines.wireframe,
                        &instanced.geometry.edges,
                        instanced.geometry.edge_indices,
                    )
                } else {
                    (
                        &ctx.pipelines.mesh,
                        &instanced.geometry.triangles,
                        instanced.geometry.triangle_indices,
                    )
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_vertex_buffer(0, instanced.geometry.vertices.slice(..));
                render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..count, 0, 0..instanced.amount);
            }

            for flat in &flats {
                let pipeline = match flat.primitive {
                    FlatPrimitive::Lines => &ctx.pipelines.lines,
                    FlatPrimitive::Points => &ctx.pipelines.points,
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_vertex_buffer(0, flat.vertex.slice(..));
                render_pass.draw(0..flat.amount, 0..1);
            }
        }

        ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Collects the scene into batches and uploads whatever changed.
    fn prepare(&mut self, ctx: &Context, scene: &mut Scene) {
        let frame = self.collect(scene);

        for geometry in frame.new_geometries {
            log::debug!("Uploading {:?} geometry {:?}", geometry.kind, geometry.id());
            self.geometries
                .entry(geometry.id())
                .or_insert_with(|| GpuGeometry::new(&ctx.device, &geometry));
        }

        self.batch_sizes.clear();
        for (key, instances) in &frame.batches {
            let bytes: &[u8] = bytemuck::cast_slice(instances);
            self.instances
                .entry(*key)
                .or_insert_with(|| GrowableBuffer::new(&ctx.device, "Instance Buffer", bytes.len() as u64))
                .write(&ctx.device, &ctx.queue, bytes);
            self.batch_sizes.insert(*key, instances.len() as u32);
        }
        // geometry of removed meshes is kept; instance buffers of empty batches are not
        self.instances.retain(|key, _| frame.batches.contains_key(key));

        for entry in self.flats.values_mut() {
            entry.seen = false;
        }
        for draw in frame.flats {
            let world: [[f32; 4]; 4] = draw.world.into();
            match (self.flats.get_mut(&draw.name), draw.vertices) {
                (Some(entry), Some(vertices)) => {
                    entry.buffer.write(&ctx.device, &ctx.queue, bytemuck::cast_slice(&vertices));
                    entry.amount = vertices.len() as u32;
                    entry.primitive = draw.primitive;
                    entry.world = world;
                    entry.seen = true;
                }
                (Some(entry), None) => entry.seen = true,
                (None, Some(vertices)) => {
                    let bytes: &[u8] = bytemuck::cast_slice(&vertices);
                    let mut buffer = GrowableBuffer::new(&ctx.device, "Flat Vertex Buffer", bytes.len() as u64);
                    buffer.write(&ctx.device, &ctx.queue, bytes);
                    self.flats.insert(
                        draw.name,
                        FlatEntry {
                            buffer,
                            amount: vertices.len() as u32,
                            primitive: draw.primitive,
                            world,
                            seen: true,
                        },
                    );
                }
                (None, None) => log::warn!("Flat node {:?} has no uploaded vertices", draw.name),
            }
        }
        self.flats.retain(|_, entry| entry.seen);

        scene.traverse_mut(&mut |node| {
            if let Some(flat) = node.as_flat_mut() {
                flat.needs_update = false;
            }
        });
    }

    fn collect(&self, scene: &Scene) -> Frame {
        let mut frame = Frame::default();
        for root in scene.roots() {
            traverse_world(root, Matrix4::identity(), &mut |node, world| {
                if let Some(mesh) = node.as_mesh() {
                    let id = mesh.geometry.id();
                    if !self.geometries.contains_key(&id)
                        && !frame.new_geometries.iter().any(|g| g.id() == id)
                    {
                        frame.new_geometries.push(mesh.geometry.clone());
                    }
                    frame
                        .batches
                        .entry((id, mesh.material.wireframe))
                        .or_default()
                        .push(InstanceRaw::new(world, &mesh.material));
                }
                if let Some(flat) = node.as_flat() {
                    let world_raw: [[f32; 4]; 4] = world.into();
                    let stale = self
                        .flats
                        .get(flat.name())
                        .is_none_or(|entry| entry.world != world_raw);
                    let vertices = (flat.needs_update || stale)
                        .then(|| to_world(&flat.vertices, world));
                    frame.flats.push(FlatDraw {
                        name: flat.name().to_string(),
                        primitive: flat.primitive,
                        world,
                        vertices,
                    });
                }
            });
        }
        frame
    }

    fn draws(&self) -> (Vec<Instanced<'_>>, Vec<Flat<'_>>) {
        let basics = self
            .batch_sizes
            .iter()
            .filter(|(_, amount)| **amount > 0)
            .filter_map(|(key, amount)| {
                Some(Instanced {
                    geometry: self.geometries.get(&key.0)?,
                    instance: &self.instances.get(key)?.buffer,
                    amount: *amount,
                    wireframe: key.1,
                })
            })
            .collect();
        let flats = self
            .flats
            .values()
            .filter(|entry| entry.amount > 0)
            .map(|entry| Flat {
                vertex: &entry.buffer.buffer,
                amount: entry.amount,
                primitive: entry.primitive,
            })
            .collect();
        (basics, flats)
    }
}

/// Flat nodes are drawn in world space, so their vertices are transformed here.
pub fn to_world(vertices: &[FlatVertex], world: Matrix4<f32>) -> Vec<FlatVertex> {
    vertices
        .iter()
        .map(|vertex| {
            let [x, y, z] = vertex.position;
            let p = world * Vector4::new(x, y, z, 1.0);
            FlatVertex {
                position: [p.x, p.y, p.z],
                color: vertex.color,
            }
        })
        .collect()
}
