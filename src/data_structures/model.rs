//! Mesh geometry, materials and the vertex layouts the pipelines consume.

use std::{
    collections::HashSet,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::palette::Color;

/// Describes how a vertex type is laid out in a GPU buffer.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex for MeshVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Unlit, per-vertex colored vertex used by grids and point clouds.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FlatVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex for FlatVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FlatVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Which generator produced a geometry. The animation loop uses it to find
/// the rings of the tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    TorusKnot,
    Sphere,
    Cylinder,
    Cone,
    Torus,
    Cuboid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u64);

static NEXT_GEOMETRY_ID: AtomicU64 = AtomicU64::new(0);

/// Indexed triangle geometry plus the unique edge list used for wireframes.
///
/// Geometries are immutable once built and shared between meshes through an
/// `Arc`, so the renderer uploads each one once, keyed by its [`GeometryId`].
#[derive(Debug)]
pub struct Geometry {
    id: GeometryId,
    pub kind: GeometryKind,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    pub edges: Vec<u32>,
}

impl Geometry {
    pub fn new(kind: GeometryKind, vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        let edges = edges_of(&indices);
        Self {
            id: GeometryId(NEXT_GEOMETRY_ID.fetch_add(1, Ordering::Relaxed)),
            kind,
            vertices,
            indices,
            edges,
        }
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Collects every triangle edge once, as a line list.
fn edges_of(indices: &[u32]) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for triangle in indices.chunks_exact(3) {
        for (a, b) in [
            (triangle[0], triangle[1]),
            (triangle[1], triangle[2]),
            (triangle[2], triangle[0]),
        ] {
            let key = (a.min(b), a.max(b));
            if seen.insert(key) {
                edges.push(key.0);
                edges.push(key.1);
            }
        }
    }
    edges
}

/// Phong-style surface description.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
    /// `None` for materials without an emissive term; only those with one are
    /// retinted when the color scheme changes.
    pub emissive: Option<Color>,
    pub emissive_intensity: f32,
    pub wireframe: bool,
}

impl Material {
    pub fn phong(color: Color, shininess: f32) -> Self {
        Self {
            color,
            specular: Color::from_hex(0x111111),
            shininess,
            emissive: None,
            emissive_intensity: 1.0,
            wireframe: false,
        }
    }

    pub fn with_specular(mut self, specular: Color) -> Self {
        self.specular = specular;
        self
    }

    pub fn with_emissive(mut self, emissive: Color, intensity: f32) -> Self {
        self.emissive = Some(emissive);
        self.emissive_intensity = intensity;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::phong(Color::WHITE, 30.0)
    }
}
