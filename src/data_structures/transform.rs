//! Local transforms of scene nodes and their packed GPU form.
//!
//! A node's transform is position, Euler rotation (applied X, then Y, then Z,
//! like most web 3D libraries) and scale. The renderer composes them into
//! world matrices and packs those, together with the material, into
//! [`InstanceRaw`] for instanced draws.

use cgmath::{Matrix, Matrix3, Matrix4, Rad, SquareMatrix, Vector3, Zero};

use crate::data_structures::model::{Material, Vertex};

#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Euler angles in radians.
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Identity transform (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::new()
        }
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    pub fn rotation_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * self.rotation_matrix()
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(position: Vector3<f32>) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }
}

/// Per-instance data stored on the GPU: world matrix, normal matrix and material.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
    /// Linear base color, alpha unused.
    color: [f32; 4],
    /// Linear emissive color premultiplied by its intensity.
    emissive: [f32; 4],
    /// Linear specular color, shininess in `w`.
    specular: [f32; 4],
}

impl InstanceRaw {
    pub fn new(world: Matrix4<f32>, material: &Material) -> Self {
        let [r, g, b] = material.color.to_linear();
        let [er, eg, eb] = material
            .emissive
            .map(|emissive| emissive.to_linear().map(|c| c * material.emissive_intensity))
            .unwrap_or([0.0; 3]);
        let [sr, sg, sb] = material.specular.to_linear();
        Self {
            model: world.into(),
            normal: normal_matrix(&world).into(),
            color: [r, g, b, 1.0],
            emissive: [er, eg, eb, 0.0],
            specular: [sr, sg, sb, material.shininess],
        }
    }
}

/// Inverse transpose of the upper 3x3, which keeps normals perpendicular under
/// non-uniform scale.
fn normal_matrix(world: &Matrix4<f32>) -> Matrix3<f32> {
    let upper = Matrix3::from_cols(
        world.x.truncate(),
        world.y.truncate(),
        world.z.truncate(),
    );
    upper
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or(upper)
}

impl Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        const ATTRIBUTES: [wgpu::VertexAttribute; 10] = wgpu::vertex_attr_array![
            // world matrix, one slot per column
            5 => Float32x4,
            6 => Float32x4,
            7 => Float32x4,
            8 => Float32x4,
            // normal matrix
            9 => Float32x3,
            10 => Float32x3,
            11 => Float32x3,
            12 => Float32x4,
            13 => Float32x4,
            14 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // Advance once per instance instead of once per vertex
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}
