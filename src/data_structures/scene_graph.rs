//! Scene graph and hierarchical scene organization.
//!
//! Provides the [`SceneNode`] trait and the three node types of the showcase:
//! [`ContainerNode`] groups children, [`MeshNode`] draws a shared geometry with
//! its own material and [`FlatNode`] holds unlit line or point vertices (the
//! floor grid and the particle cloud). Every node owns its children, so every
//! primitive has exactly one parent.

use std::sync::Arc;

use cgmath::Matrix4;

use crate::data_structures::{
    model::{FlatVertex, Geometry, Material},
    transform::Transform,
};

pub trait SceneNode {
    fn name(&self) -> &str;

    fn transform(&self) -> &Transform;

    fn transform_mut(&mut self) -> &mut Transform;

    fn children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children_mut().push(child);
    }

    fn as_mesh(&self) -> Option<&MeshNode> {
        None
    }

    fn as_mesh_mut(&mut self) -> Option<&mut MeshNode> {
        None
    }

    fn as_flat(&self) -> Option<&FlatNode> {
        None
    }

    fn as_flat_mut(&mut self) -> Option<&mut FlatNode> {
        None
    }
}

/// Visits `node` and then all of its descendants, depth first.
pub fn traverse(node: &dyn SceneNode, visit: &mut dyn FnMut(&dyn SceneNode)) {
    visit(node);
    for child in node.children() {
        traverse(child.as_ref(), visit);
    }
}

pub fn traverse_mut(node: &mut dyn SceneNode, visit: &mut dyn FnMut(&mut dyn SceneNode)) {
    visit(&mut *node);
    for child in node.children_mut().iter_mut() {
        traverse_mut(child.as_mut(), visit);
    }
}

/// Visits every node together with its world matrix.
pub fn traverse_world(
    node: &dyn SceneNode,
    parent: Matrix4<f32>,
    visit: &mut dyn FnMut(&dyn SceneNode, Matrix4<f32>),
) {
    let world = parent * node.transform().to_matrix();
    visit(node, world);
    for child in node.children() {
        traverse_world(child.as_ref(), world, visit);
    }
}

/// A group without visuals of its own.
pub struct ContainerNode {
    name: String,
    pub transform: Transform,
    pub children: Vec<Box<dyn SceneNode>>,
}

impl ContainerNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            children: Vec::new(),
        }
    }
}

impl SceneNode for ContainerNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }
}

pub struct MeshNode {
    name: String,
    pub transform: Transform,
    pub geometry: Arc<Geometry>,
    pub material: Material,
    pub children: Vec<Box<dyn SceneNode>>,
}

impl MeshNode {
    pub fn new(name: impl Into<String>, geometry: Arc<Geometry>, material: Material) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            geometry,
            material,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

impl SceneNode for MeshNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn as_mesh(&self) -> Option<&MeshNode> {
        Some(self)
    }

    fn as_mesh_mut(&mut self) -> Option<&mut MeshNode> {
        Some(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlatPrimitive {
    Lines,
    Points,
}

/// Unlit vertices in local space, drawn as a line list or a point list.
///
/// `needs_update` marks vertex data that changed since the last upload.
pub struct FlatNode {
    name: String,
    pub transform: Transform,
    pub primitive: FlatPrimitive,
    pub vertices: Vec<FlatVertex>,
    pub needs_update: bool,
    pub children: Vec<Box<dyn SceneNode>>,
}

impl FlatNode {
    pub fn new(name: impl Into<String>, primitive: FlatPrimitive, vertices: Vec<FlatVertex>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            primitive,
            vertices,
            needs_update: true,
            children: Vec::new(),
        }
    }
}

impl SceneNode for FlatNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn as_flat(&self) -> Option<&FlatNode> {
        Some(self)
    }

    fn as_flat_mut(&mut self) -> Option<&mut FlatNode> {
        Some(self)
    }
}
