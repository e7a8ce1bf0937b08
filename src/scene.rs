//! Static scene construction: camera, lights, background, fog, floor grid and
//! the floating decorative cubes.
//!
//! [`Scene`] owns every node. The focal model lives in its own slot so that
//! at most one model exists at any time.

use std::{f32::consts::TAU, sync::Arc};

use cgmath::Point3;
use rand::Rng;

use crate::{
    camera::PerspectiveCamera,
    config::Variant,
    data_structures::{
        geometry,
        model::Material,
        scene_graph::{FlatNode, FlatPrimitive, MeshNode, SceneNode, traverse, traverse_mut},
        transform::Transform,
    },
    palette::Color,
};

pub const BACKGROUND: Color = Color::from_hex(0x05060a);
pub const DECORATION_COUNT: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    Ambient,
    /// Shines from `position` towards the origin.
    Directional { casts_shadow: bool },
    /// `range` is the distance at which the light fades to zero; `0.0` never fades.
    Point { range: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
    pub position: Point3<f32>,
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
            position: Point3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn directional(color: Color, intensity: f32, position: Point3<f32>, casts_shadow: bool) -> Self {
        Self {
            kind: LightKind::Directional { casts_shadow },
            color,
            intensity,
            position,
        }
    }

    pub fn point(color: Color, intensity: f32, range: f32, position: Point3<f32>) -> Self {
        Self {
            kind: LightKind::Point { range },
            color,
            intensity,
            position,
        }
    }

    pub fn is_ambient(&self) -> bool {
        matches!(self.kind, LightKind::Ambient)
    }
}

/// Linear distance fog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

pub struct Scene {
    pub background: Color,
    pub fog: Option<Fog>,
    pub lights: Vec<Light>,
    pub nodes: Vec<Box<dyn SceneNode>>,
    model: Option<Box<dyn SceneNode>>,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            fog: None,
            lights: Vec::new(),
            nodes: Vec::new(),
            model: None,
        }
    }

    pub fn add(&mut self, node: Box<dyn SceneNode>) {
        self.nodes.push(node);
    }

    pub fn model(&self) -> Option<&dyn SceneNode> {
        self.model.as_deref()
    }

    pub fn model_mut(&mut self) -> Option<&mut (dyn SceneNode + 'static)> {
        self.model.as_deref_mut()
    }

    /// Installs `model` as the current model and hands back the one it replaced.
    pub fn replace_model(&mut self, model: Box<dyn SceneNode>) -> Option<Box<dyn SceneNode>> {
        let previous = self.model.take();
        self.model = Some(model);
        previous
    }

    pub fn remove_model(&mut self) -> Option<Box<dyn SceneNode>> {
        self.model.take()
    }

    /// All root nodes: the static ones followed by the model.
    pub fn roots(&self) -> impl Iterator<Item = &(dyn SceneNode + 'static)> {
        self.nodes
            .iter()
            .map(|node| node.as_ref())
            .chain(self.model.as_deref())
    }

    pub fn traverse(&self, visit: &mut dyn FnMut(&dyn SceneNode)) {
        for root in self.roots() {
            traverse(root, visit);
        }
    }

    pub fn traverse_mut(&mut self, visit: &mut dyn FnMut(&mut dyn SceneNode)) {
        for node in self.nodes.iter_mut() {
            traverse_mut(node.as_mut(), visit);
        }
        if let Some(model) = self.model.as_mut() {
            traverse_mut(model.as_mut(), visit);
        }
    }

    /// Number of mesh nodes anywhere in the scene.
    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |node| {
            if node.as_mesh().is_some() {
                count += 1;
            }
        });
        count
    }
}

pub fn initial_camera_position(variant: Variant) -> Point3<f32> {
    match variant {
        Variant::Knot => Point3::new(0.0, 0.0, 5.0),
        Variant::Tower => Point3::new(0.0, 5.0, 15.0),
    }
}

pub fn build_camera(variant: Variant, width: u32, height: u32) -> PerspectiveCamera {
    PerspectiveCamera::new(initial_camera_position(variant), width, height)
}

/// Builds everything except the focal model.
pub fn build_scene(variant: Variant, rng: &mut impl Rng) -> Scene {
    let mut scene = Scene::new(BACKGROUND);
    match variant {
        Variant::Knot => {
            scene.lights = vec![
                Light::ambient(Color::from_hex(0x404040), 0.6),
                Light::directional(Color::from_hex(0x00eaff), 1.0, Point3::new(5.0, 5.0, 5.0), false),
                Light::point(Color::from_hex(0xffdb00), 0.5, 100.0, Point3::new(-5.0, -5.0, 5.0)),
            ];
        }
        Variant::Tower => {
            scene.fog = Some(Fog {
                color: BACKGROUND,
                near: 15.0,
                far: 60.0,
            });
            scene.lights = vec![
                Light::ambient(Color::from_hex(0x404040), 0.5),
                Light::directional(Color::WHITE, 1.0, Point3::new(5.0, 10.0, 7.0), true),
                Light::point(Color::from_hex(0x00eaff), 1.0, 50.0, Point3::new(-10.0, 5.0, -5.0)),
                Light::point(Color::from_hex(0xff00aa), 1.0, 50.0, Point3::new(10.0, 5.0, 5.0)),
            ];
            scene.add(Box::new(FlatNode::new(
                "grid",
                FlatPrimitive::Lines,
                geometry::grid_lines(40.0, 40, Color::from_hex(0x888888), Color::from_hex(0x444444)),
            )));
            for node in decorations(rng) {
                scene.add(node);
            }
        }
    }
    scene
}

/// Randomly placed, rotated and sized cubes with a random emissive hue.
fn decorations(rng: &mut impl Rng) -> Vec<Box<dyn SceneNode>> {
    let cube = Arc::new(geometry::cuboid(1.0, 1.0, 1.0));
    (0..DECORATION_COUNT)
        .map(|i| {
            let transform = Transform::at(
                rng.gen_range(-20.0..20.0),
                rng.gen_range(1.0..15.0),
                rng.gen_range(-20.0..20.0),
            )
            .with_rotation(
                rng.gen_range(0.0..TAU),
                rng.gen_range(0.0..TAU),
                rng.gen_range(0.0..TAU),
            )
            .with_uniform_scale(rng.gen_range(0.3..1.5));
            let emissive = Color::from_hsl(rng.gen_range(0.0..1.0), 1.0, 0.5);
            let material = Material::phong(Color::from_hex(0x222222), 30.0).with_emissive(emissive, 0.4);
            Box::new(MeshNode::new(format!("cube-{i}"), cube.clone(), material).with_transform(transform))
                as Box<dyn SceneNode>
        })
        .collect()
}
