//! Procedural focal models, used whenever no external asset could be loaded.

use std::{f32::consts::{FRAC_PI_2, TAU}, sync::Arc};

use rand::Rng;

use crate::{
    config::Variant,
    data_structures::{
        geometry,
        model::{FlatVertex, GeometryKind, Material},
        scene_graph::{ContainerNode, FlatNode, FlatPrimitive, MeshNode, SceneNode},
        transform::Transform,
    },
    palette::{Color, ColorScheme},
};

pub const ORBIT_RADIUS: f32 = 2.0;
pub const ORBITER_COUNT: usize = 8;
pub const RING_COUNT: usize = 3;
pub const PARTICLE_COUNT: usize = 100;
/// Edge length of the cube the particles are scattered in.
pub const PARTICLE_SPREAD: f32 = 20.0;

pub fn build_model(variant: Variant, scheme: &ColorScheme, rng: &mut impl Rng) -> ContainerNode {
    match variant {
        Variant::Knot => knot_model(),
        Variant::Tower => tower_model(scheme, rng),
    }
}

/// A torus knot followed by eight spheres evenly spaced on a circle.
pub fn knot_model() -> ContainerNode {
    let mut model = ContainerNode::new("model");

    let knot = geometry::torus_knot(1.0, 0.4, 128, 32, 2, 3);
    let knot_material = Material::phong(Color::from_hex(0x00eaff), 100.0).with_specular(Color::WHITE);
    model.add_child(Box::new(MeshNode::new("torus-knot", Arc::new(knot), knot_material)));

    let sphere = Arc::new(geometry::sphere(0.2, 16, 16));
    let sphere_material = Material::phong(Color::from_hex(0xffdb00), 50.0);
    for i in 0..ORBITER_COUNT {
        let angle = i as f32 / ORBITER_COUNT as f32 * TAU;
        let transform = Transform::at(
            angle.cos() * ORBIT_RADIUS,
            angle.sin() * ORBIT_RADIUS,
            angle.sin() * 0.5,
        );
        model.add_child(Box::new(
            MeshNode::new(format!("orbiter-{i}"), sphere.clone(), sphere_material.clone())
                .with_transform(transform),
        ));
    }
    model
}

/// Cylinder base, sphere waist, cone tip, three rings and a particle cloud.
pub fn tower_model(scheme: &ColorScheme, rng: &mut impl Rng) -> ContainerNode {
    let mut model = ContainerNode::new("model");

    let part = |color: Color, emissive: Color| {
        Material::phong(color, 60.0)
            .with_specular(Color::from_hex(0x444444))
            .with_emissive(emissive, 0.25)
    };

    model.add_child(Box::new(
        MeshNode::new(
            "base",
            Arc::new(geometry::cylinder(1.2, 1.6, 3.0, 32)),
            part(Color::from_hex(0x1b1f2a), scheme.primary),
        )
        .with_transform(Transform::at(0.0, 1.5, 0.0)),
    ));
    model.add_child(Box::new(
        MeshNode::new(
            "waist",
            Arc::new(geometry::sphere(1.1, 32, 16)),
            part(Color::from_hex(0x2a3142), scheme.secondary),
        )
        .with_transform(Transform::at(0.0, 4.0, 0.0)),
    ));
    model.add_child(Box::new(
        MeshNode::new(
            "tip",
            Arc::new(geometry::cone(1.0, 2.0, 32)),
            part(Color::from_hex(0x1b1f2a), scheme.accent),
        )
        .with_transform(Transform::at(0.0, 7.0, 0.0)),
    ));

    for i in 0..RING_COUNT {
        let radius = 2.2 + 0.7 * i as f32;
        let height = 2.5 + 1.5 * i as f32;
        let ring = geometry::torus(radius, 0.06, 12, 96);
        // lay the ring flat so its z axis points up
        let transform = Transform::at(0.0, height, 0.0).with_rotation(FRAC_PI_2, 0.0, 0.0);
        model.add_child(Box::new(
            MeshNode::new(format!("ring-{i}"), Arc::new(ring), part(Color::from_hex(0x303848), scheme.pick(rng)))
                .with_transform(transform),
        ));
    }

    model.add_child(Box::new(particle_cloud(rng)));
    model
}

/// Points uniformly scattered in a cube, each with a random fully saturated hue.
pub fn particle_cloud(rng: &mut impl Rng) -> FlatNode {
    let half = PARTICLE_SPREAD / 2.0;
    let vertices = (0..PARTICLE_COUNT)
        .map(|_| {
            let position = [
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
            ];
            let color = Color::from_hsl(rng.gen_range(0.0..1.0), 1.0, 0.7).to_linear();
            FlatVertex { position, color }
        })
        .collect();
    FlatNode::new("particles", FlatPrimitive::Points, vertices)
}

/// Whether `node` is one of the tower's rings.
pub fn is_ring(node: &dyn SceneNode) -> bool {
    node.as_mesh()
        .is_some_and(|mesh| mesh.geometry.kind == GeometryKind::Torus)
}
