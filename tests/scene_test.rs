use std::f32::consts::TAU;

use approx::assert_relative_eq;
use cgmath::{Deg, InnerSpace, Point3, Vector3};
use floating_forms::{
    Variant,
    data_structures::{
        geometry,
        model::GeometryKind,
        scene_graph::{FlatPrimitive, SceneNode},
    },
    palette::{Color, SCHEMES, next_scheme},
    procedural::{self, ORBIT_RADIUS, ORBITER_COUNT, PARTICLE_COUNT, PARTICLE_SPREAD},
    scene::{self, BACKGROUND, DECORATION_COUNT, LightKind},
};
use rand::{SeedableRng, rngs::StdRng};

mod common;

use crate::common::test_utils::{HEIGHT, WIDTH};

#[test]
fn knot_scene_is_three_lights_on_a_dark_background() {
    let scene = scene::build_scene(Variant::Knot, &mut StdRng::seed_from_u64(1));

    assert_eq!(scene.background.to_hex(), 0x05060a);
    assert!(scene.fog.is_none());
    assert!(scene.nodes.is_empty());
    assert!(scene.model().is_none());

    let kinds: Vec<LightKind> = scene.lights.iter().map(|light| light.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LightKind::Ambient,
            LightKind::Directional { casts_shadow: false },
            LightKind::Point { range: 100.0 },
        ]
    );
    assert_eq!(scene.lights[1].color.to_hex(), 0x00eaff);
    assert_eq!(scene.lights[1].position, Point3::new(5.0, 5.0, 5.0));
    assert_eq!(scene.lights[2].color.to_hex(), 0xffdb00);
    assert_relative_eq!(scene.lights[2].intensity, 0.5);
    assert_eq!(scene.lights[2].position, Point3::new(-5.0, -5.0, 5.0));
}

#[test]
fn tower_scene_has_fog_shadow_grid_and_cubes() {
    let scene = scene::build_scene(Variant::Tower, &mut StdRng::seed_from_u64(1));

    let fog = scene.fog.expect("tower scene is foggy");
    assert_eq!(fog.color, BACKGROUND);
    assert_relative_eq!(fog.near, 15.0);
    assert_relative_eq!(fog.far, 60.0);

    assert_eq!(scene.lights.len(), 4);
    let shadow_casters = scene
        .lights
        .iter()
        .filter(|light| light.kind == LightKind::Directional { casts_shadow: true })
        .count();
    assert_eq!(shadow_casters, 1);
    let points = scene
        .lights
        .iter()
        .filter(|light| matches!(light.kind, LightKind::Point { range } if range == 50.0))
        .count();
    assert_eq!(points, 2);

    let grid = scene.nodes[0].as_flat().expect("the first node is the grid");
    assert_eq!(grid.primitive, FlatPrimitive::Lines);
    assert_eq!(grid.vertices.len(), 41 * 4);

    let cubes = &scene.nodes[1..];
    assert_eq!(cubes.len(), DECORATION_COUNT);
    for cube in cubes {
        let mesh = cube.as_mesh().expect("decorations are meshes");
        assert_eq!(mesh.geometry.kind, GeometryKind::Cuboid);
        assert!(mesh.material.emissive.is_some());

        let transform = cube.transform();
        assert!((-20.0..20.0).contains(&transform.position.x));
        assert!((1.0..15.0).contains(&transform.position.y));
        assert!((-20.0..20.0).contains(&transform.position.z));
        assert!((0.3..1.5).contains(&transform.scale.x));
        assert_eq!(transform.scale.x, transform.scale.y);
    }
}

fn min_max(channels: [f32; 3]) -> (f32, f32) {
    channels
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), &c| (lo.min(c), hi.max(c)))
}

#[test]
fn decorations_glow_in_fully_saturated_hues() {
    for seed in 0..5 {
        let scene = scene::build_scene(Variant::Tower, &mut StdRng::seed_from_u64(seed));
        for cube in &scene.nodes[1..] {
            let emissive = cube.as_mesh().and_then(|mesh| mesh.material.emissive).unwrap();
            // saturation 1, lightness 0.5: one channel at 1, one at 0
            let (lo, hi) = min_max([emissive.r, emissive.g, emissive.b]);
            assert_relative_eq!(hi, 1.0, epsilon = 1e-5);
            assert_relative_eq!(lo, 0.0, epsilon = 1e-5);
        }
    }
}

#[test]
fn particles_fill_a_cube_around_the_origin() {
    let half = PARTICLE_SPREAD / 2.0;
    // saturation 1, lightness 0.7 spans 0.4..=1.0 in sRGB
    let darkest = Color::new(0.4, 0.4, 0.4).to_linear()[0];
    for seed in 0..5 {
        let cloud = procedural::particle_cloud(&mut StdRng::seed_from_u64(seed));
        assert_eq!(cloud.primitive, FlatPrimitive::Points);
        assert_eq!(cloud.vertices.len(), PARTICLE_COUNT);
        for vertex in &cloud.vertices {
            assert!(vertex.position.iter().all(|p| (-half..half).contains(p)), "{:?}", vertex.position);
            let (lo, hi) = min_max(vertex.color);
            assert_relative_eq!(hi, 1.0, epsilon = 1e-4);
            assert_relative_eq!(lo, darkest, epsilon = 1e-4);
        }
    }
}

#[test]
fn knot_orbiters_start_evenly_spaced() {
    let model = procedural::knot_model();
    let orbiters = &model.children()[1..];
    assert_eq!(orbiters.len(), ORBITER_COUNT);
    for (i, orbiter) in orbiters.iter().enumerate() {
        let angle = i as f32 / ORBITER_COUNT as f32 * TAU;
        let position = orbiter.transform().position;
        assert_relative_eq!(position.x, angle.cos() * ORBIT_RADIUS, epsilon = 1e-5);
        assert_relative_eq!(position.y, angle.sin() * ORBIT_RADIUS, epsilon = 1e-5);
        assert_relative_eq!(position.z, angle.sin() * 0.5, epsilon = 1e-5);
    }
}

#[test]
fn decorations_share_one_geometry() {
    let scene = scene::build_scene(Variant::Tower, &mut StdRng::seed_from_u64(3));
    let ids: Vec<_> = scene.nodes[1..]
        .iter()
        .filter_map(|node| node.as_mesh())
        .map(|mesh| mesh.geometry.id())
        .collect();
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn same_seed_builds_the_same_scene() {
    let positions = |seed| {
        scene::build_scene(Variant::Tower, &mut StdRng::seed_from_u64(seed))
            .nodes
            .iter()
            .map(|node| node.transform().position)
            .collect::<Vec<Vector3<f32>>>()
    };
    assert_eq!(positions(42), positions(42));
    assert_ne!(positions(42), positions(43));
}

#[test]
fn cameras_start_where_each_variant_expects() {
    let knot = scene::build_camera(Variant::Knot, WIDTH, HEIGHT);
    assert_eq!(knot.position, Point3::new(0.0, 0.0, 5.0));
    assert_eq!(knot.target, Point3::new(0.0, 0.0, 0.0));
    assert_eq!(knot.fovy, Deg(75.0));
    assert_relative_eq!(knot.znear, 0.1);
    assert_relative_eq!(knot.zfar, 1000.0);
    assert_relative_eq!(knot.aspect, WIDTH as f32 / HEIGHT as f32);

    let tower = scene::build_camera(Variant::Tower, WIDTH, HEIGHT);
    assert_eq!(tower.position, Point3::new(0.0, 5.0, 15.0));
}

#[test]
fn camera_ignores_zero_sized_viewport() {
    let mut camera = scene::build_camera(Variant::Knot, WIDTH, HEIGHT);
    camera.resize(0, 300);
    assert_relative_eq!(camera.aspect, WIDTH as f32 / HEIGHT as f32);
    camera.resize(1024, 512);
    assert_relative_eq!(camera.aspect, 2.0);
}

#[test]
fn torus_knot_has_a_vertex_per_segment_crossing() {
    let knot = geometry::torus_knot(1.0, 0.4, 128, 32, 2, 3);
    assert_eq!(knot.vertices.len(), 129 * 33);
    assert_eq!(knot.triangle_count(), 128 * 32 * 2);
    assert!(knot.indices.iter().all(|&i| (i as usize) < knot.vertices.len()));
}

#[test]
fn sphere_vertices_lie_on_its_surface() {
    let sphere = geometry::sphere(0.2, 16, 16);
    for vertex in &sphere.vertices {
        let position = Vector3::from(vertex.position);
        assert_relative_eq!(position.magnitude(), 0.2, epsilon = 1e-5);
        assert_relative_eq!(Vector3::from(vertex.normal).magnitude(), 1.0, epsilon = 1e-5);
    }
}

#[test]
fn cuboid_edges_are_listed_once() {
    let cube = geometry::cuboid(1.0, 1.0, 1.0);
    assert_eq!(cube.vertices.len(), 24);
    assert_eq!(cube.triangle_count(), 12);
    // four sides and one diagonal per face
    assert_eq!(cube.edges.len(), 6 * 5 * 2);
}

#[test]
fn cone_is_a_cylinder_without_top() {
    let cone = geometry::cone(1.0, 2.0, 32);
    assert_eq!(cone.kind, GeometryKind::Cone);
    let top = cone
        .vertices
        .iter()
        .map(|vertex| vertex.position[1])
        .fold(f32::MIN, f32::max);
    assert_relative_eq!(top, 1.0);
}

#[test]
fn colors_convert_between_hex_and_hsl() {
    assert_eq!(Color::from_hex(0x00eaff).to_hex(), 0x00eaff);
    assert_eq!(Color::from_hsl(0.0, 1.0, 0.5).to_hex(), 0xff0000);
    assert_eq!(Color::from_hsl(1.0 / 3.0, 1.0, 0.5).to_hex(), 0x00ff00);
    assert_eq!(Color::from_hsl(0.5, 0.0, 0.5), Color::new(0.5, 0.5, 0.5));

    let [r, g, b] = Color::WHITE.to_linear();
    assert_relative_eq!(r, 1.0, epsilon = 1e-5);
    assert_relative_eq!(g, 1.0, epsilon = 1e-5);
    assert_relative_eq!(b, 1.0, epsilon = 1e-5);
}

#[test]
fn scheme_index_wraps_around() {
    let mut index = 0;
    for _ in 0..SCHEMES.len() {
        index = next_scheme(index);
    }
    assert_eq!(index, 0);
    assert_eq!(next_scheme(SCHEMES.len() - 1), 0);
}
