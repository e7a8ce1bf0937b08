use approx::assert_relative_eq;
use floating_forms::{
    Variant,
    animation::{FrameLoop, MODEL_SPIN, PARTICLE_JITTER, RING_SPIN},
    controls::{PointerInput, UiAction},
    data_structures::{model::FlatVertex, scene_graph::SceneNode},
    procedural::{ORBIT_RADIUS, ORBITER_COUNT, RING_COUNT, is_ring},
    scene::Scene,
};
use instant::Duration;

mod common;

use crate::common::test_utils::{DT, Driver, model, model_transforms};

fn ring_spins(scene: &Scene) -> Vec<f32> {
    model(scene)
        .children()
        .iter()
        .filter(|child| is_ring(&***child))
        .map(|ring| ring.transform().rotation.z)
        .collect()
}

fn particles(scene: &Scene) -> Vec<FlatVertex> {
    model(scene)
        .children()
        .iter()
        .find_map(|child| child.as_flat())
        .expect("the tower has a particle cloud")
        .vertices
        .clone()
}

#[test]
fn frame_loop_ticks_only_while_running() {
    let mut frame_loop = FrameLoop::new();
    assert!(!frame_loop.is_running());
    assert_eq!(frame_loop.step(DT), None);

    frame_loop.start();
    let first = frame_loop.step(DT).unwrap();
    let second = frame_loop.step(DT).unwrap();
    assert_eq!(first.index, 0);
    assert_eq!(second.index, 1);
    assert_eq!(second.elapsed, DT * 2);

    // starting a running loop keeps its count
    frame_loop.start();
    assert_eq!(frame_loop.step(DT).unwrap().index, 2);

    frame_loop.stop();
    assert_eq!(frame_loop.step(DT), None);

    frame_loop.start();
    let restarted = frame_loop.step(Duration::from_millis(5)).unwrap();
    assert_eq!(restarted.index, 0);
    assert_eq!(restarted.elapsed, Duration::from_millis(5));
}

#[test]
fn model_spins_a_little_every_frame() {
    let mut driver = Driver::settled(Variant::Knot);
    let before = model(driver.showcase.scene()).transform().rotation.y;
    driver.frames(10);
    let after = model(driver.showcase.scene()).transform().rotation.y;
    assert_relative_eq!(after - before, 10.0 * MODEL_SPIN, epsilon = 1e-5);
}

#[test]
fn knot_orbiters_stay_on_their_circle() {
    let mut driver = Driver::settled(Variant::Knot);
    for _ in 0..200 {
        driver.frames(1);
        let orbiters = &model(driver.showcase.scene()).children()[1..];
        assert_eq!(orbiters.len(), ORBITER_COUNT);
        for orbiter in orbiters {
            let position = orbiter.transform().position;
            let radius = (position.x * position.x + position.y * position.y).sqrt();
            assert_relative_eq!(radius, ORBIT_RADIUS, epsilon = 1e-4);
            assert!(position.z.abs() <= 0.5 + 1e-6);
        }
    }
}

#[test]
fn knot_orbiters_tumble() {
    let mut driver = Driver::settled(Variant::Knot);
    let before = model(driver.showcase.scene()).children()[1].transform().rotation;
    driver.frames(5);
    let after = model(driver.showcase.scene()).children()[1].transform().rotation;
    assert_relative_eq!(after.x - before.x, 0.1, epsilon = 1e-5);
    assert_relative_eq!(after.y - before.y, 0.15, epsilon = 1e-5);
}

#[test]
fn pausing_freezes_the_model_but_not_the_loop() {
    let mut driver = Driver::settled(Variant::Knot);
    driver.showcase.handle_action(UiAction::ToggleAnimation);
    let frozen = model_transforms(driver.showcase.scene());
    let index = driver.frame_loop.step(DT).unwrap().index;

    driver.frames(30);

    assert_eq!(model_transforms(driver.showcase.scene()), frozen);
    assert_eq!(driver.frame_loop.step(DT).unwrap().index, index + 31);

    driver.showcase.handle_action(UiAction::ToggleAnimation);
    driver.frames(1);
    assert_ne!(model_transforms(driver.showcase.scene()), frozen);
}

#[test]
fn camera_keeps_coasting_while_paused() {
    let mut driver = Driver::settled(Variant::Tower);
    driver.showcase.handle_action(UiAction::ToggleAnimation);
    driver.showcase.handle_pointer(PointerInput::Press { x: 400.0, y: 300.0 });
    driver.showcase.handle_pointer(PointerInput::Move { x: 300.0, y: 300.0 });
    driver.showcase.handle_pointer(PointerInput::Release);

    let before = driver.showcase.camera().position;
    driver.frames(5);
    assert_ne!(driver.showcase.camera().position, before);
}

#[test]
fn tower_rings_spin_at_increasing_speeds() {
    let mut driver = Driver::settled(Variant::Tower);
    let before = ring_spins(driver.showcase.scene());
    assert_eq!(before.len(), RING_COUNT);

    driver.frames(1);

    let after = ring_spins(driver.showcase.scene());
    for (k, (before, after)) in before.iter().zip(&after).enumerate() {
        assert_relative_eq!(after - before, RING_SPIN * (k + 1) as f32, epsilon = 1e-5);
    }
}

#[test]
fn tower_particles_jitter_and_request_an_upload() {
    let mut driver = Driver::settled(Variant::Tower);
    if let Some(root) = driver.showcase.scene_mut().model_mut() {
        for child in root.children_mut() {
            if let Some(cloud) = child.as_flat_mut() {
                cloud.needs_update = false;
            }
        }
    }
    let before = particles(driver.showcase.scene());

    driver.frames(1);

    let after = particles(driver.showcase.scene());
    assert_eq!(before.len(), after.len());
    let mut moved = false;
    for (before, after) in before.iter().zip(&after) {
        for axis in 0..3 {
            let delta = (after.position[axis] - before.position[axis]).abs();
            assert!(delta <= PARTICLE_JITTER + 1e-5, "jittered by {delta}");
            moved |= delta > 0.0;
        }
        assert_eq!(after.color, before.color);
    }
    assert!(moved);

    let cloud = model(driver.showcase.scene())
        .children()
        .iter()
        .find_map(|child| child.as_flat())
        .unwrap();
    assert!(cloud.needs_update);
}

#[test]
fn nothing_animates_before_the_model_arrives() {
    let mut driver = Driver::of(Variant::Tower);
    driver.frames(10);
    assert!(driver.showcase.is_loading());
    assert!(driver.showcase.scene().model().is_none());
}
