//! The per-frame loop and the time-dependent transform updates.

use std::f32::consts::TAU;

use instant::Duration;
use rand::Rng;

use crate::{
    config::Variant,
    data_structures::scene_graph::SceneNode,
    procedural::{ORBIT_RADIUS, is_ring},
    scene::Scene,
};

/// One step of a running [`FrameLoop`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Zero for the first frame after [`FrameLoop::start`].
    pub index: u64,
    pub dt: Duration,
    /// Time accumulated since the loop was started.
    pub elapsed: Duration,
}

/// Start/stop handle around the host's redraw callback.
///
/// The host asks for a tick every time it is about to draw; a stopped loop
/// yields nothing, which is how it is cancelled.
#[derive(Debug, Default)]
pub struct FrameLoop {
    running: bool,
    index: u64,
    elapsed: Duration,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.index = 0;
            self.elapsed = Duration::ZERO;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn step(&mut self, dt: Duration) -> Option<FrameTick> {
        if !self.running {
            return None;
        }
        self.elapsed += dt;
        let tick = FrameTick {
            index: self.index,
            dt,
            elapsed: self.elapsed,
        };
        self.index += 1;
        Some(tick)
    }
}

pub const MODEL_SPIN: f32 = 0.005;
pub const ORBITER_SPIN_X: f32 = 0.02;
pub const ORBITER_SPIN_Y: f32 = 0.03;
pub const RING_SPIN: f32 = 0.01;
pub const PARTICLE_JITTER: f32 = 0.01;

/// Advances the model's transforms for one animating frame.
#[derive(Debug, Clone, Copy)]
pub struct Animator {
    variant: Variant,
}

impl Animator {
    pub fn new(variant: Variant) -> Self {
        Self { variant }
    }

    /// Does nothing until a model is installed.
    pub fn step(&self, scene: &mut Scene, tick: &FrameTick, rng: &mut impl Rng) {
        let Some(model) = scene.model_mut() else {
            return;
        };
        model.transform_mut().rotation.y += MODEL_SPIN;
        match self.variant {
            Variant::Knot => orbit_children(model, tick.elapsed.as_secs_f32()),
            Variant::Tower => {
                spin_rings(model);
                jitter_particles(model, rng);
            }
        }
    }
}

/// Every child after the first circles the model at [`ORBIT_RADIUS`] while tumbling.
fn orbit_children(model: &mut dyn SceneNode, t: f32) {
    let children = model.children_mut();
    let n = children.len();
    if n < 2 {
        return;
    }
    for (index, child) in children.iter_mut().enumerate().skip(1) {
        let angle = index as f32 / (n - 1) as f32 * TAU + t;
        let transform = child.transform_mut();
        transform.position.x = angle.cos() * ORBIT_RADIUS;
        transform.position.y = angle.sin() * ORBIT_RADIUS;
        transform.position.z = (angle + t).sin() * 0.5;
        transform.rotation.x += ORBITER_SPIN_X;
        transform.rotation.y += ORBITER_SPIN_Y;
    }
}

fn spin_rings(model: &mut dyn SceneNode) {
    let rings = model
        .children_mut()
        .iter_mut()
        .filter(|child| is_ring(&***child));
    for (k, ring) in rings.enumerate() {
        ring.transform_mut().rotation.z += RING_SPIN * (k + 1) as f32;
    }
}

fn jitter_particles(model: &mut dyn SceneNode, rng: &mut impl Rng) {
    for child in model.children_mut().iter_mut() {
        let Some(cloud) = child.as_flat_mut() else {
            continue;
        };
        for vertex in cloud.vertices.iter_mut() {
            for axis in vertex.position.iter_mut() {
                *axis += rng.gen_range(-PARTICLE_JITTER..=PARTICLE_JITTER);
            }
        }
        cloud.needs_update = true;
    }
}
