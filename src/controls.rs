//! Interaction layer: pointer and wheel handling for both camera styles and
//! the button actions.
//!
//! The host translates its native events into [`PointerInput`] and
//! [`UiAction`], so everything here runs without a window or a GPU.

use std::f32::consts::{PI, TAU};

use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3, Zero};
use rand::Rng;
use winit::event::MouseScrollDelta;

use crate::{
    camera::PerspectiveCamera,
    config::Variant,
    palette::{SCHEMES, next_scheme},
    scene::Scene,
    state::AppState,
};

/// Pointer input in window pixels. `delta_y` follows the browser wheel
/// convention: positive when scrolling down, away from the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    Press { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Release,
    Wheel { delta_y: f32 },
}

/// Pixels per scrolled line, the usual browser value.
const PIXELS_PER_LINE: f32 = 100.0;

impl PointerInput {
    pub fn wheel(delta: MouseScrollDelta) -> Self {
        let delta_y = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * PIXELS_PER_LINE,
            MouseScrollDelta::PixelDelta(position) => -position.y as f32,
        };
        PointerInput::Wheel { delta_y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UiAction {
    Reset,
    ToggleWireframe,
    ToggleAnimation,
    CycleColorScheme,
}

impl UiAction {
    /// Whether the action exists in `variant`; the knot has no color schemes.
    pub fn applies_to(self, variant: Variant) -> bool {
        !(self == UiAction::CycleColorScheme && variant == Variant::Knot)
    }
}

/// Page button ids and the action each one triggers.
pub const BUTTONS: [(&str, UiAction); 4] = [
    ("resetBtn", UiAction::Reset),
    ("wireframeBtn", UiAction::ToggleWireframe),
    ("animationBtn", UiAction::ToggleAnimation),
    ("colorBtn", UiAction::CycleColorScheme),
];

/// Maps pointer input onto camera (and possibly model) motion.
pub trait CameraControls {
    fn on_pointer(&mut self, input: PointerInput, camera: &mut PerspectiveCamera, scene: &mut Scene);

    /// Called once per frame, whether or not the scene is animating.
    fn update(&mut self, camera: &mut PerspectiveCamera);

    /// Restores the initial view.
    fn reset(&mut self, camera: &mut PerspectiveCamera, scene: &mut Scene);

    fn resize(&mut self, _width: u32, _height: u32) {}
}

pub const DRAG_SPEED: f32 = 0.01;
pub const ZOOM_SPEED: f32 = 0.01;
pub const MIN_ZOOM: f32 = 2.0;
pub const MAX_ZOOM: f32 = 10.0;

/// Drag rotates the model, the wheel slides the camera along z.
#[derive(Debug)]
pub struct DragControls {
    home: Point3<f32>,
    last: Option<(f32, f32)>,
}

impl DragControls {
    pub fn new(home: Point3<f32>) -> Self {
        Self { home, last: None }
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }
}

impl CameraControls for DragControls {
    fn on_pointer(&mut self, input: PointerInput, camera: &mut PerspectiveCamera, scene: &mut Scene) {
        match input {
            PointerInput::Press { x, y } => self.last = Some((x, y)),
            PointerInput::Move { x, y } => {
                let Some((last_x, last_y)) = self.last else {
                    return;
                };
                self.last = Some((x, y));
                if let Some(model) = scene.model_mut() {
                    let rotation = &mut model.transform_mut().rotation;
                    rotation.y += (x - last_x) * DRAG_SPEED;
                    rotation.x += (y - last_y) * DRAG_SPEED;
                }
            }
            PointerInput::Release => self.last = None,
            PointerInput::Wheel { delta_y } => {
                camera.position.z = (camera.position.z + delta_y * ZOOM_SPEED).clamp(MIN_ZOOM, MAX_ZOOM);
            }
        }
    }

    fn update(&mut self, _camera: &mut PerspectiveCamera) {}

    fn reset(&mut self, camera: &mut PerspectiveCamera, scene: &mut Scene) {
        self.last = None;
        camera.position = self.home;
        camera.target = Point3::origin();
        if let Some(model) = scene.model_mut() {
            model.transform_mut().rotation = Vector3::zero();
        }
    }
}

pub const DAMPING: f32 = 0.05;
pub const DOLLY_SCALE: f32 = 0.95;
pub const MIN_DISTANCE: f32 = 5.0;
pub const MAX_DISTANCE: f32 = 50.0;
const POLAR_EPSILON: f32 = 1e-6;

/// Damped orbit around a target point. Dragging rotates, the wheel dollies,
/// panning is not supported.
#[derive(Debug)]
pub struct OrbitControls {
    home: Point3<f32>,
    pub target: Point3<f32>,
    viewport_height: f32,
    last: Option<(f32, f32)>,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
}

impl OrbitControls {
    pub fn new(home: Point3<f32>, viewport_height: u32) -> Self {
        Self {
            home,
            target: Point3::origin(),
            viewport_height: viewport_height.max(1) as f32,
            last: None,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }

    /// Whether a previous drag is still coasting.
    pub fn is_moving(&self) -> bool {
        self.delta_theta.abs() > f32::EPSILON || self.delta_phi.abs() > f32::EPSILON
    }
}

impl CameraControls for OrbitControls {
    fn on_pointer(&mut self, input: PointerInput, _camera: &mut PerspectiveCamera, _scene: &mut Scene) {
        match input {
            PointerInput::Press { x, y } => self.last = Some((x, y)),
            PointerInput::Move { x, y } => {
                let Some((last_x, last_y)) = self.last else {
                    return;
                };
                self.last = Some((x, y));
                self.delta_theta -= TAU * (x - last_x) / self.viewport_height;
                self.delta_phi -= TAU * (y - last_y) / self.viewport_height;
            }
            PointerInput::Release => self.last = None,
            PointerInput::Wheel { delta_y } => {
                if delta_y < 0.0 {
                    self.scale *= DOLLY_SCALE;
                } else if delta_y > 0.0 {
                    self.scale /= DOLLY_SCALE;
                }
            }
        }
    }

    fn update(&mut self, camera: &mut PerspectiveCamera) {
        let offset = camera.position - self.target;
        let radius = offset.magnitude();
        let (theta, phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, PI / 2.0)
        };

        let theta = theta + self.delta_theta * DAMPING;
        let phi = (phi + self.delta_phi * DAMPING).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        let radius = (radius * self.scale).clamp(MIN_DISTANCE, MAX_DISTANCE);

        let offset = Vector3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        camera.position = self.target + offset;
        camera.target = self.target;

        self.delta_theta *= 1.0 - DAMPING;
        self.delta_phi *= 1.0 - DAMPING;
        self.scale = 1.0;
    }

    fn reset(&mut self, camera: &mut PerspectiveCamera, _scene: &mut Scene) {
        self.last = None;
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.target = Point3::origin();
        camera.position = self.home;
        camera.target = self.target;
    }

    fn resize(&mut self, _width: u32, height: u32) {
        if height > 0 {
            self.viewport_height = height as f32;
        }
    }
}

/// Flips the wireframe flag and pushes it onto every mesh, model included.
pub fn toggle_wireframe(state: &mut AppState, scene: &mut Scene) {
    state.wireframe = !state.wireframe;
    apply_wireframe(state.wireframe, scene);
}

pub fn apply_wireframe(wireframe: bool, scene: &mut Scene) {
    scene.traverse_mut(&mut |node| {
        if let Some(mesh) = node.as_mesh_mut() {
            mesh.material.wireframe = wireframe;
        }
    });
}

pub fn toggle_animation(state: &mut AppState) {
    state.is_animating = !state.is_animating;
}

/// Moves to the next scheme and retints the lights and emissive surfaces with
/// colors drawn from it.
pub fn cycle_color_scheme(state: &mut AppState, scene: &mut Scene, rng: &mut impl Rng) {
    state.color_scheme = next_scheme(state.color_scheme);
    let scheme = &SCHEMES[state.color_scheme];
    log::info!("Switched to color scheme {}", scheme.name);

    for light in scene.lights.iter_mut().filter(|light| !light.is_ambient()) {
        light.color = scheme.pick(rng);
    }
    scene.traverse_mut(&mut |node| {
        if let Some(mesh) = node.as_mesh_mut()
            && mesh.material.emissive.is_some()
        {
            mesh.material.emissive = Some(scheme.pick(rng));
        }
    });
}
