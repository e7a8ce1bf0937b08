//! floating-forms
//!
//! A small decorative 3D showcase that runs natively and in the browser. A
//! procedurally built model floats in a lit scene, can be rotated, zoomed,
//! switched to wireframe, paused and recolored.
//!
//! Two variants exist: `Knot`, a torus knot with orbiting spheres and a simple
//! drag/zoom camera, and `Tower`, a stacked tower with spinning rings, a
//! particle cloud, fog, shadows and an orbit camera.
//!
//! High-level modules
//! - `scene`: the scene builder (camera, lights, background, grid, cubes)
//! - `loader` and `procedural`: the model state machine and its fallback models
//! - `controls`: pointer, wheel and button handling
//! - `animation`: the frame loop and the per-frame transform updates
//! - `showcase`: ties the above together without a window or GPU
//! - `context`, `pipelines`, `render`: the wgpu renderer
//! - `flow`: the winit event loop hosting everything
//!

pub mod animation;
pub mod camera;
#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
pub mod config;
pub mod context;
pub mod controls;
pub mod data_structures;
pub mod flow;
pub mod indicator;
pub mod loader;
pub mod palette;
pub mod pipelines;
pub mod procedural;
pub mod render;
pub mod scene;
pub mod showcase;
pub mod state;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{Config, Variant};
pub use showcase::Showcase;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point, configured from the page URL.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    flow::init_logger();
    let config = web::config_from_location();
    flow::run(config).map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
