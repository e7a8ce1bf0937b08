//! Engine data structures: geometry, materials, transforms, scene graphs and textures.
//!
//! - `geometry` contains the procedural mesh generators (knot, sphere, cylinder, torus, box, grid)
//! - `model` contains geometry, material and vertex layout definitions
//! - `transform` holds per-node transformation data and its packed GPU form
//! - `scene_graph` enables hierarchical scene organization
//! - `texture` contains GPU texture wrappers for depth and shadow maps

pub mod geometry;
pub mod model;
pub mod scene_graph;
pub mod texture;
pub mod transform;
