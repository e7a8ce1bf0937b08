//! Focal model acquisition.
//!
//! [`ModelLoader`] is a small state machine: it starts `Loading` with a
//! one-shot fetch from an [`AssetSource`], polls it once per frame during a
//! bounded, frame-driven delay and then settles in either `Loaded` (the source
//! delivered) or `Fallback` (the source failed or did not finish in time, so a
//! procedural model was built instead). Failures are logged and never surfaced
//! further.

use futures::{FutureExt, future::LocalBoxFuture};
use instant::Duration;
use rand::Rng;

use crate::{
    config::Variant,
    data_structures::scene_graph::SceneNode,
    palette::ColorScheme,
    procedural,
};

/// Something that can deliver a ready-made focal model.
pub trait AssetSource {
    fn fetch(&mut self) -> LocalBoxFuture<'static, anyhow::Result<Box<dyn SceneNode>>>;
}

/// The shipped source: there is no external asset, every fetch rejects.
#[derive(Clone, Debug, Default)]
pub struct UnavailableAsset {
    pub path: String,
}

impl UnavailableAsset {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl AssetSource for UnavailableAsset {
    fn fetch(&mut self) -> LocalBoxFuture<'static, anyhow::Result<Box<dyn SceneNode>>> {
        let path = self.path.clone();
        async move { Err(anyhow::anyhow!("no model asset available at {path:?}")) }.boxed_local()
    }
}

type Fetch = LocalBoxFuture<'static, anyhow::Result<Box<dyn SceneNode>>>;

pub enum LoadState {
    Loading {
        elapsed: Duration,
        /// The pending fetch; `None` once it has produced `result`.
        fetch: Option<Fetch>,
        result: Option<anyhow::Result<Box<dyn SceneNode>>>,
    },
    Loaded,
    Fallback,
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }
}

/// How the current model came to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Fallback,
}

pub struct ModelLoader {
    variant: Variant,
    delay: Duration,
    state: LoadState,
}

impl ModelLoader {
    /// Starts the fetch right away; its result is installed once `delay` has passed.
    pub fn start(variant: Variant, delay: Duration, source: &mut dyn AssetSource) -> Self {
        Self {
            variant,
            delay,
            state: LoadState::Loading {
                elapsed: Duration::ZERO,
                fetch: Some(source.fetch()),
                result: None,
            },
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_settled(&self) -> bool {
        !self.state.is_loading()
    }

    /// Advances the wait by `dt`. Returns the model to install exactly once,
    /// on the frame the loader settles.
    pub fn advance(
        &mut self,
        dt: Duration,
        scheme: &ColorScheme,
        rng: &mut impl Rng,
    ) -> Option<(LoadOutcome, Box<dyn SceneNode>)> {
        let LoadState::Loading {
            elapsed,
            fetch,
            result,
        } = &mut self.state
        else {
            return None;
        };

        if let Some(pending) = fetch
            && let Some(done) = pending.now_or_never()
        {
            *fetch = None;
            *result = Some(done);
        }

        *elapsed += dt;
        if *elapsed < self.delay {
            return None;
        }

        let result = result.take().unwrap_or_else(|| {
            Err(anyhow::anyhow!(
                "model fetch did not finish within {:?}",
                self.delay
            ))
        });

        match result {
            Ok(model) => {
                log::info!("Loaded model {:?}", model.name());
                self.state = LoadState::Loaded;
                Some((LoadOutcome::Loaded, model))
            }
            Err(e) => {
                log::warn!("Could not load model ({e:#}), generating one procedurally");
                self.state = LoadState::Fallback;
                let model = procedural::build_model(self.variant, scheme, rng);
                Some((LoadOutcome::Fallback, Box::new(model)))
            }
        }
    }
}
