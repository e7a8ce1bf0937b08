//! The showcase ties the scene, its model, the controls and the animation
//! together behind a small, windowing-free API.
//!
//! The host feeds it pointer input, UI actions, resizes and frame ticks and
//! renders whatever [`Showcase::scene`] and [`Showcase::camera`] hold
//! afterwards.

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    animation::{Animator, FrameTick},
    camera::PerspectiveCamera,
    config::{Config, Variant},
    controls::{
        self, CameraControls, DragControls, OrbitControls, PointerInput, UiAction,
    },
    indicator::LoadingIndicator,
    loader::{AssetSource, LoadOutcome, ModelLoader, UnavailableAsset},
    palette::{ColorScheme, SCHEMES},
    scene::{self, Scene},
    state::AppState,
};

/// Where the model would come from if it existed.
pub const MODEL_PATH: &str = "models/showcase.glb";

pub struct Showcase {
    config: Config,
    state: AppState,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: Box<dyn CameraControls>,
    loader: ModelLoader,
    outcome: Option<LoadOutcome>,
    indicator: LoadingIndicator,
    animator: Animator,
    rng: StdRng,
}

impl Showcase {
    pub fn new(config: Config, width: u32, height: u32) -> Self {
        Self::with_source(config, width, height, &mut UnavailableAsset::new(MODEL_PATH))
    }

    /// Like [`Showcase::new`] but fetching the model from `source`.
    pub fn with_source(config: Config, width: u32, height: u32, source: &mut dyn AssetSource) -> Self {
        let seed = config.resolve_seed();
        log::info!("Starting the {} showcase with seed {seed}", config.variant);
        let mut rng = StdRng::seed_from_u64(seed);

        let variant = config.variant;
        let scene = scene::build_scene(variant, &mut rng);
        let camera = scene::build_camera(variant, width, height);
        let home = scene::initial_camera_position(variant);
        let controls: Box<dyn CameraControls> = match variant {
            Variant::Knot => Box::new(DragControls::new(home)),
            Variant::Tower => Box::new(OrbitControls::new(home, height)),
        };
        let loader = ModelLoader::start(variant, config.load_delay, source);

        Self {
            config,
            state: AppState::default(),
            scene,
            camera,
            controls,
            loader,
            outcome: None,
            indicator: LoadingIndicator::new(),
            animator: Animator::new(variant),
            rng,
        }
    }

    pub fn handle_pointer(&mut self, input: PointerInput) {
        self.controls.on_pointer(input, &mut self.camera, &mut self.scene);
    }

    pub fn handle_action(&mut self, action: UiAction) {
        match action {
            UiAction::Reset => self.controls.reset(&mut self.camera, &mut self.scene),
            UiAction::ToggleWireframe => controls::toggle_wireframe(&mut self.state, &mut self.scene),
            UiAction::ToggleAnimation => controls::toggle_animation(&mut self.state),
            UiAction::CycleColorScheme => {
                if action.applies_to(self.config.variant) {
                    controls::cycle_color_scheme(&mut self.state, &mut self.scene, &mut self.rng)
                } else {
                    log::debug!("The {} showcase has no color schemes", self.config.variant);
                }
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
        self.controls.resize(width, height);
    }

    /// Advances everything by one frame. Transforms only move while animating;
    /// loading and camera damping always progress.
    pub fn frame(&mut self, tick: &FrameTick) {
        self.indicator.advance(tick.dt);

        let scheme = SCHEMES[self.state.color_scheme];
        if let Some((outcome, model)) = self.loader.advance(tick.dt, &scheme, &mut self.rng) {
            if self.scene.replace_model(model).is_some() {
                log::warn!("Replaced an existing model");
            }
            controls::apply_wireframe(self.state.wireframe, &mut self.scene);
            self.indicator.finish();
            self.outcome = Some(outcome);
            log::info!("Model ready after {:?} ({outcome:?})", tick.elapsed);
        }

        self.controls.update(&mut self.camera);

        if self.state.is_animating {
            self.animator.step(&mut self.scene, tick, &mut self.rng);
        }
    }

    pub fn variant(&self) -> Variant {
        self.config.variant
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn scheme(&self) -> &ColorScheme {
        &SCHEMES[self.state.color_scheme]
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn indicator(&self) -> &LoadingIndicator {
        &self.indicator
    }

    pub fn is_loading(&self) -> bool {
        !self.loader.is_settled()
    }

    /// `None` while still loading.
    pub fn outcome(&self) -> Option<LoadOutcome> {
        self.outcome
    }
}
