//! Application event loop.
//!
//! [`App`] hosts a [`Showcase`] inside winit: it creates the window and the
//! GPU [`Context`], translates window events into pointer input and UI
//! actions, and drives one [`FrameLoop`] tick plus one render per redraw.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and starts the async GPU setup (blocking on
//!    native, `spawn_local` on the web)
//! 2. the finished setup arrives as [`FlowEvent::Initialized`]
//! 3. every `RedrawRequested` steps the frame loop, advances the showcase,
//!    renders and requests the next redraw while the loop runs
//! 4. browser buttons reach the loop as [`FlowEvent::Action`]

use std::{fmt::Debug, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    animation::FrameLoop,
    config::Config,
    context::Context,
    controls::{PointerInput, UiAction},
    render::Renderer,
    showcase::Showcase,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Everything that exists only once the GPU is ready.
pub struct GpuState {
    ctx: Context,
    renderer: Renderer,
    showcase: Showcase,
}

impl GpuState {
    async fn new(window: Arc<Window>, config: Config) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let ctx = Context::new(window).await?;
        let showcase = Showcase::new(config, size.width.max(1), size.height.max(1));
        Ok(Self {
            ctx,
            renderer: Renderer::new(),
            showcase,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
        self.showcase.resize(width, height);
    }
}

pub enum FlowEvent {
    Initialized(Box<GpuState>),
    Action(UiAction),
    Exit,
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized"),
            Self::Action(action) => f.debug_tuple("Action").field(action).finish(),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<FlowEvent>,
    config: Option<Config>,
    state: Option<GpuState>,
    frame_loop: FrameLoop,
    last_time: Instant,
    cursor: (f32, f32),
    /// A fatal setup error, handed back by [`run`] once the loop exits.
    error: Option<anyhow::Error>,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: Config) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy,
            config: Some(config),
            state: None,
            frame_loop: FrameLoop::new(),
            last_time: Instant::now(),
            cursor: (0.0, 0.0),
            error: None,
        })
    }

    fn initialized(&mut self, mut state: GpuState) {
        let size = state.ctx.window.inner_size();
        state.resize(size.width, size.height);
        #[cfg(target_arch = "wasm32")]
        crate::web::sync_indicator(state.showcase.indicator());
        state.ctx.window.request_redraw();
        self.state = Some(state);
        self.frame_loop.start();
        self.last_time = Instant::now();
    }

    fn action(&mut self, action: UiAction) {
        if let Some(state) = &mut self.state {
            log::debug!("UI action {action:?}");
            state.showcase.handle_action(action);
        }
    }

    fn redraw(&mut self) {
        let Some(state) = &mut self.state else {
            return;
        };
        let dt = self.last_time.elapsed();
        self.last_time = Instant::now();

        if let Some(tick) = self.frame_loop.step(dt) {
            state.showcase.frame(&tick);
            #[cfg(target_arch = "wasm32")]
            crate::web::sync_indicator(state.showcase.indicator());
        }

        let camera = state.showcase.camera().clone();
        match state
            .renderer
            .render(&mut state.ctx, state.showcase.scene_mut(), &camera)
        {
            Ok(()) => {}
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
            }
            Err(e) => log::error!("Unable to render {e}"),
        }

        if self.frame_loop.is_running() {
            state.ctx.window.request_redraw();
        }
    }
}

fn key_action(key: KeyCode) -> Option<UiAction> {
    match key {
        KeyCode::KeyR => Some(UiAction::Reset),
        KeyCode::KeyW => Some(UiAction::ToggleWireframe),
        KeyCode::Space => Some(UiAction::ToggleAnimation),
        KeyCode::KeyC => Some(UiAction::CycleColorScheme),
        _ => None,
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(config) = self.config.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("floating-forms");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let window = web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(&config.canvas_id).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));

            crate::web::bind_buttons(&self.proxy, config.variant);
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(anyhow::Error::new(e).context("Could not create a window"));
                event_loop.exit();
                return;
            }
        };

        let init_future = GpuState::new(window, config);

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(init_future) {
                Ok(state) => self.initialized(state),
                Err(e) => {
                    self.error = Some(e.context("App initialization failed"));
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match init_future.await {
                    Ok(state) => {
                        assert!(
                            proxy
                                .send_event(FlowEvent::Initialized(Box::new(state)))
                                .is_ok()
                        );
                    }
                    Err(e) => {
                        log::error!("App initialization failed: {e:#}");
                        let _ = proxy.send_event(FlowEvent::Exit);
                    }
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            // This is the message from our wasm `spawn_local`
            FlowEvent::Initialized(state) => self.initialized(*state),
            FlowEvent::Action(action) => self.action(action),
            FlowEvent::Exit => {
                self.frame_loop.stop();
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                self.frame_loop.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => self.redraw(),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                let (x, y) = self.cursor;
                state.showcase.handle_pointer(PointerInput::Move { x, y });
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = self.cursor;
                let input = match button_state {
                    ElementState::Pressed => PointerInput::Press { x, y },
                    ElementState::Released => PointerInput::Release,
                };
                state.showcase.handle_pointer(input);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                state.showcase.handle_pointer(PointerInput::wheel(delta));
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => {
                        self.frame_loop.stop();
                        event_loop.exit();
                    }
                    PhysicalKey::Code(code) => {
                        if let Some(action) = key_action(code) {
                            self.action(action);
                        }
                    }
                    PhysicalKey::Unidentified(_) => {}
                }
            }
            _ => {}
        }
    }
}

/// Installs the platform logger; later calls are no-ops.
pub fn init_logger() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        // fails only when a logger is already installed
        let _ = console_log::init_with_level(log::Level::Info);
    }
}

pub fn run(config: Config) -> anyhow::Result<()> {
    init_logger();

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
