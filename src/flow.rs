//! Application event loop.
//!
//! This module owns the winit event loop and the composition root
//! [`AppState`]. Everything that happens asynchronously (GPU setup on the
//! web, asset loading, debug panel input, browser viewport changes) reports
//! back through a [`PortalEvent`] sent over the event loop proxy, so all
//! state is mutated on the event-loop thread.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and the GPU context
//! 2. the debug panel is mounted and asset loading starts in the background
//! 3. every redraw advances the loading sequence, the clock and the orbit
//!    camera, uploads uniforms and renders one frame
//! 4. progress events drive the loading bar; the first ratio of 1 starts the
//!    fade-out, and `AssetsLoaded` attaches the model to the scene

use std::{fmt::Debug, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    config::SceneConfig,
    context::Context,
    debug_panel::{self, DebugPanel, Tweak},
    loading_bar::{self, LoadingBar},
    render,
    resources::{self, LoadedAssets, progress::Progress},
    scene::PortalScene,
    stats::FrameStats,
    viewport::Viewport,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{JsCast, prelude::Closure};

/// The composition root: GPU context plus the scene drawn with it.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    pub(crate) scene: PortalScene,
    started: Instant,
    last_frame: Instant,
    stats: FrameStats,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &SceneConfig) -> anyhow::Result<Self> {
        let mut ctx = Context::new(window, config).await?;
        let scene = PortalScene::new(
            &ctx.device,
            ctx.config.format,
            ctx.sample_count,
            &ctx.camera.bind_group_layout,
            config,
        )?;
        ctx.clear_colour = scene.state.clear_color.into();
        let now = Instant::now();
        Ok(Self {
            ctx,
            scene,
            started: now,
            last_frame: now,
            stats: FrameStats::new(),
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, viewport: Viewport) {
        if self.ctx.resize(viewport) {
            self.is_surface_configured = true;
        }
    }

    fn frame(&mut self, bar: &mut dyn LoadingBar) {
        // invoke main render loop
        self.ctx.window.request_redraw();

        let dt = self.last_frame.elapsed();
        self.last_frame = Instant::now();

        let events = self.scene.state.advance(dt);
        loading_bar::apply_events(bar, &events);
        self.scene.state.set_elapsed(self.started.elapsed());
        self.ctx.clear_colour = self.scene.state.clear_color.into();
        self.ctx
            .camera
            .update(&self.ctx.projection, &self.ctx.queue);
        self.scene.sync(&self.ctx.queue);

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return;
        }
        match render::draw_frame(&self.ctx, &self.scene) {
            Ok(()) => {
                self.stats.tick(dt);
            }
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let viewport = self.ctx.viewport;
                self.resize(viewport);
            }
            Err(e) => {
                log::error!("Unable to render {}", e);
            }
        }
    }
}

pub(crate) enum PortalEvent {
    /// GPU setup finished on the web, where it cannot block.
    #[cfg(target_arch = "wasm32")]
    Initialized(Box<AppState>),
    #[cfg(target_arch = "wasm32")]
    InitFailed(String),
    Progress(Progress),
    AssetsLoaded(Box<LoadedAssets>),
    LoadFailed(String),
    Tweak(Tweak),
    /// The browser's visual viewport changed size.
    #[cfg(target_arch = "wasm32")]
    ViewportChanged,
}

impl Debug for PortalEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(target_arch = "wasm32")]
            Self::Initialized(_) => f.write_str("Initialized"),
            #[cfg(target_arch = "wasm32")]
            Self::InitFailed(e) => f.debug_tuple("InitFailed").field(e).finish(),
            Self::Progress(p) => f.debug_tuple("Progress").field(p).finish(),
            Self::AssetsLoaded(_) => f.write_str("AssetsLoaded"),
            Self::LoadFailed(e) => f.debug_tuple("LoadFailed").field(e).finish(),
            Self::Tweak(t) => f.debug_tuple("Tweak").field(t).finish(),
            #[cfg(target_arch = "wasm32")]
            Self::ViewportChanged => f.write_str("ViewportChanged"),
        }
    }
}

pub(crate) struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<PortalEvent>,
    config: SceneConfig,
    state: Option<AppState>,
    loading_bar: Box<dyn LoadingBar>,
    initializing: bool,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(event_loop: &EventLoop<PortalEvent>, config: SceneConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        let loading_bar = loading_bar::find_loading_bar(&config.loading_bar_selector);
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config,
            state: None,
            loading_bar,
            initializing: false,
            error: None,
        })
    }

    /// Finish start-up once the GPU context exists.
    fn on_initialized(&mut self, mut state: AppState) {
        let viewport = state.ctx.window_viewport();
        state.resize(viewport);

        let proxy = self.proxy.clone();
        let panel = DebugPanel::new(&self.config.palette);
        if let Err(e) = debug_panel::mount(panel, move |tweak| {
            if proxy.send_event(PortalEvent::Tweak(tweak)).is_err() {
                log::warn!("Event loop closed, dropping {:?}", tweak);
            }
        }) {
            log::error!("Cannot mount the debug panel: {:#}", e);
        }

        #[cfg(target_arch = "wasm32")]
        if let Err(e) = listen_for_viewport_changes(self.proxy.clone()) {
            log::error!("Cannot listen for viewport changes: {:#}", e);
        }

        self.spawn_loading(&state);
        state.ctx.window.request_redraw();
        self.state = Some(state);
    }

    fn spawn_loading(&self, state: &AppState) {
        // Device and queue are reference counted, the clones share the GPU.
        let device = state.ctx.device.clone();
        let queue = state.ctx.queue.clone();
        let paths = self.config.assets.clone();
        let proxy = self.proxy.clone();

        let load = async move {
            let progress_proxy = proxy.clone();
            let result = resources::load_assets(&device, &queue, &paths, move |progress| {
                if progress_proxy
                    .send_event(PortalEvent::Progress(progress))
                    .is_err()
                {
                    log::warn!("Event loop closed before progress could be reported");
                }
            })
            .await;
            let event = match result {
                Ok(assets) => PortalEvent::AssetsLoaded(Box::new(assets)),
                Err(e) => PortalEvent::LoadFailed(format!("{:#}", e)),
            };
            if proxy.send_event(event).is_err() {
                log::warn!("Event loop closed before loading finished");
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        self.async_runtime.spawn(load);

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(load);
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("App initialization failed: {:#}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler<PortalEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.initializing {
            return;
        }
        self.initializing = true;

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title(&self.config.title);

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            match find_canvas(&self.config.canvas_id) {
                Ok(canvas) => window_attributes = window_attributes.with_canvas(Some(canvas)),
                Err(e) => return self.fail(event_loop, e),
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self
                .async_runtime
                .block_on(AppState::new(window, &self.config))
            {
                Ok(state) => self.on_initialized(state),
                Err(e) => self.fail(event_loop, e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            let config = self.config.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match AppState::new(window, &config).await {
                    Ok(state) => PortalEvent::Initialized(Box::new(state)),
                    Err(e) => PortalEvent::InitFailed(format!("{:#}", e)),
                };
                if proxy.send_event(event).is_err() {
                    log::error!("Event loop closed during initialization");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: PortalEvent) {
        let _ = event_loop;
        match event {
            #[cfg(target_arch = "wasm32")]
            PortalEvent::Initialized(state) => self.on_initialized(*state),
            #[cfg(target_arch = "wasm32")]
            PortalEvent::InitFailed(e) => self.fail(event_loop, anyhow::anyhow!(e)),
            PortalEvent::Progress(progress) => {
                if let Some(state) = &mut self.state {
                    state.scene.state.on_progress(progress);
                }
            }
            PortalEvent::AssetsLoaded(assets) => {
                if let Some(state) = &mut self.state {
                    if let Err(e) = state.scene.attach_model(&state.ctx.device, *assets) {
                        log::error!("Cannot attach the model: {:#}", e);
                    }
                }
            }
            PortalEvent::LoadFailed(e) => {
                // progress never reaches 1, so the overlay stays up
                log::error!("Asset loading failed: {}", e);
            }
            PortalEvent::Tweak(tweak) => {
                if let Some(state) = &mut self.state {
                    state.scene.state.apply_tweak(tweak);
                }
            }
            #[cfg(target_arch = "wasm32")]
            PortalEvent::ViewportChanged => {
                if let Some(state) = &mut self.state {
                    if let Some(viewport) = web_viewport(state.ctx.max_pixel_ratio()) {
                        state.resize(viewport);
                    }
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.ctx.camera.controller.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                let viewport = Viewport::from_physical(
                    size,
                    state.ctx.window.scale_factor(),
                    state.ctx.max_pixel_ratio(),
                );
                state.resize(viewport);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let viewport = state.ctx.window_viewport();
                state.resize(viewport);
            }
            WindowEvent::RedrawRequested => state.frame(self.loading_bar.as_mut()),
            _ => {}
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn find_canvas(id: &str) -> anyhow::Result<web_sys::HtmlCanvasElement> {
    use anyhow::Context;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .context("No document to render into")?;
    let canvas = document
        .get_element_by_id(id)
        .with_context(|| format!("No element with id {:?}", id))?;
    canvas
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| anyhow::anyhow!("Element {:?} is not a canvas", id))
}

/// Size of the visible page area, preferring the visual viewport on mobile.
#[cfg(target_arch = "wasm32")]
fn web_viewport(max_pixel_ratio: f64) -> Option<Viewport> {
    let window = web_sys::window()?;
    let (width, height) = match window.visual_viewport() {
        Some(viewport) => (viewport.width(), viewport.height()),
        None => (
            window.inner_width().ok()?.as_f64()?,
            window.inner_height().ok()?.as_f64()?,
        ),
    };
    Some(Viewport::new(
        width,
        height,
        window.device_pixel_ratio(),
        max_pixel_ratio,
    ))
}

#[cfg(target_arch = "wasm32")]
fn listen_for_viewport_changes(proxy: EventLoopProxy<PortalEvent>) -> anyhow::Result<()> {
    use anyhow::Context;

    let window = web_sys::window().context("No browser window")?;
    let on_resize = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
        if proxy.send_event(PortalEvent::ViewportChanged).is_err() {
            log::warn!("Event loop closed, ignoring resize");
        }
    });
    let registered = match window.visual_viewport() {
        Some(viewport) => viewport
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref()),
        None => window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref()),
    };
    registered.map_err(|e| anyhow::anyhow!("{:?}", e))?;
    // the listener lives as long as the page
    on_resize.forget();
    Ok(())
}

pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Could not initialize logger: {}", e).into());
        }
    }

    let event_loop: EventLoop<PortalEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
