//! Standalone window backed by winit.
//!
//! ```no_run
//! # use penumbra::{Options, Viewer};
//! Viewer::builder()
//!     .with_options(Options::default())
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::{sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    assets::{self, FileSystemProvider, ResourceRequest, Resources},
    error::{PenumbraError, RenderError},
    gpu::{backend::GpuBackend, render_context::RenderContext},
    options::Options,
    scene::Scene,
    InputEvent, SceneRenderEngine,
};

/// Seconds between window title refreshes while the overlay is shown.
const TITLE_REFRESH_INTERVAL: f64 = 0.25;

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: None,
            title: "Penumbra".into(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window that renders the configured scene.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run).
pub struct Viewer {
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Load every asset, open the window and run the event loop. Blocks
    /// until the window is closed.
    ///
    /// # Errors
    ///
    /// Asset loading, GPU initialization or event loop failures.
    pub fn run(self) -> Result<(), PenumbraError> {
        let provider = FileSystemProvider::new(self.options.assets.root.clone());
        let requests = ResourceRequest::startup_set(&self.options);
        let resources = assets::load_all(&provider, &requests)?;
        let scene = Scene::from_options(&self.options.scene, &resources)?;
        let engine = SceneRenderEngine::new(&self.options, scene);

        let event_loop =
            EventLoop::new().map_err(|e| PenumbraError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            backend: None,
            engine,
            resources,
            options: self.options,
            title: self.title,
            start: Instant::now(),
            last_title_update: 0.0,
            error: None,
        };
        event_loop
            .run_app(&mut app)
            .map_err(|e| PenumbraError::Viewer(e.to_string()))?;
        app.error.map_or(Ok(()), Err)
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    backend: Option<GpuBackend>,
    engine: SceneRenderEngine,
    resources: Resources,
    options: Options,
    title: String,
    start: Instant,
    last_title_update: f64,
    /// Fatal error raised inside a callback, returned from `run`.
    error: Option<PenumbraError>,
}

impl ViewerApp {
    fn init_graphics(
        &mut self,
        event_loop: &ActiveEventLoop,
    ) -> Result<(), PenumbraError> {
        let attrs = match event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
        {
            Some(monitor) => {
                let size = monitor.size().to_logical::<f64>(monitor.scale_factor());
                Window::default_attributes()
                    .with_title(self.title.as_str())
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        size.width * 0.75,
                        size.height * 0.75,
                    ))
            }
            None => Window::default_attributes().with_title(self.title.as_str()),
        };
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| PenumbraError::Viewer(e.to_string()))?,
        );

        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));
        let context =
            pollster::block_on(RenderContext::new(Arc::clone(&window), (width, height)))?;
        let backend = GpuBackend::new(
            context,
            &self.options.lighting,
            &self.options.assets,
            &self.resources,
            self.engine.scene(),
        )?;
        self.engine.resize(width, height);

        window.request_redraw();
        self.window = Some(window);
        self.backend = Some(backend);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(backend)) = (&self.window, &mut self.backend) else {
            return;
        };
        let now = self.start.elapsed().as_secs_f64();
        if self.engine.should_render(now) {
            match self.engine.render_frame(now, backend) {
                Ok(_) => {}
                Err(RenderError::Surface(
                    wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                )) => backend.reconfigure(),
                Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("surface out of memory; exiting");
                    event_loop.exit();
                }
                Err(e) => log::error!("render error: {e}"),
            }
        }

        if self.engine.debug_overlay() {
            if now - self.last_title_update >= TITLE_REFRESH_INTERVAL {
                window.set_title(&format!("{} | {}", self.title, self.engine.debug_text()));
                self.last_title_update = now;
            }
        } else if self.last_title_update > 0.0 {
            window.set_title(&self.title);
            self.last_title_update = 0.0;
        }
        window.request_redraw();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_graphics(event_loop) {
            log::error!("failed to start viewer: {e}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let Some(backend) = &mut self.backend {
                    backend.resize(size.width, size.height);
                }
                self.engine.resize(size.width, size.height);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            WindowEvent::MouseInput { button, state, .. } => {
                self.engine.handle_input(InputEvent::MouseButton {
                    button: button.into(),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.engine.handle_input(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.engine.handle_input(InputEvent::Scroll { delta });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.engine.handle_input(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        let _ = self.engine.handle_key_press(&format!("{code:?}"));
                    }
                }
            }

            _ => (),
        }
    }
}
