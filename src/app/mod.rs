//! Windowed application shell.
//!
//! Thin winit integration: it owns the window, turns window events into
//! session calls, and keeps requesting redraws only while the session says
//! another frame is needed. The rendering backend is produced by a factory
//! once the window exists; a factory failure is the environment-unsupported
//! case and aborts initialization.

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, ModifiersState};
use winit::window::{Window, WindowId};

use crate::catalog::CardCatalog;
use crate::config::ViewerConfig;
use crate::errors::{Result, ViewerError};
use crate::interaction::{PointerButton, ViewerAction};
use crate::render::{HeadlessBackend, RenderBackend};
use crate::session::ViewerSession;

pub type BoxedBackend = Box<dyn RenderBackend>;

/// Builds the rendering backend once the window exists.
pub type BackendFactory = Box<dyn FnOnce(&Window) -> Result<BoxedBackend>>;

pub struct ViewerApp {
    title: String,
    config: ViewerConfig,
    catalog: Option<CardCatalog>,
    factory: Option<BackendFactory>,

    window: Option<Arc<Window>>,
    session: Option<ViewerSession<BoxedBackend>>,
    cursor: Vec2,
    modifiers: ModifiersState,
}

impl ViewerApp {
    /// Creates an app with the default config, the built-in catalog and a
    /// headless backend. Use the `with_*` builders to swap any of them.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            config: ViewerConfig::default(),
            catalog: None,
            factory: Some(Box::new(|_| {
                Ok(Box::new(HeadlessBackend::new()) as BoxedBackend)
            })),
            window: None,
            session: None,
            cursor: Vec2::ZERO,
            modifiers: ModifiersState::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ViewerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: CardCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    #[must_use]
    pub fn with_backend_factory(mut self, factory: BackendFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Runs the event loop until the window closes.
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);
        event_loop.run_app(&mut self)?;
        Ok(())
    }

    fn init_session(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(1280.0, 720.0));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| ViewerError::RenderUnsupported(e.to_string()))?,
        );

        let factory = self
            .factory
            .take()
            .ok_or_else(|| ViewerError::RenderUnsupported("no backend factory".into()))?;
        let backend = factory(&window)
            .map_err(|e| ViewerError::RenderUnsupported(e.to_string()))?;

        let catalog = self.catalog.take().unwrap_or_else(CardCatalog::score_1989);
        let mut session = ViewerSession::new(backend, self.config.clone(), catalog);
        let size = window.inner_size();
        session.resize(size.width, size.height);
        // Start with one card on the table, like the selector expects.
        session.dispatch(ViewerAction::AddCard);

        window.request_redraw();
        self.window = Some(window);
        self.session = Some(session);
        Ok(())
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_session(event_loop) {
            // Environment-unsupported: fatal, reported once, init aborts.
            log::error!("{e}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if window.id() != window_id {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                session.resize(size.width, size.height);
                window.request_redraw();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                session.pointer_move(self.cursor);
                if session.needs_frame() {
                    window.request_redraw();
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => {
                    let button = match button {
                        MouseButton::Right => PointerButton::Secondary,
                        _ => PointerButton::Primary,
                    };
                    session.pointer_down(self.cursor, button, self.modifiers.control_key());
                    window.request_redraw();
                }
                ElementState::Released => session.pointer_up(),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                // Match the convention the zoom sensitivity was tuned for:
                // positive delta moves the camera away.
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * 40.0,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                session.wheel(dy);
                window.request_redraw();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && let Key::Character(text) = &event.logical_key
                {
                    let action = match text.as_str() {
                        "f" => Some(ViewerAction::Flip),
                        "r" => Some(ViewerAction::ToggleRotate),
                        "+" | "=" => Some(ViewerAction::ZoomIn),
                        "-" => Some(ViewerAction::ZoomOut),
                        _ => None,
                    };
                    if let Some(action) = action {
                        session.dispatch(action);
                        window.request_redraw();
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if session.tick(Instant::now()) {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let (Some(window), Some(session)) = (&self.window, &self.session)
            && session.needs_frame()
        {
            window.request_redraw();
        }
    }
}
