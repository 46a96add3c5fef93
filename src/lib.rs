//! # deckview
//!
//! Interaction and animation core for a 3D double-sided trading-card viewer:
//! a card arena with without-replacement pack sampling, a single-selection
//! cross-fade state machine, a frame-driven cooperative animation scheduler,
//! pointer/wheel/keyboard interaction with camera-distance clamping, and an
//! asynchronous texture loader, all behind a backend-agnostic rendering
//! trait. The crate never draws; it tells a [`render::RenderBackend`] what
//! changed and when to present a frame.

pub mod animation;
pub mod app;
pub mod assets;
pub mod banner;
pub mod camera;
pub mod cards;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod interaction;
pub mod render;
pub mod selection;
pub mod session;
pub mod viewport;

pub use animation::{AnimationScheduler, AnimationTask, Completion, TaskKind};
pub use app::ViewerApp;
pub use assets::{AssetRef, Image, ResourceLoader, TextureHandle, TextureState};
pub use banner::ErrorBanner;
pub use camera::ViewCamera;
pub use cards::{Card, CardId, CardPool, sample_without_replacement};
pub use catalog::{CardCatalog, CatalogEntry};
pub use config::ViewerConfig;
pub use errors::{Result, ViewerError};
pub use interaction::{DragMode, InteractionController, PointerButton, ViewerAction};
pub use render::{CardFace, CardGeometry, HeadlessBackend, RenderBackend, SceneObjectId};
pub use selection::SelectionController;
pub use session::ViewerSession;
pub use viewport::ViewportController;
