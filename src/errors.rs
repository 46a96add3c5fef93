//! Error Types
//!
//! This module defines the error types used throughout the viewer.
//!
//! # Overview
//!
//! The main error type [`ViewerError`] covers all failure modes including:
//! - Missing 3D rendering support (the only fatal class)
//! - Scene object and resource creation failures
//! - Asset reading and image decoding errors
//! - Invalid user input (folder lookup, file input)
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, ViewerError>`. Non-fatal errors are routed to the
//! transient error banner by the session; only `RenderUnsupported` aborts
//! initialization.

use thiserror::Error;

/// The main error type for the viewer core.
#[derive(Error, Debug)]
pub enum ViewerError {
    // ========================================================================
    // Environment Errors (fatal)
    // ========================================================================
    /// The host environment cannot provide a 3D rendering backend.
    #[error("3D rendering is not supported in this environment: {0}")]
    RenderUnsupported(String),

    /// Event loop error (winit).
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    // ========================================================================
    // Resource Creation Errors
    // ========================================================================
    /// The backend failed to allocate a scene object or its materials.
    #[error("Failed to create scene object: {0}")]
    ObjectCreation(String),

    // ========================================================================
    // Asset Errors
    // ========================================================================
    /// Reading an asset from disk failed.
    #[error("Failed to read asset {path}: {source}")]
    AssetIo {
        /// Path of the asset that could not be read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Image decoding error.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    // ========================================================================
    // User Input Errors
    // ========================================================================
    /// User-supplied input was rejected before any state mutation.
    #[error("{0}")]
    InvalidInput(String),

    /// Catalog data could not be parsed.
    #[error("Catalog parse error: {0}")]
    CatalogParse(#[from] serde_json::Error),
}

impl From<image::ImageError> for ViewerError {
    fn from(err: image::ImageError) -> Self {
        ViewerError::ImageDecode(err.to_string())
    }
}

/// Alias for `Result<T, ViewerError>`.
pub type Result<T> = std::result::Result<T, ViewerError>;
