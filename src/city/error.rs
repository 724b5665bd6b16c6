//! Error types for the score city visualizer

use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a rendering surface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The host could not provide (or lost) the drawing target
    #[error("rendering surface unavailable: {0}")]
    Unavailable(String),
    /// Zero-area surfaces cannot be drawn into
    #[error("rendering surface has zero size ({width}x{height})")]
    ZeroSize { width: usize, height: usize },
}

/// Errors surfaced by [`ScoreCity`](super::ScoreCity) operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CityError {
    /// The rendering context could not be created; terminal for this instance
    #[error("scene initialization failed: {0}")]
    Initialization(#[source] SurfaceError),
    /// The surface went away during a resize; the resize was skipped
    #[error("resize skipped: {0}")]
    Resize(#[source] SurfaceError),
    /// Presenting a frame failed; the render loop is halted
    #[error("frame render failed: {0}")]
    Frame(#[source] SurfaceError),
    /// Operation needs a running scene
    #[error("scene is not running")]
    NotRunning,
    /// A previous mount failed; build a new instance to retry
    #[error("scene failed to initialize earlier and cannot be remounted")]
    Failed,
}

/// Errors loading a [`CityConfig`](super::CityConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config syntax: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config value: {0}")]
    Invalid(String),
}
