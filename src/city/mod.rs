//! Credit score city
//!
//! A small procedural skyline with one building cluster per score band and
//! a floating marker that glides to the current score.
//!
//! # Module Organization
//!
//! - `score` - score clamping, the band table and the score-to-x map
//! - `skyline` - static scene generation (floor, grid, buildings)
//! - `indicator` - the score marker and its per-frame motion
//! - `camera_rig` - named camera presets
//! - `overlay` - text labels anchored to 3D points
//! - `surface` - where rendered frames are presented
//! - `visualizer` - lifecycle and the render loop
//! - `config` - RON tuning file
//! - `error` - error types

pub mod camera_rig;
pub mod config;
pub mod error;
pub mod indicator;
pub mod overlay;
pub mod score;
pub mod skyline;
pub mod surface;
pub mod visualizer;

pub use camera_rig::{CameraMode, CameraRig, UnknownMode};
pub use config::CityConfig;
pub use error::{CityError, ConfigError, SurfaceError};
pub use indicator::{Indicator, Motion};
pub use overlay::{Label, LabelAnchor, LabelId, LabelKind, LabelLayer, OverlaySink};
pub use score::{band_of, color_of, x_position, BandId, Score, ScoreBand, UnknownBand, BANDS};
pub use skyline::{Building, Skyline, SkylineGroup};
pub use surface::{MemoryProvider, MemorySurface, RenderSurface, SurfaceProvider};
pub use visualizer::{FrameStatus, Lifecycle, ScoreCity};
