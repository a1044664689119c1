//! Notedrop - draw lines, drop balls, hear the bounces
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (vectors, segments, board state, undo)
//! - `renderer`: Read-only drawing collaborator
//! - `audio`: Note sampler collaborator and scale model
//! - `platform`: Frame clock and pointer input
//! - `persistence`: Shareable base64/JSON board token
//! - `settings`: User-tunable simulation and voice parameters

pub mod audio;
pub mod error;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{NotedropError, Result};
pub use settings::{SimParams, Voice};

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep in ms (240 Hz)
    pub const SIM_DT_MS: f32 = 1000.0 / 240.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 32;
    /// Longest frame delta fed to the accumulator (ms)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Drawn radius of a ball
    pub const BALL_RADIUS: f32 = 4.0;
    /// Drawn radius of a dropper outline
    pub const DROPPER_RADIUS: f32 = 4.0;
    /// Drawn radius of a line endpoint marker
    pub const ENDPOINT_RADIUS: f32 = 2.0;

    /// Bounce speed mapped to the lowest note (px/ms)
    pub const MIN_SPEED: f32 = 0.0;
    /// Bounce speed mapped to the highest note (px/ms)
    pub const MAX_SPEED: f32 = 2.0;

    /// Query parameter carrying the share token
    pub const STATE_QUERY_KEY: &str = "state";
}
