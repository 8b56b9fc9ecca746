//! Smiley Flap - A flap-through-the-gates arcade game
//!
//! Core modules:
//! - `sim`: Simulation (avatar physics, obstacle stream, collisions, scoring)
//! - `session`: Orchestrates a run, the countdown and the leaderboard
//! - `renderer`: WebGPU rendering pipeline
//! - `persistence`: Leaderboard storage (LocalStorage on web)
//! - `tuning`: Game balance values

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::Error;
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use session::{Command, GameOverSummary, Screen, Session};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Downward acceleration added to the avatar velocity every tick
    pub const GRAVITY: f32 = 0.25;
    /// Velocity set by a flap (negative is up)
    pub const FLAP_FORCE: f32 = -8.0;
    /// Avatar velocity to rotation (radians per unit of velocity)
    pub const ROTATION_SCALE: f32 = 0.1;

    /// Avatar defaults
    pub const AVATAR_X: f32 = 100.0;
    pub const AVATAR_START_Y: f32 = 300.0;
    pub const AVATAR_SIZE: f32 = 50.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 80.0;
    pub const OBSTACLE_GAP: f32 = 250.0;
    /// Minimum barrier height above and below the gap
    pub const OBSTACLE_MIN_HEIGHT: u32 = 50;
    /// Wall-clock time between spawns (ms)
    pub const SPAWN_INTERVAL_MS: f64 = 1500.0;

    /// Obstacle speed (units/s) and difficulty ramp
    pub const BASE_SPEED: f32 = 100.0;
    pub const SPEED_INCREMENT: f32 = 5.0;
    /// Speed increases every time the score reaches a multiple of this
    pub const SPEED_SCORE_STEP: u32 = 1;

    /// Screen layout
    pub const GROUND_HEIGHT: f32 = 50.0;
    pub const VIEWPORT_MAX_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;
    /// Horizontal room left around the canvas
    pub const VIEWPORT_PADDING: f32 = 40.0;

    /// Countdown step before a run (ms)
    pub const COUNTDOWN_STEP_MS: f64 = 700.0;

    /// Largest frame delta fed to the simulation (s)
    pub const MAX_FRAME_DT: f32 = 0.1;
}
