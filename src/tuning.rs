//! Data-driven game balance
//!
//! Every gameplay constant in one value so tests can change a single knob.
//! The shipped build always uses `Tuning::default()`.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    // === Avatar ===
    pub gravity: f32,
    pub flap_force: f32,
    pub rotation_scale: f32,
    pub avatar_x: f32,
    pub avatar_start_y: f32,
    pub avatar_size: f32,

    // === Obstacles ===
    pub obstacle_width: f32,
    pub gap: f32,
    pub min_height: u32,
    pub spawn_interval_ms: f64,

    // === Difficulty ===
    pub base_speed: f32,
    pub speed_increment: f32,
    pub speed_score_step: u32,

    // === Layout ===
    pub ground_height: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            flap_force: FLAP_FORCE,
            rotation_scale: ROTATION_SCALE,
            avatar_x: AVATAR_X,
            avatar_start_y: AVATAR_START_Y,
            avatar_size: AVATAR_SIZE,

            obstacle_width: OBSTACLE_WIDTH,
            gap: OBSTACLE_GAP,
            min_height: OBSTACLE_MIN_HEIGHT,
            spawn_interval_ms: SPAWN_INTERVAL_MS,

            base_speed: BASE_SPEED,
            speed_increment: SPEED_INCREMENT,
            speed_score_step: SPEED_SCORE_STEP,

            ground_height: GROUND_HEIGHT,
        }
    }
}

impl Tuning {
    /// Smallest viewport height that still fits a gap plus both margins
    pub fn min_playable_height(&self) -> f32 {
        self.ground_height + self.gap + 2.0 * self.min_height as f32
    }

    /// Whether `score` triggers a speed increase
    pub fn is_speed_step(&self, score: u32) -> bool {
        self.speed_score_step > 0 && score % self.speed_score_step == 0
    }
}
