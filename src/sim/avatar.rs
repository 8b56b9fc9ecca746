//! The falling avatar
//!
//! Integration is a fixed step per tick and ignores the frame delta. Only
//! obstacle motion is scaled by dt.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// The player's avatar (top-left anchored box)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    /// Top-left corner. `x` never changes during a run.
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (units per tick, positive is down)
    pub velocity: f32,
    /// Display rotation in radians, within ±π/4
    pub rotation: f32,
}

impl Avatar {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.avatar_x, tuning.avatar_start_y),
            size: Vec2::splat(tuning.avatar_size),
            velocity: 0.0,
            rotation: 0.0,
        }
    }

    /// Apply one tick of gravity, clamp at the ceiling and update rotation
    pub fn integrate(&mut self, tuning: &Tuning) {
        use std::f32::consts::FRAC_PI_4;

        self.velocity += tuning.gravity;
        self.pos.y += self.velocity;
        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.velocity = 0.0;
        }
        self.rotation = (self.velocity * tuning.rotation_scale).clamp(-FRAC_PI_4, FRAC_PI_4);
    }

    /// Upward impulse. Replaces the current velocity.
    pub fn flap(&mut self, tuning: &Tuning) {
        self.velocity = tuning.flap_force;
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Center point (used by the renderer and the demo autopilot)
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}
