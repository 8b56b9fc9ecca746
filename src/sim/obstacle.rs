//! Obstacles and the stream that spawns, moves and retires them

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::Viewport;
use crate::tuning::Tuning;

/// A gate: a top barrier, a gap, and a bottom barrier down to the ground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Height of the top barrier; the gap starts here
    pub top_height: f32,
    pub gap: f32,
    /// Set once the avatar has passed this obstacle
    pub scored: bool,
}

impl Obstacle {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom of the gap (top of the lower barrier)
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.top_height + self.gap
    }

    /// Whether the vertical span `[top, bottom]` fits inside the gap
    pub fn gap_contains(&self, top: f32, bottom: f32) -> bool {
        top >= self.top_height && bottom <= self.gap_bottom()
    }
}

/// Ordered obstacles (spawn order is left-to-right order)
#[derive(Debug, Clone)]
pub struct ObstacleStream {
    obstacles: Vec<Obstacle>,
    /// Wall-clock time of the last spawn (ms)
    last_spawn: f64,
    rng: Pcg32,
    next_id: u32,
}

impl ObstacleStream {
    pub fn new(seed: u64) -> Self {
        Self {
            obstacles: Vec::new(),
            last_spawn: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn last_spawn(&self) -> f64 {
        self.last_spawn
    }

    /// Drop every obstacle and restart the spawn clock at `now`
    pub fn reset(&mut self, now: f64) {
        self.obstacles.clear();
        self.last_spawn = now;
    }

    /// Spawn a new obstacle if the spawn interval has elapsed since the last one
    pub fn maybe_spawn(&mut self, now: f64, viewport: &Viewport, tuning: &Tuning) -> Option<u32> {
        if now - self.last_spawn < tuning.spawn_interval_ms {
            return None;
        }
        let id = self.spawn(viewport, tuning);
        self.last_spawn = now;
        Some(id)
    }

    /// Spawn an obstacle at the right screen edge with a random top height
    pub fn spawn(&mut self, viewport: &Viewport, tuning: &Tuning) -> u32 {
        let top_height = self.random_top_height(viewport, tuning);
        let id = self.next_id;
        self.next_id += 1;

        self.obstacles.push(Obstacle {
            id,
            x: viewport.width,
            width: tuning.obstacle_width,
            top_height,
            gap: tuning.gap,
            scored: false,
        });
        log::debug!("Obstacle {} spawned at height {}", id, top_height);
        id
    }

    /// Uniform integer in `[min, height - ground - gap - min]`
    fn random_top_height(&mut self, viewport: &Viewport, tuning: &Tuning) -> f32 {
        let min = tuning.min_height;
        let span = viewport.height - tuning.ground_height - tuning.gap - min as f32;
        debug_assert!(
            span >= min as f32,
            "viewport {}x{} too small for gap {}",
            viewport.width,
            viewport.height,
            tuning.gap
        );
        let max = (span.floor().max(0.0) as u32).max(min);
        self.rng.random_range(min..=max) as f32
    }

    /// Move every obstacle left by `speed * dt` and retire the ones off screen.
    ///
    /// Returns the ids of obstacles the avatar passed during this call. An
    /// obstacle counts once its right edge is strictly left of `avatar_left`
    /// and is never reported again.
    pub fn advance(&mut self, speed: f32, dt: f32, avatar_left: f32) -> Vec<u32> {
        let mut passed = Vec::new();
        for obstacle in &mut self.obstacles {
            obstacle.x -= speed * dt;
            if !obstacle.scored && obstacle.right() < avatar_left {
                obstacle.scored = true;
                passed.push(obstacle.id);
            }
        }
        self.obstacles.retain(|o| o.right() > 0.0);
        passed
    }

    #[cfg(test)]
    pub(crate) fn push_for_test(&mut self, obstacle: Obstacle) {
        self.next_id = self.next_id.max(obstacle.id + 1);
        self.obstacles.push(obstacle);
    }
}
