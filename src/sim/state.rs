//! Game state and core simulation types

use serde::{Deserialize, Serialize};

use super::avatar::Avatar;
use super::collision::CollisionKind;
use super::obstacle::{Obstacle, ObstacleStream};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen / countdown, nothing moves
    #[default]
    NotStarted,
    /// Active gameplay
    Running,
    /// Run ended by a collision
    Over,
}

/// Something the simulation wants the outside world to know about
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: u32 },
    Scored { id: u32, score: u32 },
    SpeedUp { speed: f32 },
    /// Emitted exactly once per run
    GameOver { score: u32, cause: CollisionKind },
}

/// Playfield size in game units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(VIEWPORT_MAX_WIDTH, VIEWPORT_HEIGHT)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Fit the playfield to a browser window of the given inner width
    pub fn for_window(inner_width: f32) -> Self {
        let width = (inner_width - VIEWPORT_PADDING).clamp(0.0, VIEWPORT_MAX_WIDTH);
        Self::new(width, VIEWPORT_HEIGHT)
    }

    /// Y coordinate of the ground line
    #[inline]
    pub fn ground_y(&self, tuning: &Tuning) -> f32 {
        self.height - tuning.ground_height
    }
}

/// Read-only view of the simulation handed to the renderer and HUD
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub avatar: &'a Avatar,
    pub obstacles: &'a [Obstacle],
    pub score: u32,
    pub speed: f32,
    pub phase: GamePhase,
    pub viewport: Viewport,
    pub ground_height: f32,
    pub gap: f32,
}

impl Snapshot<'_> {
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }
}

/// One authoritative game run
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(crate) tuning: Tuning,
    pub(crate) viewport: Viewport,
    pub(crate) avatar: Avatar,
    pub(crate) stream: ObstacleStream,
    pub(crate) score: u32,
    /// Obstacle speed (units/s)
    pub(crate) speed: f32,
    pub(crate) phase: GamePhase,
    /// Simulation tick counter for the current run
    pub(crate) time_ticks: u64,
    /// What ended the last run
    pub(crate) collision: Option<CollisionKind>,
}

impl Simulation {
    /// Create an idle simulation; `seed` drives obstacle heights
    pub fn new(tuning: Tuning, viewport: Viewport, seed: u64) -> Self {
        Self {
            avatar: Avatar::new(&tuning),
            stream: ObstacleStream::new(seed),
            score: 0,
            speed: tuning.base_speed,
            phase: GamePhase::NotStarted,
            time_ticks: 0,
            collision: None,
            tuning,
            viewport,
        }
    }

    /// Begin a run at wall-clock time `now` (ms).
    ///
    /// Works from `NotStarted` and from `Over`; ignored while a run is in
    /// progress. Returns whether a run started.
    pub fn start(&mut self, now: f64) -> bool {
        if self.phase == GamePhase::Running {
            return false;
        }
        self.reset_run(now);
        self.phase = GamePhase::Running;
        self.stream.spawn(&self.viewport, &self.tuning);
        log::info!(
            "Run started ({}x{} viewport)",
            self.viewport.width,
            self.viewport.height
        );
        true
    }

    /// Back to the title state with a fresh avatar and score 0
    pub fn restart(&mut self) {
        self.reset_run(0.0);
        self.phase = GamePhase::NotStarted;
    }

    fn reset_run(&mut self, now: f64) {
        self.avatar = Avatar::new(&self.tuning);
        self.stream.reset(now);
        self.score = 0;
        self.speed = self.tuning.base_speed;
        self.time_ticks = 0;
        self.collision = None;
    }

    /// Upward impulse; ignored unless running. Returns whether it applied.
    pub fn flap(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.avatar.flap(&self.tuning);
        true
    }

    /// Change the playfield size (window resize)
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            avatar: &self.avatar,
            obstacles: self.stream.obstacles(),
            score: self.score,
            speed: self.speed,
            phase: self.phase,
            viewport: self.viewport,
            ground_height: self.tuning.ground_height,
            gap: self.tuning.gap,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.stream.obstacles()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn collision(&self) -> Option<CollisionKind> {
        self.collision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim() -> Simulation {
        Simulation::new(Tuning::default(), Viewport::default(), 12345)
    }

    #[test]
    fn test_new_is_not_started() {
        let s = sim();
        assert_eq!(s.phase(), GamePhase::NotStarted);
        assert_eq!(s.score(), 0);
        assert_eq!(s.speed(), BASE_SPEED);
        assert!(s.obstacles().is_empty());
    }

    #[test]
    fn test_start_spawns_first_obstacle() {
        let mut s = sim();
        assert!(s.start(5_000.0));
        assert_eq!(s.phase(), GamePhase::Running);
        assert_eq!(s.obstacles().len(), 1);
        assert_eq!(s.obstacles()[0].x, 800.0);
        assert_eq!(s.stream.last_spawn(), 5_000.0);
    }

    #[test]
    fn test_start_ignored_while_running() {
        let mut s = sim();
        s.start(0.0);
        s.score = 3;
        assert!(!s.start(10.0));
        assert_eq!(s.score(), 3);
        assert_eq!(s.obstacles().len(), 1);
    }

    #[test]
    fn test_start_after_over_resets() {
        let mut s = sim();
        s.start(0.0);
        s.score = 4;
        s.speed = 120.0;
        s.avatar.velocity = 5.0;
        s.phase = GamePhase::Over;

        assert!(s.start(100.0));
        assert_eq!(s.score(), 0);
        assert_eq!(s.speed(), BASE_SPEED);
        assert_eq!(s.avatar().velocity, 0.0);
        assert_eq!(s.avatar().pos.y, AVATAR_START_Y);
        assert_eq!(s.collision(), None);
    }

    #[test]
    fn test_flap_only_while_running() {
        let mut s = sim();
        assert!(!s.flap());
        assert_eq!(s.avatar().velocity, 0.0);

        s.start(0.0);
        assert!(s.flap());
        assert_eq!(s.avatar().velocity, FLAP_FORCE);

        s.phase = GamePhase::Over;
        s.avatar.velocity = 1.0;
        assert!(!s.flap());
        assert_eq!(s.avatar().velocity, 1.0);
    }

    #[test]
    fn test_restart_returns_to_title() {
        let mut s = sim();
        s.start(0.0);
        s.score = 7;
        s.phase = GamePhase::Over;
        s.restart();
        assert_eq!(s.phase(), GamePhase::NotStarted);
        assert_eq!(s.score(), 0);
        assert!(s.obstacles().is_empty());
    }

    #[test]
    fn test_viewport_for_window() {
        assert_eq!(Viewport::for_window(1920.0), Viewport::new(800.0, 600.0));
        assert_eq!(Viewport::for_window(500.0), Viewport::new(460.0, 600.0));
        assert_eq!(Viewport::default().ground_y(&Tuning::default()), 550.0);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut s = sim();
        s.start(0.0);
        let snap = s.snapshot();
        assert_eq!(snap.phase, GamePhase::Running);
        assert_eq!(snap.obstacles.len(), 1);
        assert_eq!(snap.avatar.pos.x, AVATAR_X);
        assert_eq!(snap.gap, OBSTACLE_GAP);
        assert!(!snap.is_over());
    }
}
