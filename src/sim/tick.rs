//! Per-frame simulation tick
//!
//! Order inside a tick is fixed: avatar, spawn, advance/score, collide.

use super::collision::check_collision;
use super::state::{GameEvent, GamePhase, Simulation};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap before integrating (click/tap/space)
    pub flap: bool,
}

impl Simulation {
    /// Advance one frame. `dt` is the frame delta in seconds, `now` the
    /// wall-clock time in ms. Does nothing unless a run is in progress.
    pub fn update(&mut self, dt: f32, now: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != GamePhase::Running {
            return events;
        }
        self.time_ticks += 1;

        self.avatar.integrate(&self.tuning);

        if let Some(id) = self.stream.maybe_spawn(now, &self.viewport, &self.tuning) {
            events.push(GameEvent::Spawned { id });
        }

        for id in self.stream.advance(self.speed, dt, self.avatar.left()) {
            self.score += 1;
            log::debug!("Passed obstacle {}, score {}", id, self.score);
            events.push(GameEvent::Scored {
                id,
                score: self.score,
            });
            if self.tuning.is_speed_step(self.score) {
                self.speed += self.tuning.speed_increment;
                events.push(GameEvent::SpeedUp { speed: self.speed });
            }
        }

        if let Some(cause) = check_collision(
            &self.avatar,
            self.stream.obstacles(),
            &self.viewport,
            &self.tuning,
        ) {
            self.phase = GamePhase::Over;
            self.collision = Some(cause);
            log::info!("Game over: {:?}, score {}", cause, self.score);
            events.push(GameEvent::GameOver {
                score: self.score,
                cause,
            });
        }

        events
    }
}

/// Apply one tick's input, then advance the simulation
pub fn tick(sim: &mut Simulation, input: &TickInput, dt: f32, now: f64) -> Vec<GameEvent> {
    if input.flap {
        sim.flap();
    }
    sim.update(dt, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::collision::CollisionKind;
    use crate::sim::obstacle::Obstacle;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;

    const DT: f32 = 0.016;
    const FRAME_MS: f64 = 16.0;

    fn running(tuning: Tuning) -> Simulation {
        let mut sim = Simulation::new(tuning, Viewport::default(), 99);
        sim.start(0.0);
        sim
    }

    /// Obstacle whose right edge is just right of the avatar, gap around it
    fn about_to_pass(id: u32) -> Obstacle {
        Obstacle {
            id,
            x: AVATAR_X - OBSTACLE_WIDTH + 0.5,
            width: OBSTACLE_WIDTH,
            top_height: 150.0,
            gap: OBSTACLE_GAP,
            scored: false,
        }
    }

    #[test]
    fn test_update_noop_when_not_running() {
        let mut sim = Simulation::new(Tuning::default(), Viewport::default(), 1);
        assert!(sim.update(DT, 0.0).is_empty());
        assert_eq!(sim.avatar().velocity, 0.0);
        assert_eq!(sim.time_ticks(), 0);
    }

    #[test]
    fn test_velocity_grows_by_gravity_per_tick_regardless_of_dt() {
        let mut sim = running(Tuning::default());
        sim.update(0.001, 1.0);
        assert_eq!(sim.avatar().velocity, GRAVITY);
        sim.update(0.09, 2.0);
        assert_eq!(sim.avatar().velocity, 2.0 * GRAVITY);
    }

    #[test]
    fn test_obstacles_move_by_speed_times_dt() {
        let mut sim = running(Tuning::default());
        sim.update(0.5, 1.0);
        assert_eq!(sim.obstacles()[0].x, 800.0 - BASE_SPEED * 0.5);
    }

    #[test]
    fn test_spawn_event_after_interval() {
        let mut sim = running(Tuning::default());
        assert!(sim.update(DT, 1_000.0).is_empty());
        let events = sim.update(DT, 1_500.0);
        assert!(events.contains(&GameEvent::Spawned { id: 2 }));
        assert_eq!(sim.obstacles().len(), 2);
    }

    #[test]
    fn test_score_once_per_obstacle() {
        let mut sim = running(Tuning::default());
        sim.stream.reset(0.0);
        sim.stream.push_for_test(about_to_pass(10));
        sim.avatar.pos.y = 200.0;

        let events = sim.update(DT, 1.0);
        assert!(events.contains(&GameEvent::Scored { id: 10, score: 1 }));
        assert_eq!(sim.score(), 1);

        for i in 0..5 {
            sim.avatar.pos.y = 200.0;
            sim.avatar.velocity = 0.0;
            let events = sim.update(DT, 2.0 + i as f64);
            assert!(!events.iter().any(|e| matches!(e, GameEvent::Scored { .. })));
        }
        assert_eq!(sim.score(), 1);
        assert_eq!(sim.phase(), GamePhase::Running);
    }

    #[test]
    fn test_speed_after_five_points_with_step_one() {
        let tuning = Tuning {
            speed_score_step: 1,
            ..Default::default()
        };
        let mut sim = running(tuning);
        sim.stream.reset(0.0);
        for id in 1..=5 {
            sim.stream.push_for_test(about_to_pass(id));
        }
        sim.avatar.pos.y = 200.0;
        sim.update(DT, 1.0);
        assert_eq!(sim.score(), 5);
        assert_eq!(sim.speed(), BASE_SPEED + 5.0 * SPEED_INCREMENT);
    }

    #[test]
    fn test_speed_ramps_only_on_step_multiples() {
        let tuning = Tuning {
            speed_score_step: 3,
            ..Default::default()
        };
        let mut sim = running(tuning);
        sim.stream.reset(0.0);
        for id in 1..=7 {
            sim.stream.push_for_test(about_to_pass(id));
        }
        sim.avatar.pos.y = 200.0;
        let events = sim.update(DT, 1.0);
        let speedups = events
            .iter()
            .filter(|e| matches!(e, GameEvent::SpeedUp { .. }))
            .count();
        assert_eq!(speedups, 2);
        assert_eq!(sim.speed(), BASE_SPEED + 2.0 * SPEED_INCREMENT);
    }

    #[test]
    fn test_obstacle_collision_ends_run() {
        let mut sim = running(Tuning::default());
        sim.stream.reset(0.0);
        sim.stream.push_for_test(Obstacle {
            id: 5,
            x: 120.0,
            width: OBSTACLE_WIDTH,
            top_height: 100.0,
            gap: OBSTACLE_GAP,
            scored: false,
        });
        sim.avatar.pos.y = 0.0;
        sim.avatar.velocity = -1.0;
        let events = sim.update(DT, 1.0);
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver {
                score: 0,
                cause: CollisionKind::Obstacle { id: 5 }
            })
        );
        assert_eq!(sim.phase(), GamePhase::Over);
    }

    #[test]
    fn test_fall_to_ground_game_over_once() {
        let mut sim = running(Tuning::default());
        let mut game_overs = 0;
        let mut over_at = None;
        for i in 1..=100u32 {
            let events = sim.update(DT, i as f64 * FRAME_MS);
            for e in &events {
                if let GameEvent::GameOver { cause, .. } = e {
                    assert_eq!(*cause, CollisionKind::Ground);
                    game_overs += 1;
                    over_at.get_or_insert(i);
                }
            }
        }
        assert_eq!(game_overs, 1);
        assert_eq!(sim.phase(), GamePhase::Over);
        // 0.125 * n * (n + 1) >= 200 first holds at n = 40
        assert_eq!(over_at, Some(40));
        assert_eq!(sim.time_ticks(), 40);
    }

    #[test]
    fn test_tick_applies_flap_before_integrating() {
        let mut sim = running(Tuning::default());
        sim.avatar.velocity = 10.0;
        tick(&mut sim, &TickInput { flap: true }, DT, 1.0);
        assert_eq!(sim.avatar().velocity, FLAP_FORCE + GRAVITY);
        assert_eq!(sim.avatar().pos.y, AVATAR_START_Y + FLAP_FORCE + GRAVITY);
    }

    #[test]
    fn test_flapping_keeps_avatar_alive() {
        let mut sim = running(Tuning::default());
        // Flap whenever the avatar sinks below its start height
        for i in 1..=60u32 {
            let flap = sim.avatar().pos.y > AVATAR_START_Y;
            tick(&mut sim, &TickInput { flap }, DT, i as f64 * FRAME_MS);
        }
        assert_eq!(sim.phase(), GamePhase::Running);
    }
}
