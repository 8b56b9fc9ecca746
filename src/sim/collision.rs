//! Collision detection
//!
//! Axis-aligned boxes only: the avatar against the ground line and against
//! each obstacle's two barriers.

use serde::{Deserialize, Serialize};

use super::avatar::Avatar;
use super::obstacle::Obstacle;
use super::state::Viewport;
use crate::tuning::Tuning;

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    Ground,
    Obstacle { id: u32 },
}

/// Avatar bottom edge at or below the ground line
pub fn hits_ground(avatar: &Avatar, viewport: &Viewport, tuning: &Tuning) -> bool {
    avatar.bottom() >= viewport.ground_y(tuning)
}

/// Avatar overlaps the obstacle horizontally and is not fully inside its gap
pub fn hits_obstacle(avatar: &Avatar, obstacle: &Obstacle) -> bool {
    let overlaps_x = avatar.left() < obstacle.right() && avatar.right() > obstacle.x;
    overlaps_x && !obstacle.gap_contains(avatar.top(), avatar.bottom())
}

/// Check the ground first, then obstacles in order; first hit wins
pub fn check_collision(
    avatar: &Avatar,
    obstacles: &[Obstacle],
    viewport: &Viewport,
    tuning: &Tuning,
) -> Option<CollisionKind> {
    if hits_ground(avatar, viewport, tuning) {
        return Some(CollisionKind::Ground);
    }
    obstacles
        .iter()
        .find(|o| hits_obstacle(avatar, o))
        .map(|o| CollisionKind::Obstacle { id: o.id })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Avatar, Viewport, Tuning) {
        let t = Tuning::default();
        (Avatar::new(&t), Viewport::new(800.0, 600.0), t)
    }

    fn obstacle_at(x: f32, top_height: f32) -> Obstacle {
        Obstacle {
            id: 9,
            x,
            width: 80.0,
            top_height,
            gap: 250.0,
            scored: false,
        }
    }

    #[test]
    fn test_ground_collision_one_unit_past_line() {
        let (mut a, vp, t) = setup();
        a.pos.y = vp.height - t.ground_height - a.size.y + 1.0;
        a.velocity = 0.0;
        assert!(hits_ground(&a, &vp, &t));
        assert_eq!(check_collision(&a, &[], &vp, &t), Some(CollisionKind::Ground));
    }

    #[test]
    fn test_ground_collision_touching_line() {
        let (mut a, vp, t) = setup();
        a.pos.y = vp.height - t.ground_height - a.size.y;
        assert!(hits_ground(&a, &vp, &t));
        a.pos.y -= 1.0;
        assert!(!hits_ground(&a, &vp, &t));
    }

    #[test]
    fn test_inside_gap_is_safe() {
        let (mut a, vp, t) = setup();
        let o = obstacle_at(90.0, 200.0);
        a.pos.y = 200.0;
        assert!(!hits_obstacle(&a, &o));
        a.pos.y = 400.0; // bottom at 450, gap ends at 450
        assert!(!hits_obstacle(&a, &o));
        assert_eq!(check_collision(&a, &[o], &vp, &t), None);
    }

    #[test]
    fn test_top_barrier_hit() {
        let (mut a, vp, t) = setup();
        let o = obstacle_at(120.0, 100.0);
        a.pos.y = 0.0;
        assert!(hits_obstacle(&a, &o));
        assert_eq!(
            check_collision(&a, std::slice::from_ref(&o), &vp, &t),
            Some(CollisionKind::Obstacle { id: 9 })
        );
    }

    #[test]
    fn test_bottom_barrier_hit() {
        let (mut a, _, _) = setup();
        let o = obstacle_at(60.0, 100.0);
        a.pos.y = 320.0; // bottom 370 > 350
        assert!(hits_obstacle(&a, &o));
    }

    #[test]
    fn test_no_horizontal_overlap_is_safe() {
        let (mut a, _, _) = setup();
        a.pos.y = 0.0;
        // Obstacle entirely to the right, touching edges only
        assert!(!hits_obstacle(&a, &obstacle_at(150.0, 100.0)));
        // Entirely to the left
        assert!(!hits_obstacle(&a, &obstacle_at(20.0, 100.0)));
    }

    #[test]
    fn test_ground_reported_before_obstacle() {
        let (mut a, vp, t) = setup();
        a.pos.y = 560.0;
        let o = obstacle_at(100.0, 100.0);
        assert_eq!(check_collision(&a, &[o], &vp, &t), Some(CollisionKind::Ground));
    }
}
