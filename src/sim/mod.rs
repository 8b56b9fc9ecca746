//! Simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - Avatar integration is one fixed step per tick
//! - Obstacle motion is speed * dt, spawning is wall-clock based
//! - Seeded RNG only

pub mod avatar;
pub mod collision;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use avatar::Avatar;
pub use collision::{CollisionKind, check_collision, hits_ground, hits_obstacle};
pub use obstacle::{Obstacle, ObstacleStream};
pub use state::{GameEvent, GamePhase, Simulation, Snapshot, Viewport};
pub use tick::{TickInput, tick};
