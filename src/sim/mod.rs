//! Game loop core
//!
//! All gameplay logic lives here. This module must stay headless:
//! - Time arrives as explicit `now_ms` / `dt_ticks` arguments
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod kinematics;
pub mod score;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, check};
pub use score::{ScoreState, reap_passed};
pub use snapshot::{LatestSnapshot, ObstacleView, RenderSink, RenderSnapshot};
pub use spawner::{maybe_spawn, place_lateral, spawn_interval};
pub use state::{GameEvent, GamePhase, GameWorld, Obstacle, Player};
pub use tick::{TickInput, tick};
