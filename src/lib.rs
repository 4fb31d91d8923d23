//! Lane Rush - A vertically scrolling lane-dodging arcade racer
//!
//! Core modules:
//! - `sim`: Game loop core (kinematics, traffic, collisions, scoring, phases)
//! - `session`: Host-facing driver that owns a world, its clock and its stores
//! - `renderer`: WebGPU rendering of render snapshots
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Best-score storage
//! - `leaderboard`: Time-windowed local leaderboard
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use session::Session;
pub use settings::Settings;
pub use tuning::GameTuning;

/// Game configuration constants
pub mod consts {
    /// Nominal frame period (60 Hz); one "tick" of physics at dt = 1.0
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Upper bound on dt (in ticks) so a resumed tab can't teleport the car
    pub const MAX_DT_TICKS: f32 = 2.0;

    /// Play area dimensions
    pub const PLAY_WIDTH: f32 = 400.0;
    pub const PLAY_HEIGHT: f32 = 700.0;
    /// Shoulder + curb on each side of the road
    pub const ROAD_MARGIN: f32 = 55.0;
    pub const LANE_MIN_X: f32 = ROAD_MARGIN;
    pub const LANE_MAX_X: f32 = PLAY_WIDTH - ROAD_MARGIN;
    pub const LANE_COUNT: u32 = 4;

    /// Car box (player and traffic share it)
    pub const CAR_WIDTH: f32 = 35.0;
    pub const CAR_HEIGHT: f32 = 70.0;
    pub const PLAYER_BOTTOM_OFFSET: f32 = 150.0;

    /// Player physics (units per tick)
    pub const PLAYER_MAX_SPEED: f32 = 8.0;
    pub const PLAYER_ACCELERATION: f32 = 0.5;
    pub const PLAYER_FRICTION: f32 = 0.85;
    pub const PLAYER_DECELERATION_RATE: f32 = 0.8;
    /// Velocities smaller than this snap to zero when coasting
    pub const VELOCITY_EPSILON: f32 = 0.1;
    /// Render tilt (radians) per unit of velocity
    pub const TILT_PER_VELOCITY: f32 = 0.05;

    /// Traffic spawning
    pub const BASE_SPAWN_INTERVAL_MS: f64 = 1000.0;
    pub const SPAWN_REDUCTION_PER_POINT_MS: f64 = 5.0;
    pub const MAX_SPAWN_REDUCTION_MS: f64 = 400.0;
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 600.0;
    pub const MIN_SPAWN_SPACING: f32 = 10.0;
    pub const SPAWN_ATTEMPTS: u32 = 10;
    pub const FAST_OBSTACLE_CHANCE: f64 = 0.1;
    pub const FAST_OBSTACLE_MULTIPLIER: f32 = 1.2;

    /// Traffic closing speed (units per tick)
    pub const NORMAL_SCROLL_SPEED: f32 = 5.0;
    pub const BOOST_SCROLL_SPEED: f32 = 12.0;
    pub const ROAD_SCROLL_FACTOR: f32 = 0.2;
}
