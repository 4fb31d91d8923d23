//! Game state and core simulation types
//!
//! Everything one running game owns lives in [`GameWorld`]. Nothing here is
//! global, so any number of worlds can run side by side.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::score::ScoreState;
use crate::tuning::GameTuning;

/// Current phase of the episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first steer/boost input
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// World frozen, waiting for the resume toggle
    Paused,
    /// Crashed; waiting for restart
    Over,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "idle",
            GamePhase::Running => "running",
            GamePhase::Paused => "paused",
            GamePhase::Over => "over",
        }
    }
}

/// Lifecycle and scoring notifications emitted by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Idle -> Running
    Started,
    Paused,
    Resumed,
    /// A new obstacle entered the road
    Spawned { id: u32, fast: bool },
    /// Obstacles passed the player this tick
    Scored { points: u64, total: u64, boosted: bool },
    /// Running -> Over
    Crashed { score: u64, new_best: bool },
    /// Over -> Idle
    Restarted,
}

/// The player's car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the car box
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Lateral velocity in units per tick (negative = left)
    pub velocity: f32,
}

impl Player {
    /// Car parked in the middle of the road near the bottom edge
    pub fn new(tuning: &GameTuning) -> Self {
        let x = (tuning.play_width / 2.0 - tuning.car_width / 2.0)
            .clamp(tuning.min_car_x(), tuning.max_car_x());
        Self {
            pos: Vec2::new(x, tuning.play_height - tuning.player_bottom_offset),
            width: tuning.car_width,
            height: tuning.car_height,
            velocity: 0.0,
        }
    }
}

/// An oncoming car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Top-left corner; x is fixed for the obstacle's lifetime
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Multiplier on the traffic speed, sampled at spawn
    pub speed_multiplier: f32,
}

impl Obstacle {
    /// Whether this is one of the occasional faster cars
    pub fn is_fast(&self) -> bool {
        self.speed_multiplier > 1.0
    }

    /// Move down the screen by `speed * multiplier * dt_ticks`
    pub fn advance(&mut self, speed: f32, dt_ticks: f32) {
        self.pos.y += speed * self.speed_multiplier * dt_ticks;
    }
}

/// Complete state of one game instance
#[derive(Debug, Clone)]
pub struct GameWorld {
    /// Seed the RNG was created from
    pub seed: u64,
    pub phase: GamePhase,
    pub player: Player,
    /// Active traffic, in spawn order
    pub obstacles: Vec<Obstacle>,
    pub score: ScoreState,
    /// Clock reading (ms) of the last spawn, or of the episode start
    pub last_spawn_ms: f64,
    /// Clock reading when the current pause began
    pub paused_at_ms: Option<f64>,
    /// Scroll phase of the road texture, for the renderer
    pub road_offset: f32,
    /// Whether boost was held during the last running tick
    pub boosting: bool,
    /// Running ticks processed
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameWorld {
    /// Create a fresh world in the Idle phase
    pub fn new(seed: u64, tuning: &GameTuning) -> Self {
        Self {
            seed,
            phase: GamePhase::Idle,
            player: Player::new(tuning),
            obstacles: Vec::new(),
            score: ScoreState::default(),
            last_spawn_ms: 0.0,
            paused_at_ms: None,
            road_offset: 0.0,
            boosting: false,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Create a world whose best score was loaded from storage
    pub fn with_best(seed: u64, tuning: &GameTuning, best: u64) -> Self {
        let mut world = Self::new(seed, tuning);
        world.score.best = best;
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put the episode back to its starting layout; best score survives
    pub fn reset(&mut self, now_ms: f64, tuning: &GameTuning) {
        self.phase = GamePhase::Idle;
        self.player = Player::new(tuning);
        self.obstacles.clear();
        self.score.current = 0;
        self.last_spawn_ms = now_ms;
        self.paused_at_ms = None;
        self.road_offset = 0.0;
        self.boosting = false;
    }
}
