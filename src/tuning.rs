//! Data-driven game balance
//!
//! Every number the simulation reads lives in [`GameTuning`]. The defaults
//! mirror [`crate::consts`]; a host may override any subset from JSON.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    // === Play area ===
    pub play_width: f32,
    pub play_height: f32,
    /// Left edge of the drivable lane bound
    pub lane_min_x: f32,
    /// Right edge of the drivable lane bound
    pub lane_max_x: f32,

    // === Player ===
    pub car_width: f32,
    pub car_height: f32,
    /// Distance from the bottom of the play area to the car's top edge
    pub player_bottom_offset: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    /// Per-tick velocity retention when no steering is held
    pub friction: f32,
    /// Extra braking applied when steering against the current velocity
    pub deceleration_rate: f32,

    // === Traffic ===
    pub base_spawn_interval_ms: f64,
    pub spawn_reduction_per_point_ms: f64,
    pub max_spawn_reduction_ms: f64,
    pub min_spawn_interval_ms: f64,
    pub min_spacing: f32,
    pub spawn_attempts: u32,
    pub fast_chance: f64,
    pub fast_multiplier: f32,

    // === Scrolling ===
    pub normal_scroll_speed: f32,
    pub boost_scroll_speed: f32,
    /// Road texture scrolls at this fraction of traffic speed
    pub road_scroll_factor: f32,

    // === Scoring ===
    pub points_per_obstacle: u64,
    pub boost_points_per_obstacle: u64,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            play_width: PLAY_WIDTH,
            play_height: PLAY_HEIGHT,
            lane_min_x: LANE_MIN_X,
            lane_max_x: LANE_MAX_X,

            car_width: CAR_WIDTH,
            car_height: CAR_HEIGHT,
            player_bottom_offset: PLAYER_BOTTOM_OFFSET,
            max_speed: PLAYER_MAX_SPEED,
            acceleration: PLAYER_ACCELERATION,
            friction: PLAYER_FRICTION,
            deceleration_rate: PLAYER_DECELERATION_RATE,

            base_spawn_interval_ms: BASE_SPAWN_INTERVAL_MS,
            spawn_reduction_per_point_ms: SPAWN_REDUCTION_PER_POINT_MS,
            max_spawn_reduction_ms: MAX_SPAWN_REDUCTION_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            min_spacing: MIN_SPAWN_SPACING,
            spawn_attempts: SPAWN_ATTEMPTS,
            fast_chance: FAST_OBSTACLE_CHANCE,
            fast_multiplier: FAST_OBSTACLE_MULTIPLIER,

            normal_scroll_speed: NORMAL_SCROLL_SPEED,
            boost_scroll_speed: BOOST_SCROLL_SPEED,
            road_scroll_factor: ROAD_SCROLL_FACTOR,

            points_per_obstacle: 1,
            boost_points_per_obstacle: 2,
        }
    }
}

impl GameTuning {
    /// HUD callout shown while boost multiplies the payout, if it does
    pub fn boost_callout(&self) -> Option<String> {
        let base = self.points_per_obstacle.max(1);
        let boosted = self.boost_points_per_obstacle;
        if boosted <= base {
            return None;
        }
        if boosted % base == 0 {
            Some(format!("{}x POINTS", boosted / base))
        } else {
            Some(format!("+{} POINTS", boosted))
        }
    }

    /// Parse overrides from JSON; unknown or invalid input yields defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<GameTuning>(json) {
            Ok(tuning) => tuning.sanitized(),
            Err(e) => {
                log::warn!("Ignoring invalid tuning overrides: {}", e);
                Self::default()
            }
        }
    }

    /// Clamp values into ranges the simulation can work with
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.play_width > 0.0) {
            self.play_width = defaults.play_width;
        }
        if !(self.play_height > 0.0) {
            self.play_height = defaults.play_height;
        }
        if !(self.car_width > 0.0) {
            self.car_width = defaults.car_width;
        }
        if !(self.car_height > 0.0) {
            self.car_height = defaults.car_height;
        }

        self.lane_min_x = self.lane_min_x.clamp(0.0, self.play_width);
        self.lane_max_x = self.lane_max_x.clamp(0.0, self.play_width);
        // Lane must fit at least one car
        if self.lane_max_x - self.lane_min_x < self.car_width {
            self.lane_min_x = 0.0;
            self.lane_max_x = self.play_width.max(self.car_width);
        }

        self.max_speed = self.max_speed.abs();
        self.acceleration = self.acceleration.abs();
        self.deceleration_rate = self.deceleration_rate.abs();
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            self.friction = defaults.friction;
        }

        self.min_spawn_interval_ms = self.min_spawn_interval_ms.max(1.0);
        self.base_spawn_interval_ms = self.base_spawn_interval_ms.max(self.min_spawn_interval_ms);
        self.spawn_reduction_per_point_ms = self.spawn_reduction_per_point_ms.max(0.0);
        self.max_spawn_reduction_ms = self.max_spawn_reduction_ms.max(0.0);
        self.min_spacing = self.min_spacing.max(0.0);
        self.spawn_attempts = self.spawn_attempts.max(1);
        self.fast_chance = self.fast_chance.clamp(0.0, 1.0);
        self.fast_multiplier = self.fast_multiplier.max(0.0);

        self.normal_scroll_speed = self.normal_scroll_speed.max(0.0);
        self.boost_scroll_speed = self.boost_scroll_speed.max(0.0);
        self.road_scroll_factor = self.road_scroll_factor.max(0.0);

        self
    }

    /// Leftmost legal x for a car's left edge
    #[inline]
    pub fn min_car_x(&self) -> f32 {
        self.lane_min_x
    }

    /// Rightmost legal x for a car's left edge
    #[inline]
    pub fn max_car_x(&self) -> f32 {
        (self.lane_max_x - self.car_width).max(self.lane_min_x)
    }

    /// Traffic speed in units per nominal tick
    pub fn scroll_speed(&self, boost: bool) -> f32 {
        if boost {
            self.boost_scroll_speed
        } else {
            self.normal_scroll_speed
        }
    }

    /// Points for one obstacle that made it past the player
    pub fn points_per_obstacle(&self, boost: bool) -> u64 {
        if boost {
            self.boost_points_per_obstacle
        } else {
            self.points_per_obstacle
        }
    }
}
