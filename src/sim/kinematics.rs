//! Lateral car physics
//!
//! Time-scaled acceleration/friction model. `dt_ticks` is elapsed time in
//! units of the nominal 60 Hz frame, so 1.0 reproduces one classic frame.

use super::state::Player;
use super::tick::TickInput;
use crate::consts::VELOCITY_EPSILON;
use crate::tuning::GameTuning;

/// Move `velocity` toward zero by `amount` without crossing it
#[inline]
fn brake(velocity: f32, amount: f32) -> f32 {
    if velocity > 0.0 {
        (velocity - amount).max(0.0)
    } else {
        (velocity + amount).min(0.0)
    }
}

impl Player {
    /// Integrate one tick of steering input into velocity and position
    pub fn update(&mut self, input: &TickInput, dt_ticks: f32, tuning: &GameTuning) {
        let dt = dt_ticks.max(0.0);

        if input.steer_left {
            // Damp a rightward slide before accelerating left
            if self.velocity > 0.0 {
                self.velocity = brake(self.velocity, tuning.deceleration_rate * dt * 2.0);
            }
            self.velocity -= tuning.acceleration * dt;
        } else if input.steer_right {
            if self.velocity < 0.0 {
                self.velocity = brake(self.velocity, tuning.deceleration_rate * dt * 2.0);
            }
            self.velocity += tuning.acceleration * dt;
        } else {
            self.velocity *= tuning.friction.powf(dt);
            if self.velocity.abs() < VELOCITY_EPSILON {
                self.velocity = 0.0;
            }
        }

        self.velocity = self.velocity.clamp(-tuning.max_speed, tuning.max_speed);

        self.pos.x += self.velocity * dt;
        self.pos.x = self.pos.x.clamp(tuning.min_car_x(), tuning.max_car_x());
    }

    /// Render tilt hint (radians), proportional to lateral velocity
    pub fn tilt(&self) -> f32 {
        self.velocity * crate::consts::TILT_PER_VELOCITY
    }
}
