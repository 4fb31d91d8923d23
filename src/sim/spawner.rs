//! Traffic spawning
//!
//! Obstacles arrive on a score-dependent cadence. Lateral placement retries a
//! bounded number of times to keep cars apart, then takes whatever it last
//! sampled. Occasional overlaps are part of the difficulty curve.

use glam::Vec2;
use rand::Rng;

use super::state::{GameWorld, Obstacle};
use crate::tuning::GameTuning;

/// Time between spawns for the given score, in ms
///
/// Non-increasing in `score` and never below `min_spawn_interval_ms`.
pub fn spawn_interval(score: u64, tuning: &GameTuning) -> f64 {
    let reduction =
        (score as f64 * tuning.spawn_reduction_per_point_ms).min(tuning.max_spawn_reduction_ms);
    (tuning.base_spawn_interval_ms - reduction).max(tuning.min_spawn_interval_ms)
}

/// Whether `x` keeps the required gap from every obstacle in `existing`
pub fn is_clear(x: f32, existing: &[Obstacle], tuning: &GameTuning) -> bool {
    let min_gap = tuning.car_width + tuning.min_spacing;
    existing.iter().all(|o| (o.pos.x - x).abs() >= min_gap)
}

/// Pick a lateral position for a new obstacle
///
/// Returns the x and whether it satisfied the spacing rule.
pub fn place_lateral<R: Rng + ?Sized>(
    rng: &mut R,
    existing: &[Obstacle],
    tuning: &GameTuning,
) -> (f32, bool) {
    let min_x = tuning.min_car_x();
    let max_x = tuning.max_car_x();

    let mut x = min_x;
    for _ in 0..tuning.spawn_attempts.max(1) {
        x = if max_x > min_x {
            rng.random_range(min_x..max_x)
        } else {
            min_x
        };
        if is_clear(x, existing, tuning) {
            return (x, true);
        }
    }
    (x, false)
}

/// Spawn a new obstacle if the interval since the last one has elapsed
///
/// The obstacle is pushed into the world; a copy is returned for the caller.
pub fn maybe_spawn(world: &mut GameWorld, now_ms: f64, tuning: &GameTuning) -> Option<Obstacle> {
    let interval = spawn_interval(world.score.current, tuning);
    if now_ms - world.last_spawn_ms < interval {
        return None;
    }

    let (x, clear) = place_lateral(&mut world.rng, &world.obstacles, tuning);
    if !clear {
        log::debug!("Spawn placement exhausted attempts, accepting x = {:.1}", x);
    }

    let speed_multiplier = if world.rng.random_bool(tuning.fast_chance) {
        tuning.fast_multiplier
    } else {
        1.0
    };

    let id = world.next_entity_id();
    let obstacle = Obstacle {
        id,
        pos: Vec2::new(x, -tuning.car_height),
        width: tuning.car_width,
        height: tuning.car_height,
        speed_multiplier,
    };
    world.obstacles.push(obstacle.clone());
    world.last_spawn_ms = now_ms;

    Some(obstacle)
}
