//! Per-frame simulation step
//!
//! `tick` is the whole game loop core: it drives the phase machine and, only
//! while Running, the kinematics -> spawn -> advance -> collision -> scoring
//! pipeline.

use serde::{Deserialize, Serialize};

use super::collision;
use super::score::reap_passed;
use super::spawner::maybe_spawn;
use super::state::{GameEvent, GamePhase, GameWorld};
use crate::tuning::GameTuning;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Steer left (held)
    pub steer_left: bool,
    /// Steer right (held)
    pub steer_right: bool,
    /// Speed boost (held)
    pub boost: bool,
    /// Pause/resume (one-shot)
    pub pause_toggle: bool,
    /// Restart after a crash (one-shot)
    pub restart: bool,
}

impl TickInput {
    /// Any input that starts a run from Idle
    pub fn wants_drive(&self) -> bool {
        self.steer_left || self.steer_right || self.boost
    }
}

/// Advance the world by one frame
///
/// `now_ms` is the host clock reading for this frame and `dt_ticks` the
/// clamped elapsed time in nominal frames. Returns the events this tick
/// produced, in order.
pub fn tick(
    world: &mut GameWorld,
    input: &TickInput,
    now_ms: f64,
    dt_ticks: f32,
    tuning: &GameTuning,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match world.phase {
        GamePhase::Idle => {
            if !input.wants_drive() {
                return events;
            }
            world.phase = GamePhase::Running;
            world.last_spawn_ms = now_ms;
            events.push(GameEvent::Started);
            log::info!("Run started (best {})", world.score.best);
        }
        GamePhase::Paused => {
            if input.pause_toggle {
                world.phase = GamePhase::Running;
                // Paused time does not count toward the spawn interval
                if let Some(paused_at) = world.paused_at_ms.take() {
                    world.last_spawn_ms += (now_ms - paused_at).max(0.0);
                }
                events.push(GameEvent::Resumed);
                log::info!("Resumed");
            }
            return events;
        }
        GamePhase::Over => {
            if input.restart {
                world.reset(now_ms, tuning);
                events.push(GameEvent::Restarted);
                log::info!("Restarted");
            }
            return events;
        }
        GamePhase::Running => {
            if input.pause_toggle {
                world.phase = GamePhase::Paused;
                world.paused_at_ms = Some(now_ms);
                events.push(GameEvent::Paused);
                log::info!("Paused at score {}", world.score.current);
                return events;
            }
        }
    }

    world.time_ticks += 1;
    world.boosting = input.boost;

    world.player.update(input, dt_ticks, tuning);

    if let Some(spawned) = maybe_spawn(world, now_ms, tuning) {
        log::debug!(
            "Spawned obstacle {} at x = {:.1}{}",
            spawned.id,
            spawned.pos.x,
            if spawned.is_fast() { " (fast)" } else { "" }
        );
        events.push(GameEvent::Spawned {
            id: spawned.id,
            fast: spawned.is_fast(),
        });
    }

    let speed = tuning.scroll_speed(input.boost);
    for obstacle in &mut world.obstacles {
        obstacle.advance(speed, dt_ticks);
    }
    world.road_offset =
        (world.road_offset + speed * tuning.road_scroll_factor * dt_ticks) % tuning.play_height;

    if let Some(hit) = collision::check(&world.player, &world.obstacles) {
        let hit_id = hit.id;
        world.phase = GamePhase::Over;
        let new_best = world.score.end_episode();
        log::info!(
            "Crashed into obstacle {} with score {}{}",
            hit_id,
            world.score.current,
            if new_best { " (new best!)" } else { "" }
        );
        events.push(GameEvent::Crashed {
            score: world.score.current,
            new_best,
        });
        return events;
    }

    let points = reap_passed(
        &mut world.obstacles,
        tuning.play_height,
        tuning.points_per_obstacle(input.boost),
    );
    if points > 0 {
        world.score.add(points);
        events.push(GameEvent::Scored {
            points,
            total: world.score.current,
            boosted: input.boost,
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;
    use glam::Vec2;

    fn right() -> TickInput {
        TickInput {
            steer_right: true,
            ..Default::default()
        }
    }

    fn pause() -> TickInput {
        TickInput {
            pause_toggle: true,
            ..Default::default()
        }
    }

    fn running_world(tuning: &GameTuning) -> GameWorld {
        let mut world = GameWorld::new(12345, tuning);
        tick(&mut world, &right(), 0.0, 1.0, tuning);
        assert_eq!(world.phase, GamePhase::Running);
        world
    }

    fn far_lane_obstacle(world: &mut GameWorld, y: f32, tuning: &GameTuning) {
        // Keep it away from the centered player
        let id = world.next_entity_id();
        world.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(tuning.min_car_x(), y),
            width: tuning.car_width,
            height: tuning.car_height,
            speed_multiplier: 1.0,
        });
    }

    #[test]
    fn test_idle_waits_for_input() {
        let tuning = GameTuning::default();
        let mut world = GameWorld::new(1, &tuning);
        assert_eq!(world.phase, GamePhase::Idle);
        assert_eq!(world.score.current, 0);

        for i in 0..10 {
            let events = tick(&mut world, &TickInput::default(), i as f64 * 16.0, 1.0, &tuning);
            assert!(events.is_empty());
        }
        assert_eq!(world.phase, GamePhase::Idle);
        assert_eq!(world.time_ticks, 0);

        // Pause and restart are ignored while idle
        tick(&mut world, &pause(), 200.0, 1.0, &tuning);
        assert_eq!(world.phase, GamePhase::Idle);
    }

    #[test]
    fn test_first_steer_starts_run() {
        let tuning = GameTuning::default();
        let mut world = GameWorld::new(1, &tuning);

        let events = tick(&mut world, &right(), 4321.0, 1.0, &tuning);
        assert_eq!(world.phase, GamePhase::Running);
        assert_eq!(world.last_spawn_ms, 4321.0);
        assert_eq!(events, vec![GameEvent::Started]);
    }

    #[test]
    fn test_boost_starts_run() {
        let tuning = GameTuning::default();
        let mut world = GameWorld::new(1, &tuning);
        let boost = TickInput {
            boost: true,
            ..Default::default()
        };
        tick(&mut world, &boost, 0.0, 1.0, &tuning);
        assert_eq!(world.phase, GamePhase::Running);
    }

    #[test]
    fn test_pause_round_trip() {
        let tuning = GameTuning::default();
        let mut world = running_world(&tuning);

        assert_eq!(tick(&mut world, &pause(), 16.0, 1.0, &tuning), vec![GameEvent::Paused]);
        assert_eq!(world.phase, GamePhase::Paused);

        // Steering does not resume
        tick(&mut world, &right(), 32.0, 1.0, &tuning);
        assert_eq!(world.phase, GamePhase::Paused);

        assert_eq!(tick(&mut world, &pause(), 48.0, 1.0, &tuning), vec![GameEvent::Resumed]);
        assert_eq!(world.phase, GamePhase::Running);
    }

    #[test]
    fn test_pause_does_not_advance_spawn_clock() {
        let tuning = GameTuning::default();
        let mut world = running_world(&tuning);

        // 900 ms into a 1000 ms interval, then a long pause
        tick(&mut world, &TickInput::default(), 900.0, 1.0, &tuning);
        tick(&mut world, &pause(), 900.0, 1.0, &tuning);
        tick(&mut world, &pause(), 10_900.0, 1.0, &tuning);
        assert_eq!(world.phase, GamePhase::Running);
        assert_eq!(world.last_spawn_ms, 10_000.0);

        let events = tick(&mut world, &TickInput::default(), 10_950.0, 1.0, &tuning);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Spawned { .. })));
        assert!(world.obstacles.is_empty());

        // The remaining 100 ms still has to elapse
        let events = tick(&mut world, &TickInput::default(), 11_000.0, 1.0, &tuning);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Spawned { .. })));
    }

    #[test]
    fn test_pause_freezes_world() {
        let tuning = GameTuning::default();
        let mut world = running_world(&tuning);
        for i in 1..30 {
            tick(&mut world, &right(), i as f64 * 100.0, 1.0, &tuning);
        }
        far_lane_obstacle(&mut world, 100.0, &tuning);
        tick(&mut world, &pause(), 3000.0, 1.0, &tuning);

        let player = world.player.clone();
        let obstacles = world.obstacles.clone();
        let score = world.score;
        let last_spawn = world.last_spawn_ms;

        let held = TickInput {
            steer_left: true,
            boost: true,
            ..Default::default()
        };
        for i in 0..100 {
            tick(&mut world, &held, 3000.0 + i as f64 * 500.0, 2.0, &tuning);
        }

        assert_eq!(world.phase, GamePhase::Paused);
        assert_eq!(world.player, player);
        assert_eq!(world.obstacles, obstacles);
        assert_eq!(world.score, score);
        assert_eq!(world.last_spawn_ms, last_spawn);
    }

    #[test]
    fn test_passing_obstacle_scores_one() {
        let tuning = GameTuning::default();
        let mut world = running_world(&tuning);
        far_lane_obstacle(&mut world, tuning.play_height - 0.5, &tuning);

        let events = tick(&mut world, &TickInput::default(), 10.0, 1.0, &tuning);
        assert_eq!(world.score.current, 1);
        assert!(events.contains(&GameEvent::Scored {
            points: 1,
            total: 1,
            boosted: false,
        }));
        assert!(world.obstacles.is_empty());
    }

    #[test]
    fn test_passing_obstacle_with_boost_scores_two() {
        let tuning = GameTuning::default();
        let mut world = running_world(&tuning);
        far_lane_obstacle(&mut world, tuning.play_height - 0.5, &tuning);

        let boost = TickInput {
            boost: true,
            ..Default::default()
        };
        let events = tick(&mut world, &boost, 10.0, 1.0, &tuning);
        assert_eq!(world.score.current, 2);
        assert!(world.boosting);
        assert!(events.contains(&GameEvent::Scored {
            points: 2,
            total: 2,
            boosted: true,
        }));
    }

    #[test]
    fn test_two_cars_passing_together_are_not_boosted() {
        let tuning = GameTuning::default();
        let mut world = running_world(&tuning);
        far_lane_obstacle(&mut world, tuning.play_height - 0.5, &tuning);
        far_lane_obstacle(&mut world, tuning.play_height - 1.0, &tuning);

        let events = tick(&mut world, &TickInput::default(), 10.0, 1.0, &tuning);
        assert_eq!(world.score.current, 2);
        assert!(events.contains(&GameEvent::Scored {
            points: 2,
            total: 2,
            boosted: false,
        }));
    }

    #[test]
    fn test_crash_ends_episode_and_commits_best() {
        let tuning = GameTuning::default();
        let mut world = running_world(&tuning);
        world.score.current = 7;
        world.score.best = 3;
        let id = world.next_entity_id();
        world.obstacles.push(Obstacle {
            id,
            pos: world.player.pos,
            width: tuning.car_width,
            height: tuning.car_height,
            speed_multiplier: 1.0,
        });
        // Also one about to pass: must not score on the crash tick
        far_lane_obstacle(&mut world, tuning.play_height - 0.5, &tuning);

        let events = tick(&mut world, &TickInput::default(), 10.0, 1.0, &tuning);
        assert_eq!(world.phase, GamePhase::Over);
        assert_eq!(events.last(), Some(&GameEvent::Crashed { score: 7, new_best: true }));
        assert_eq!(world.score.best, 7);
        assert_eq!(world.score.current, 7);

        // Over is frozen until restart
        let frozen = world.obstacles.clone();
        tick(&mut world, &right(), 20.0, 1.0, &tuning);
        assert_eq!(world.obstacles, frozen);
        assert_eq!(world.phase, GamePhase::Over);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        let events = tick(&mut world, &restart, 30.0, 1.0, &tuning);
        assert_eq!(events, vec![GameEvent::Restarted]);
        assert_eq!(world.phase, GamePhase::Idle);
        assert!(world.obstacles.is_empty());
        assert_eq!(world.score.current, 0);
        assert_eq!(world.score.best, 7);
        assert_eq!(world.last_spawn_ms, 30.0);
    }

    #[test]
    fn test_spawns_after_interval() {
        let tuning = GameTuning::default();
        let mut world = running_world(&tuning);

        let events = tick(&mut world, &TickInput::default(), 999.0, 1.0, &tuning);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Spawned { .. })));

        let events = tick(&mut world, &TickInput::default(), 1000.0, 1.0, &tuning);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Spawned { .. })));
        assert_eq!(world.obstacles.len(), 1);
        // Spawned above the road, then advanced once
        assert!(world.obstacles[0].pos.y > -tuning.car_height);
    }

    #[test]
    fn test_determinism() {
        let tuning = GameTuning::default();
        let mut world1 = GameWorld::new(99999, &tuning);
        let mut world2 = GameWorld::new(99999, &tuning);

        let inputs = [
            right(),
            TickInput::default(),
            TickInput {
                steer_left: true,
                boost: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for frame in 0..600 {
            let input = &inputs[(frame / 37) % inputs.len()];
            let now = frame as f64 * 16.0;
            let e1 = tick(&mut world1, input, now, 1.0, &tuning);
            let e2 = tick(&mut world2, input, now, 1.0, &tuning);
            assert_eq!(e1, e2);
        }

        assert_eq!(world1.phase, world2.phase);
        assert_eq!(world1.player, world2.player);
        assert_eq!(world1.obstacles, world2.obstacles);
        assert_eq!(world1.score, world2.score);
    }
}
