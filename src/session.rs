//! Host-facing game session
//!
//! Owns one [`GameWorld`] together with the pieces around it: the frame timer,
//! the tuning, the player's settings and the key-value store that holds the
//! best score. The host calls [`Session::frame`] once per animation frame.

use crate::persistence;
use crate::platform::{FrameTimer, KeyValueStore};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameWorld, RenderSnapshot, TickInput, tick};
use crate::tuning::GameTuning;

/// Output of one frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub events: Vec<GameEvent>,
    pub snapshot: RenderSnapshot,
}

/// A running game plus its persistence
pub struct Session {
    pub world: GameWorld,
    pub tuning: GameTuning,
    pub settings: Settings,
    timer: FrameTimer,
    store: Box<dyn KeyValueStore>,
    pause_requested: bool,
    last_final_score: Option<u64>,
}

impl Session {
    /// Create a session, loading best score and settings from `store`
    pub fn new(seed: u64, tuning: GameTuning, store: Box<dyn KeyValueStore>) -> Self {
        let best = persistence::get_best(store.as_ref());
        let settings = Settings::load(store.as_ref());
        log::info!("Session created (seed {}, best {})", seed, best);

        Self {
            world: GameWorld::with_best(seed, &tuning, best),
            tuning,
            settings,
            timer: FrameTimer::default(),
            store,
            pause_requested: false,
            last_final_score: None,
        }
    }

    /// Advance one frame at host time `now_ms`
    pub fn frame(&mut self, now_ms: f64, input: &TickInput) -> Frame {
        let dt_ticks = self.timer.dt_ticks(now_ms);

        let mut input = *input;
        if self.pause_requested {
            self.pause_requested = false;
            if self.world.phase == GamePhase::Running {
                input.pause_toggle = true;
            }
        }

        let events = tick(&mut self.world, &input, now_ms, dt_ticks, &self.tuning);

        for event in &events {
            if let GameEvent::Crashed { score, new_best } = *event {
                self.last_final_score = Some(score);
                if new_best {
                    self.commit_best();
                }
            }
        }

        Frame {
            events,
            snapshot: RenderSnapshot::capture(&self.world, self.settings.reduced_motion),
        }
    }

    /// Pause on the next frame if the game is running (tab hidden, blur)
    pub fn request_pause(&mut self) {
        if self.world.phase == GamePhase::Running {
            self.pause_requested = true;
        }
    }

    /// Drop the frame timer's last reading after the host was suspended
    pub fn resync_clock(&mut self) {
        self.timer.reset();
    }

    pub fn phase(&self) -> GamePhase {
        self.world.phase
    }

    /// Final score of the most recent finished episode
    pub fn last_final_score(&self) -> Option<u64> {
        self.last_final_score
    }

    pub fn fps(&self) -> u32 {
        self.timer.fps()
    }

    /// Store shared with the leaderboard and settings
    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        self.store.as_mut()
    }

    /// Replace and persist the player's settings
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if let Err(e) = self.settings.save(self.store.as_mut()) {
            log::warn!("Failed to save settings: {}", e);
        }
    }

    fn commit_best(&mut self) {
        let best = self.world.score.best;
        match persistence::set_best(self.store.as_mut(), best) {
            Ok(()) => log::info!("New best score {} saved", best),
            Err(e) => log::warn!("Failed to save best score {}: {}", best, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::persistence::BEST_SCORE_KEY;
    use crate::platform::{Clock, HeadlessScheduler, LoopControl, ManualClock, MemoryStore, Scheduler};
    use crate::sim::Obstacle;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn right() -> TickInput {
        TickInput {
            steer_right: true,
            ..Default::default()
        }
    }

    fn restart() -> TickInput {
        TickInput {
            restart: true,
            ..Default::default()
        }
    }

    /// Drop a car right on top of the player so the next frame crashes
    fn force_crash(session: &mut Session) {
        let id = session.world.next_entity_id();
        session.world.obstacles.push(Obstacle {
            id,
            pos: session.world.player.pos,
            width: session.tuning.car_width,
            height: session.tuning.car_height,
            speed_multiplier: 1.0,
        });
    }

    fn play_episode(session: &mut Session, now: &mut f64, final_score: u64) -> Vec<GameEvent> {
        session.frame(*now, &right());
        assert_eq!(session.phase(), GamePhase::Running);
        session.world.score.current = final_score;
        force_crash(session);
        *now += FRAME_MS;
        let events = session.frame(*now, &TickInput::default()).events;
        assert_eq!(session.phase(), GamePhase::Over);
        *now += FRAME_MS;
        session.frame(*now, &restart());
        assert_eq!(session.phase(), GamePhase::Idle);
        *now += FRAME_MS;
        events
    }

    #[test]
    fn test_loads_best_from_store() {
        let store = MemoryStore::new().with_item(BEST_SCORE_KEY, "25");
        let session = Session::new(1, GameTuning::default(), Box::new(store));
        assert_eq!(session.world.score.best, 25);
        assert_eq!(session.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_best_tracks_max_across_episodes() {
        let mut session = Session::new(1, GameTuning::default(), Box::new(MemoryStore::new()));
        let mut now = 0.0;
        let mut expected = 0;

        for &s in &[4u64, 10, 7, 10, 15, 1] {
            let events = play_episode(&mut session, &mut now, s);
            assert!(events.contains(&GameEvent::Crashed {
                score: s,
                new_best: s > expected,
            }));
            expected = expected.max(s);
            assert_eq!(session.world.score.best, expected);
            assert_eq!(session.last_final_score(), Some(s));
            assert_eq!(persistence::get_best(session.store_mut()), expected);
        }
    }

    #[test]
    fn test_storage_failure_is_not_fatal() {
        let mut session = Session::new(1, GameTuning::default(), Box::new(MemoryStore::read_only()));
        let mut now = 0.0;
        play_episode(&mut session, &mut now, 9);
        assert_eq!(session.world.score.best, 9);
        // Game keeps going
        session.frame(now, &right());
        assert_eq!(session.phase(), GamePhase::Running);
    }

    #[test]
    fn test_request_pause_only_while_running() {
        let mut session = Session::new(1, GameTuning::default(), Box::new(MemoryStore::new()));
        session.request_pause();
        session.frame(0.0, &TickInput::default());
        assert_eq!(session.phase(), GamePhase::Idle);

        session.frame(FRAME_MS, &right());
        session.request_pause();
        let frame = session.frame(2.0 * FRAME_MS, &right());
        assert_eq!(session.phase(), GamePhase::Paused);
        assert_eq!(frame.events, vec![GameEvent::Paused]);
        assert_eq!(frame.snapshot.phase, GamePhase::Paused);
    }

    #[test]
    fn test_resync_after_suspend() {
        let clock = ManualClock::new(0.0);
        let mut session = Session::new(1, GameTuning::default(), Box::new(MemoryStore::new()));
        session.frame(clock.now_ms(), &right());
        let before = session.world.obstacles.len();
        session.resync_clock();
        // A minute later, the first frame counts as a single tick
        clock.advance(60_000.0);
        session.frame(clock.now_ms(), &TickInput::default());
        assert!(session.world.obstacles.len() <= before + 1);
        assert!(session.world.obstacles.iter().all(|o| o.pos.y <= -64.0 + 1e-3));
    }

    #[test]
    fn test_reduced_motion_snapshot() {
        let mut session = Session::new(1, GameTuning::default(), Box::new(MemoryStore::new()));
        session.update_settings(Settings {
            reduced_motion: true,
            ..Default::default()
        });
        let frame = session.frame(0.0, &right());
        assert!(session.world.player.velocity > 0.0);
        assert_eq!(frame.snapshot.tilt, 0.0);
        assert!(Settings::load(session.store_mut()).reduced_motion);
    }

    #[test]
    fn test_headless_run_holds_invariants() {
        let session = Rc::new(RefCell::new(Session::new(
            2024,
            GameTuning::default(),
            Box::new(MemoryStore::new()),
        )));
        let driver = session.clone();
        let mut frame_no = 0u64;

        HeadlessScheduler::new(FRAME_MS, 20_000).run(move |now| {
            frame_no += 1;
            // Weave left and right, restarting after every crash
            let input = TickInput {
                steer_left: (frame_no / 45) % 2 == 0,
                steer_right: (frame_no / 45) % 2 == 1,
                boost: (frame_no / 200) % 3 == 0,
                restart: true,
                ..Default::default()
            };
            let mut s = driver.borrow_mut();
            let frame = s.frame(now, &input);

            let t = &s.tuning;
            assert!(frame.snapshot.player.min.x >= t.min_car_x());
            assert!(frame.snapshot.player.min.x <= t.max_car_x());
            assert!(s.world.player.velocity.abs() <= t.max_speed);
            if s.phase() == GamePhase::Over {
                assert!(s.world.score.best >= s.world.score.current);
            }

            LoopControl::Continue
        });

        let s = session.borrow();
        assert!(s.world.time_ticks > 0);
    }
}
