//! Scoring
//!
//! Points are earned when traffic makes it past the bottom of the road.
//! Holding boost doubles the payout.

use serde::{Deserialize, Serialize};

use super::state::Obstacle;

/// Running and best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Score of the current episode
    pub current: u64,
    /// Best final score across episodes and sessions
    pub best: u64,
}

impl ScoreState {
    pub fn add(&mut self, points: u64) {
        self.current = self.current.saturating_add(points);
    }

    /// Reconcile `best` at the end of an episode
    ///
    /// Returns true if the episode set a new best, which must be persisted.
    pub fn end_episode(&mut self) -> bool {
        if self.current > self.best {
            self.best = self.current;
            true
        } else {
            false
        }
    }

    /// Best score to show while an episode may still be ahead of it
    pub fn display_best(&self) -> u64 {
        self.best.max(self.current)
    }
}

/// Remove obstacles that left the play area and return the points they earn
pub fn reap_passed(obstacles: &mut Vec<Obstacle>, play_height: f32, points_each: u64) -> u64 {
    let before = obstacles.len();
    obstacles.retain(|o| o.pos.y <= play_height);
    (before - obstacles.len()) as u64 * points_each
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn obstacle_at(id: u32, y: f32) -> Obstacle {
        Obstacle {
            id,
            pos: Vec2::new(100.0, y),
            width: 35.0,
            height: 70.0,
            speed_multiplier: 1.0,
        }
    }

    #[test]
    fn test_reap_only_passed() {
        let mut obstacles = vec![obstacle_at(1, 701.0), obstacle_at(2, 300.0), obstacle_at(3, 700.0)];
        let points = reap_passed(&mut obstacles, 700.0, 1);
        assert_eq!(points, 1);
        let ids: Vec<_> = obstacles.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_reap_boost_doubles() {
        let mut obstacles = vec![obstacle_at(1, 900.0), obstacle_at(2, 800.0)];
        assert_eq!(reap_passed(&mut obstacles, 700.0, 2), 4);
        assert!(obstacles.is_empty());
    }

    #[test]
    fn test_best_is_running_max() {
        let mut score = ScoreState::default();
        let finals = [5u64, 3, 9, 9, 2, 11, 0];
        let mut expected = 0;

        for &s in &finals {
            score.current = 0;
            score.add(s);
            let new_best = score.end_episode();
            assert_eq!(new_best, s > expected);
            expected = expected.max(s);
            assert_eq!(score.best, expected);
            assert!(score.best >= score.current);
        }
    }

    #[test]
    fn test_display_best_tracks_live_score() {
        let score = ScoreState { current: 14, best: 10 };
        assert_eq!(score.display_best(), 14);
    }
}
