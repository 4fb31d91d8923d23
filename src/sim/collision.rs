//! Collision detection between the player's car and traffic
//!
//! Everything on the road is an axis-aligned box, so a strict AABB overlap
//! test is all we need. Touching edges do not count as a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Obstacle, Player};

/// Axis-aligned bounding box (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap test
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

impl Player {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.width, self.height)
    }
}

impl Obstacle {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.width, self.height)
    }
}

/// Find the first obstacle (in iteration order) overlapping the player
pub fn check<'a>(player: &Player, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    let player_box = player.aabb();
    obstacles.iter().find(|o| player_box.overlaps(&o.aabb()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32) -> Player {
        Player {
            pos: Vec2::new(x, y),
            width: 35.0,
            height: 70.0,
            velocity: 0.0,
        }
    }

    fn obstacle_at(id: u32, x: f32, y: f32) -> Obstacle {
        Obstacle {
            id,
            pos: Vec2::new(x, y),
            width: 35.0,
            height: 70.0,
            speed_multiplier: 1.0,
        }
    }

    #[test]
    fn test_full_overlap_hits() {
        let player = player_at(100.0, 500.0);
        let obstacles = [obstacle_at(1, 100.0, 500.0)];
        assert_eq!(check(&player, &obstacles).map(|o| o.id), Some(1));
    }

    #[test]
    fn test_disjoint_misses() {
        let player = player_at(0.0, 500.0);
        let obstacles = [obstacle_at(1, 200.0, 500.0)];
        assert!(check(&player, &obstacles).is_none());
    }

    #[test]
    fn test_touching_edges_miss() {
        let player = player_at(100.0, 500.0);
        // Directly above, bottom edge touching the car's top edge
        let above = [obstacle_at(1, 100.0, 430.0)];
        assert!(check(&player, &above).is_none());
        // Right next to it
        let beside = [obstacle_at(2, 135.0, 500.0)];
        assert!(check(&player, &beside).is_none());
    }

    #[test]
    fn test_first_hit_wins() {
        let player = player_at(100.0, 500.0);
        let obstacles = [
            obstacle_at(1, 300.0, 500.0),
            obstacle_at(2, 110.0, 520.0),
            obstacle_at(3, 100.0, 500.0),
        ];
        assert_eq!(check(&player, &obstacles).map(|o| o.id), Some(2));
    }

    #[test]
    fn test_check_is_deterministic() {
        let player = player_at(120.0, 500.0);
        let obstacles = [obstacle_at(1, 90.0, 460.0), obstacle_at(2, 140.0, 520.0)];
        let first = check(&player, &obstacles).map(|o| o.id);
        for _ in 0..10 {
            assert_eq!(check(&player, &obstacles).map(|o| o.id), first);
        }
    }
}
