//! Read-only view of a world for presentation
//!
//! The core never draws. Each frame it hands a [`RenderSnapshot`] to whatever
//! [`RenderSink`] the host installed.

use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::state::{GamePhase, GameWorld};

/// A drawable obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub bounds: Aabb,
    pub fast: bool,
}

/// Everything a renderer or HUD needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub player: Aabb,
    /// Car rotation hint in radians (positive = leaning right)
    pub tilt: f32,
    pub obstacles: Vec<ObstacleView>,
    pub score: u64,
    pub best: u64,
    pub boosting: bool,
    pub road_offset: f32,
}

impl RenderSnapshot {
    /// Capture the world; `reduced_motion` suppresses the tilt hint
    pub fn capture(world: &GameWorld, reduced_motion: bool) -> Self {
        Self {
            phase: world.phase,
            player: world.player.aabb(),
            tilt: if reduced_motion { 0.0 } else { world.player.tilt() },
            obstacles: world
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    bounds: o.aabb(),
                    fast: o.is_fast(),
                })
                .collect(),
            score: world.score.current,
            best: world.score.display_best(),
            boosting: world.boosting && world.phase == GamePhase::Running,
            road_offset: world.road_offset,
        }
    }
}

/// Presentation target fed once per frame
pub trait RenderSink {
    fn present(&mut self, snapshot: &RenderSnapshot);
}

/// Sink that keeps only the most recent snapshot (headless runs, tests)
#[derive(Debug, Default)]
pub struct LatestSnapshot {
    pub last: Option<RenderSnapshot>,
    pub frames: u64,
}

impl RenderSink for LatestSnapshot {
    fn present(&mut self, snapshot: &RenderSnapshot) {
        self.last = Some(snapshot.clone());
        self.frames += 1;
    }
}
