//! Scene assembly
//!
//! Turns a [`RenderSnapshot`] into one triangle list in play-area
//! coordinates. Draw order is back to front: grass, road, lane markers,
//! traffic, player, then the pause/crash shade.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::LANE_COUNT;
use crate::sim::{GamePhase, RenderSnapshot};
use crate::tuning::GameTuning;

/// Number of dash periods visible over the play height
const DASHES_PER_SCREEN: f32 = 10.0;
const MARKER_WIDTH: f32 = 4.0;
const CURB_WIDTH: f32 = 6.0;

/// Top edges of the lane dashes for a given road offset
///
/// Dashes are half a period long and slide down as the offset grows.
pub fn dash_positions(road_offset: f32, play_height: f32) -> Vec<f32> {
    let period = play_height / DASHES_PER_SCREEN;
    if period <= 0.0 || !road_offset.is_finite() {
        return Vec::new();
    }
    let phase = road_offset.rem_euclid(period);

    // One extra dash above the top edge so the strip never has a gap
    let mut y = phase - period;
    let mut out = Vec::with_capacity(DASHES_PER_SCREEN as usize + 2);
    while y < play_height {
        out.push(y);
        y += period;
    }
    out
}

/// X positions of the dividers between lanes
pub fn lane_dividers(tuning: &GameTuning) -> Vec<f32> {
    let lane_width = (tuning.lane_max_x - tuning.lane_min_x) / LANE_COUNT as f32;
    (1..LANE_COUNT)
        .map(|i| tuning.lane_min_x + lane_width * i as f32)
        .collect()
}

/// Build the full frame
pub fn scene_vertices(snapshot: &RenderSnapshot, tuning: &GameTuning) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(256 + snapshot.obstacles.len() * 12);
    let play = Vec2::new(tuning.play_width, tuning.play_height);

    // Grass and road
    vertices.extend(shapes::rect(Vec2::ZERO, play, colors::GRASS));
    let road_min = Vec2::new(tuning.lane_min_x, 0.0);
    let road_size = Vec2::new(tuning.lane_max_x - tuning.lane_min_x, play.y);
    vertices.extend(shapes::rect(road_min, road_size, colors::ROAD));

    // Curbs
    let curb = Vec2::new(CURB_WIDTH, play.y);
    vertices.extend(shapes::rect(
        Vec2::new(tuning.lane_min_x - CURB_WIDTH, 0.0),
        curb,
        colors::CURB,
    ));
    vertices.extend(shapes::rect(Vec2::new(tuning.lane_max_x, 0.0), curb, colors::CURB));

    // Lane markers
    let dash = Vec2::new(MARKER_WIDTH, play.y / DASHES_PER_SCREEN * 0.5);
    let dashes = dash_positions(snapshot.road_offset, play.y);
    for x in lane_dividers(tuning) {
        for &y in &dashes {
            vertices.extend(shapes::rect(
                Vec2::new(x - MARKER_WIDTH * 0.5, y),
                dash,
                colors::LANE_MARKER,
            ));
        }
    }

    // Traffic
    for obstacle in &snapshot.obstacles {
        let b = obstacle.bounds;
        let color = if obstacle.fast {
            colors::TRAFFIC_FAST
        } else {
            colors::TRAFFIC
        };
        // Oncoming traffic faces down, so the windshield goes on the far side
        vertices.extend(shapes::car(
            b.min + b.size * 0.5,
            b.size,
            std::f32::consts::PI,
            color,
            colors::WINDSHIELD,
        ));
    }

    // Player
    let p = snapshot.player;
    let body = if snapshot.boosting {
        colors::PLAYER_BOOST
    } else {
        colors::PLAYER
    };
    vertices.extend(shapes::car(
        p.min + p.size * 0.5,
        p.size,
        snapshot.tilt,
        body,
        colors::WINDSHIELD,
    ));

    if matches!(snapshot.phase, GamePhase::Paused | GamePhase::Over) {
        vertices.extend(shapes::rect(Vec2::ZERO, play, colors::SHADE));
    }

    vertices
}
