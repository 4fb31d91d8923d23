//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in play-area coordinates
//! (origin top-left, y down).

use glam::Vec2;

use super::vertex::Vertex;

/// Two triangles covering four corners given in winding order
fn quad_from_corners(corners: [Vec2; 4], color: [f32; 4]) -> [Vertex; 6] {
    let [a, b, c, d] = corners.map(|p| Vertex::new(p.x, p.y, color));
    [a, b, c, c, d, a]
}

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;
    quad_from_corners(
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ],
        color,
    )
    .to_vec()
}

/// Rectangle rotated by `angle` radians around its center
pub fn rotated_rect(center: Vec2, size: Vec2, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = size * 0.5;
    let rot = Vec2::from_angle(angle);
    let corners = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|p| center + rot.rotate(p));
    quad_from_corners(corners, color).to_vec()
}

/// A car body with a windshield band, leaning by `tilt` radians
pub fn car(center: Vec2, size: Vec2, tilt: f32, body: [f32; 4], glass: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = rotated_rect(center, size, tilt, body);

    // Windshield sits a fifth of the way down from the nose
    let rot = Vec2::from_angle(tilt);
    let glass_center = center + rot.rotate(Vec2::new(0.0, -size.y * 0.2));
    let glass_size = Vec2::new(size.x * 0.7, size.y * 0.18);
    vertices.extend(rotated_rect(glass_center, glass_size, tilt, glass));

    vertices
}
