//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const GRASS: [f32; 4] = [0.12, 0.35, 0.15, 1.0];
    pub const ROAD: [f32; 4] = [0.22, 0.22, 0.25, 1.0];
    pub const CURB: [f32; 4] = [0.85, 0.85, 0.85, 1.0];
    pub const LANE_MARKER: [f32; 4] = [0.95, 0.9, 0.6, 1.0];
    pub const PLAYER: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const PLAYER_BOOST: [f32; 4] = [0.3, 1.0, 0.6, 1.0];
    pub const WINDSHIELD: [f32; 4] = [0.1, 0.15, 0.25, 0.9];
    pub const TRAFFIC: [f32; 4] = [0.4, 0.6, 1.0, 1.0];
    pub const TRAFFIC_FAST: [f32; 4] = [1.0, 0.4, 0.2, 1.0]; // Orange/red
    /// Dim overlay drawn over the road while paused or after a crash
    pub const SHADE: [f32; 4] = [0.0, 0.0, 0.0, 0.45];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}
