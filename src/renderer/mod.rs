//! WebGPU rendering module
//!
//! The scene is rebuilt as a flat-colored triangle list from each
//! [`RenderSnapshot`](crate::sim::RenderSnapshot) and drawn in one pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState, play_to_ndc};
pub use scene::scene_vertices;
pub use vertex::Vertex;
