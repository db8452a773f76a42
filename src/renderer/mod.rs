//! Rendering module
//!
//! The scene is tessellated on the CPU into a coloured triangle list in
//! pixel space, then drawn by a minimal WebGPU pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{SceneBuilder, StripLayout};
pub use vertex::Vertex;
