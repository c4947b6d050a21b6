//! WebGPU rendering module
//!
//! Flat-colored quads for the road, vehicle and obstacles.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::scene;
pub use vertex::{Vertex, pixel_to_ndc};
