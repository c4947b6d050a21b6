//! Scene vertices and palette
//!
//! Shapes are built in canvas pixels; [`Vertex::to_clip`] moves them into clip
//! space right before upload.

use bytemuck::{Pod, Zeroable};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Flat-shaded corner of a scene quad
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Same vertex with its pixel position mapped onto the canvas' clip rectangle
    pub fn to_clip(self) -> Self {
        let [x, y] = pixel_to_ndc(self.position[0], self.position[1]);
        Self::new(x, y, self.color)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Convert canvas pixels (origin top-left, y down) to normalized device coordinates
pub fn pixel_to_ndc(x: f32, y: f32) -> [f32; 2] {
    [x / CANVAS_WIDTH * 2.0 - 1.0, 1.0 - y / CANVAS_HEIGHT * 2.0]
}

/// Road scene palette
pub mod colors {
    /// Grass either side of the road, also the clear color
    pub const VERGE: [f32; 4] = [0.08, 0.22, 0.1, 1.0];
    pub const ROAD: [f32; 4] = [0.35, 0.35, 0.38, 1.0];
    pub const ROAD_EDGE: [f32; 4] = [0.9, 0.9, 0.9, 1.0];
    pub const LANE_MARK: [f32; 4] = [0.95, 0.85, 0.3, 1.0];
    pub const VEHICLE: [f32; 4] = [0.85, 0.15, 0.15, 1.0];
    pub const WINDSHIELD: [f32; 4] = [0.6, 0.8, 0.95, 1.0];
    pub const OBSTACLE: [f32; 4] = [0.95, 0.55, 0.1, 1.0];
    pub const OBSTACLE_STRIPE: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
    /// Drawn over everything while paused or crashed
    pub const OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.45];
}
