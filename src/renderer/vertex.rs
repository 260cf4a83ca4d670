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
    /// Floats per vertex when flattened for a host
    pub const FLOATS: usize = 6;

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Flatten vertices to x, y, r, g, b, a
pub fn as_floats(vertices: &[Vertex]) -> &[f32] {
    bytemuck::cast_slice(vertices)
}

/// Colors for scene elements
pub mod colors {
    /// Dark rose backdrop
    pub const BACKGROUND: [f32; 4] = [0.102, 0.039, 0.078, 1.0];
    /// Revealed text dots
    pub const REVEAL: [f32; 4] = [1.0, 0.714, 0.757, 1.0];
    /// Glow halo behind revealed dots
    pub const REVEAL_GLOW: [f32; 4] = [1.0, 0.412, 0.706, 0.35];
    pub const YES_BOX: [f32; 4] = [1.0, 0.412, 0.706, 0.8];
    pub const YES_BOX_HOVER: [f32; 4] = [1.0, 0.412, 0.706, 1.0];
    pub const NO_BOX: [f32; 4] = [1.0, 0.196, 0.196, 0.8];
    pub const NO_BOX_HOVER: [f32; 4] = [1.0, 0.196, 0.196, 1.0];
}
