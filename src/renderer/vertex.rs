//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position (pixels) and color
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

/// Replace the alpha channel of a color
#[inline]
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// Linear blend between two colors
#[inline]
pub fn lerp_color(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Colors for scene elements
pub mod colors {
    pub const BACKGROUND_TOP: [f32; 4] = [0.01, 0.02, 0.06, 1.0];
    pub const BACKGROUND_MID: [f32; 4] = [0.02, 0.03, 0.09, 1.0];
    pub const BACKGROUND_BOTTOM: [f32; 4] = [0.03, 0.04, 0.12, 1.0];
    pub const GRID: [f32; 4] = [0.0, 1.0, 1.0, 0.15];
    pub const DUST: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const PULSE_RED: [f32; 4] = [1.0, 0.23, 0.19, 1.0];
    /// ECG stroke gradient stops, left to right
    pub const ECG_GRADIENT: [[f32; 4]; 4] = [
        [0.2, 0.85, 0.95, 1.0],
        [0.2, 0.45, 1.0, 1.0],
        [0.35, 0.95, 0.75, 1.0],
        [0.2, 0.85, 0.95, 1.0],
    ];
    pub const ECG_GLOW: [f32; 4] = [0.2, 0.85, 0.95, 0.3];
}
