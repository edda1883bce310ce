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
    /// Dark blue night sky, matches the clear color
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.2, 1.0];
    pub const BUCKET_BODY: [f32; 4] = [0.55, 0.35, 0.2, 1.0];
    pub const BUCKET_RIM: [f32; 4] = [0.75, 0.55, 0.3, 1.0];
    pub const BUCKET_BAND: [f32; 4] = [0.4, 0.4, 0.45, 1.0];
    pub const RAINDROP: [f32; 4] = [0.45, 0.7, 1.0, 0.9];
    pub const RAINDROP_SHINE: [f32; 4] = [0.85, 0.95, 1.0, 0.8];
}
