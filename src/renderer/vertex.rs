//! GPU vertex types

use bytemuck::{Pod, Zeroable};

/// One star, drawn as an instanced quad stretched from tail to head
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct StarInstance {
    pub head: [f32; 3],
    /// World-space radius
    pub size: f32,
    pub tail: [f32; 3],
    pub alpha: f32,
}

impl StarInstance {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // head.xyz + size
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // tail.xyz + alpha
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Wireframe vertex (line list)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Scene colors (linear RGBA)
pub mod colors {
    /// Star opacity at rest (the #88ffff tint lives in the shader)
    pub const STAR_ALPHA: f32 = 0.8;
    /// #00ffff wireframes
    pub const WIREFRAME: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const SHIP_ALPHA: f32 = 0.6;
    /// #0A0A12
    pub const BACKGROUND: [f32; 4] = [0.039, 0.039, 0.071, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts_match_struct_sizes() {
        assert_eq!(std::mem::size_of::<StarInstance>(), 32);
        assert_eq!(StarInstance::desc().array_stride, 32);
        assert_eq!(std::mem::size_of::<LineVertex>(), 28);
        assert_eq!(LineVertex::desc().array_stride, 28);
    }
}
