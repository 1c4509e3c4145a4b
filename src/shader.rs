//! Shader sources and the vertex layout they consume.
//!
//! Every program shares one vertex stage. The fragment stage is generated per
//! program and returns a single constant color.

use bytemuck::{Pod, Zeroable};
use glam::Vec4;

pub const VERTEX_SOURCE: &str = include_str!("shaders/triangle.wgsl");

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

pub const ORANGE: Vec4 = Vec4::new(1.0, 0.5, 0.2, 1.0);
pub const YELLOW: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);

/// A single position-only vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    /// Three floats at location 0, advanced per vertex.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// A vertex + fragment pair drawn with one constant color.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub label: String,
    pub color: Vec4,
}

impl Program {
    pub fn new(label: impl Into<String>, color: Vec4) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }

    pub fn vertex_source(&self) -> &'static str {
        VERTEX_SOURCE
    }

    pub fn fragment_source(&self) -> String {
        fragment_source(self.color)
    }
}

/// Generate a fragment stage that writes `color` to every covered pixel.
pub fn fragment_source(color: Vec4) -> String {
    format!(
        r#"@fragment
fn {FRAGMENT_ENTRY}() -> @location(0) vec4<f32> {{
    return vec4<f32>({:.6}, {:.6}, {:.6}, {:.6});
}}
"#,
        color.x, color.y, color.z, color.w
    )
}
