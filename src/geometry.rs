//! Static triangle geometry.

use glam::Vec3;

use crate::scene::ProgramId;
use crate::shader::Vertex;

/// Three vertices uploaded once and redrawn unchanged every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            vertices: [a, b, c].map(|p| Vertex {
                position: p.to_array(),
            }),
        }
    }

    /// Build from raw `[x, y, z]` triples.
    pub const fn from_positions(positions: [[f32; 3]; 3]) -> Self {
        Self {
            vertices: [
                Vertex { position: positions[0] },
                Vertex { position: positions[1] },
                Vertex { position: positions[2] },
            ],
        }
    }

    pub fn vertices(&self) -> &[Vertex; 3] {
        &self.vertices
    }

    pub fn positions(&self) -> [Vec3; 3] {
        self.vertices.map(|v| Vec3::from_array(v.position))
    }

    /// Bytes exactly as written to the vertex buffer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub const fn vertex_count(&self) -> u32 {
        3
    }
}

/// A triangle and the program that draws it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh {
    pub triangle: Triangle,
    pub program: ProgramId,
}
