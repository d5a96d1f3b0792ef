//! The normal-mapped quad and its per-vertex tangent frame.

use nalgebra::{Vector2, Vector3};

use crate::bytes::AsBytes;

/// Interleaved vertex layout: position, normal, uv, tangent, bitangent.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

// SAFETY: repr(C), f32 fields only, no padding.
unsafe impl AsBytes for Vertex {}

pub const FLOATS_PER_VERTEX: usize = 14;

/// One vertex attribute as the shader names it, with its place in [`Vertex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    pub components: i32,
    /// Byte offset into [`Vertex`].
    pub offset: usize,
}

const F32: usize = std::mem::size_of::<f32>();

pub const VERTEX_ATTRIBUTES: [VertexAttribute; 5] = [
    VertexAttribute { name: "position", components: 3, offset: 0 },
    VertexAttribute { name: "normal", components: 3, offset: 3 * F32 },
    VertexAttribute { name: "texCoords", components: 2, offset: 6 * F32 },
    VertexAttribute { name: "tangent", components: 3, offset: 8 * F32 },
    VertexAttribute { name: "bitangent", components: 3, offset: 11 * F32 },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentFrame {
    pub tangent: Vector3<f32>,
    pub bitangent: Vector3<f32>,
}

impl Default for TangentFrame {
    fn default() -> Self {
        Self {
            tangent: Vector3::x(),
            bitangent: Vector3::y(),
        }
    }
}

/// Tangent and bitangent of a triangle, both normalized. `None` when the
/// texture coordinates are degenerate and span no area.
pub fn triangle_tangents(
    positions: [Vector3<f32>; 3],
    uvs: [Vector2<f32>; 3],
) -> Option<TangentFrame> {
    let edge1 = positions[1] - positions[0];
    let edge2 = positions[2] - positions[0];
    let delta_uv1 = uvs[1] - uvs[0];
    let delta_uv2 = uvs[2] - uvs[0];

    let determinant = delta_uv1.x * delta_uv2.y - delta_uv2.x * delta_uv1.y;
    if determinant.abs() <= f32::EPSILON {
        return None;
    }
    let f = determinant.recip();

    let tangent = (edge1 * delta_uv2.y - edge2 * delta_uv1.y) * f;
    let bitangent = (edge2 * delta_uv1.x - edge1 * delta_uv2.x) * f;

    Some(TangentFrame {
        tangent: tangent.try_normalize(f32::EPSILON)?,
        bitangent: bitangent.try_normalize(f32::EPSILON)?,
    })
}

/// Two triangles covering [-1, 1]² in the XY plane, facing +Z.
pub fn normal_mapped_quad() -> [Vertex; 6] {
    let corners = [
        Vector3::new(-1.0, 1.0, 0.0),
        Vector3::new(-1.0, -1.0, 0.0),
        Vector3::new(1.0, -1.0, 0.0),
        Vector3::new(1.0, 1.0, 0.0),
    ];
    let uvs = [
        Vector2::new(0.0, 1.0),
        Vector2::new(0.0, 0.0),
        Vector2::new(1.0, 0.0),
        Vector2::new(1.0, 1.0),
    ];
    let normal = Vector3::z();

    let mut vertices = [Vertex {
        position: [0.0; 3],
        normal: normal.into(),
        tex_coords: [0.0; 2],
        tangent: [0.0; 3],
        bitangent: [0.0; 3],
    }; 6];

    for (triangle, indices) in [[0, 1, 2], [0, 2, 3]].iter().enumerate() {
        let frame = triangle_tangents(indices.map(|i| corners[i]), indices.map(|i| uvs[i]))
            .unwrap_or_default();
        for (corner, &index) in indices.iter().enumerate() {
            let vertex = &mut vertices[triangle * 3 + corner];
            vertex.position = corners[index].into();
            vertex.tex_coords = uvs[index].into();
            vertex.tangent = frame.tangent.into();
            vertex.bitangent = frame.bitangent.into();
        }
    }

    vertices
}
