//! GPU-facing vertex data and the fixed quad index pattern.

use bytemuck::{Pod, Zeroable};

/// Default number of sprites per draw call.
pub const MAX_SPRITES_PER_BATCH: usize = 1000;

/// Largest batch addressable with 16-bit indices (`4 * n - 1 <= u16::MAX`).
pub const MAX_BATCH_CAPACITY: usize = 16384;

pub const VERTICES_PER_SPRITE: usize = 4;
pub const INDICES_PER_SPRITE: usize = 6;
pub const FLOATS_PER_VERTEX: usize = 7;

// ── vertex ────────────────────────────────────────────────────────────────

/// One sprite corner: position (pixels), texcoord, tint.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 3],
}

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x3];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// ── camera uniform ────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct CameraUniform {
    pub projection_view_matrix: [[f32; 4]; 4],
}

impl CameraUniform {
    pub(crate) fn from_matrix(m: glam::Mat4) -> Self {
        Self {
            projection_view_matrix: m.to_cols_array_2d(),
        }
    }
}

// ── indices ───────────────────────────────────────────────────────────────

/// Index list for `sprites` quads.
///
/// Quad `i` is drawn as `(4i, 4i+1, 4i+3)` and `(4i+1, 4i+2, 4i+3)`.
pub fn quad_indices(sprites: usize) -> Vec<u16> {
    let mut indices = Vec::with_capacity(sprites * INDICES_PER_SPRITE);
    for i in 0..sprites {
        let base = (i * VERTICES_PER_SPRITE) as u16;
        indices.extend_from_slice(&[
            base,
            base + 1,
            base + 3,
            base + 1,
            base + 2,
            base + 3,
        ]);
    }
    indices
}

/// Number of indices drawn for `sprites` quads.
#[inline]
pub fn index_count(sprites: usize) -> u32 {
    (sprites * INDICES_PER_SPRITE) as u32
}
