use wgpu::util::DeviceExt;

use super::vertex::{SpriteVertex, VERTICES_PER_SPRITE, quad_indices};

/// Vertex and index buffers sized once for a full batch.
///
/// The vertex buffer is rewritten from offset 0 on every flush; the index
/// buffer never changes.
pub struct GeometryBuffer {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    capacity: usize,
}

impl GeometryBuffer {
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pixie sprite vbo"),
            size: (capacity * VERTICES_PER_SPRITE * std::mem::size_of::<SpriteVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pixie sprite ibo"),
            contents: bytemuck::cast_slice(&quad_indices(capacity)),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            capacity,
        }
    }

    /// Sprites the buffers can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Writes `vertices` at the start of the vertex buffer.
    pub fn upload(&self, queue: &wgpu::Queue, vertices: &[SpriteVertex]) {
        debug_assert!(vertices.len() <= self.capacity * VERTICES_PER_SPRITE);
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
    }

    pub fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
    }
}
