/// One acquired swapchain image.
///
/// Holding it blocks acquisition of the next image, so present it promptly.
/// Sprite flushes submit their own command buffers against `view`.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}
