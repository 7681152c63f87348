use std::path::Path;

use anyhow::Context;
use wgpu::util::DeviceExt;

use crate::coords::Rect;
use crate::render::RenderCtx;

/// Opaque id of a GPU texture held by a [`TextureStore`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) u32);

impl TextureHandle {
    /// Builds a handle that refers to no store entry. Useful for CPU-only batching.
    pub const fn detached(id: u32) -> Self {
        Self(id)
    }

    pub fn id(self) -> u32 {
        self.0
    }
}

/// A texture as the batcher sees it: an id plus its size in texels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Texture {
    pub handle: TextureHandle,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub const fn new(handle: TextureHandle, width: u32, height: u32) -> Self {
        Self {
            handle,
            width,
            height,
        }
    }

    /// Texcoords of the quad corners in TL, TR, BR, BL order.
    ///
    /// Rows are stored bottom-up, so `v = 1` is the top of the image.
    /// `None` selects the whole texture.
    pub fn uv_corners(&self, source: Option<Rect>) -> [[f32; 2]; 4] {
        let Some(src) = source else {
            return [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        };

        let tw = self.width as f32;
        let th = self.height as f32;
        let u0 = src.x / tw;
        let u1 = (src.x + src.width) / tw;
        let v0 = 1.0 - src.y / th;
        let v1 = 1.0 - (src.y + src.height) / th;

        [[u0, v0], [u1, v0], [u1, v1], [u0, v1]]
    }
}

/// Owns GPU textures and their bind groups.
///
/// Everything outside the store refers to textures through [`Texture`] values.
pub struct TextureStore {
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    bind_groups: Vec<wgpu::BindGroup>,
}

impl TextureStore {
    pub(crate) fn new(
        device: &wgpu::Device,
        layout: wgpu::BindGroupLayout,
        filter: wgpu::FilterMode,
    ) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("pixie sprite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter,
            min_filter: filter,
            ..Default::default()
        });

        Self {
            layout,
            sampler,
            bind_groups: Vec::new(),
        }
    }

    /// Uploads tightly packed RGBA8 pixels, top row first.
    pub fn create_rgba(
        &mut self,
        ctx: &RenderCtx<'_>,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> anyhow::Result<Texture> {
        let expected = width as usize * height as usize * 4;
        anyhow::ensure!(width > 0 && height > 0, "texture `{label}` has zero size");
        anyhow::ensure!(
            pixels.len() == expected,
            "texture `{label}`: expected {expected} bytes, got {}",
            pixels.len()
        );

        let row = width as usize * 4;
        let flipped: Vec<u8> = pixels
            .chunks_exact(row)
            .rev()
            .flatten()
            .copied()
            .collect();

        Ok(self.upload(ctx, label, width, height, &flipped))
    }

    /// Decodes an image file and uploads it.
    pub fn load(&mut self, ctx: &RenderCtx<'_>, path: impl AsRef<Path>) -> anyhow::Result<Texture> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("failed to decode image {}", path.display()))?;
        let rgba = image.flipv().to_rgba8();
        let (width, height) = rgba.dimensions();
        anyhow::ensure!(width > 0 && height > 0, "image {} is empty", path.display());

        let label = path.display().to_string();
        Ok(self.upload(ctx, &label, width, height, rgba.as_raw()))
    }

    pub fn bind_group(&self, handle: TextureHandle) -> Option<&wgpu::BindGroup> {
        self.bind_groups.get(handle.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.bind_groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bind_groups.is_empty()
    }

    /// `pixels` are already in bottom-up row order.
    fn upload(
        &mut self,
        ctx: &RenderCtx<'_>,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Texture {
        let texture = ctx.device.create_texture_with_data(
            ctx.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            pixels,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let handle = TextureHandle(self.bind_groups.len() as u32);
        self.bind_groups.push(bind_group);
        log::debug!("texture {handle:?} `{label}` uploaded ({width}x{height})");

        Texture::new(handle, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn tex(w: u32, h: u32) -> Texture {
        Texture::new(TextureHandle::detached(0), w, h)
    }

    #[test]
    fn default_uvs_flip_v() {
        assert_eq!(
            tex(64, 32).uv_corners(None),
            [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]
        );
    }

    #[test]
    fn full_source_matches_default() {
        let t = tex(64, 32);
        assert_eq!(
            t.uv_corners(Some(Rect::from_size(64.0, 32.0))),
            t.uv_corners(None)
        );
    }

    #[test]
    fn sub_region_uvs() {
        let [tl, tr, br, bl] = tex(256, 128).uv_corners(Some(Rect::new(64.0, 32.0, 64.0, 32.0)));
        assert_abs_diff_eq!(tl[0], 0.25);
        assert_abs_diff_eq!(tl[1], 0.75);
        assert_abs_diff_eq!(tr[0], 0.5);
        assert_abs_diff_eq!(br[1], 0.5);
        assert_eq!(bl, [tl[0], br[1]]);
    }
}
