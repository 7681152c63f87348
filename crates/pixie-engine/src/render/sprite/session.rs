use anyhow::Result;

use crate::content::Sprite;
use crate::coords::{Rect, Viewport};
use crate::render::{Camera, RenderCtx, RenderTarget};

use super::batch::{BatchEngine, BatchStats, BatchTarget, DrawParams};
use super::error::BatchError;
use super::geometry::GeometryBuffer;
use super::pipeline::SpritePipeline;
use super::texture::{Texture, TextureStore};
use super::vertex::{MAX_SPRITES_PER_BATCH, SpriteVertex, index_count};

/// Sprite renderer settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sprites drawn per call before an automatic flush. `1..=16384`.
    pub max_sprites_per_batch: usize,
    /// Sampler filter for every texture created through the session's store.
    pub filter: wgpu::FilterMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sprites_per_batch: MAX_SPRITES_PER_BATCH,
            filter: wgpu::FilterMode::Linear,
        }
    }
}

/// Owns everything needed to draw sprites into a frame.
///
/// Created once after the device exists; each frame runs
/// [`begin`](Self::begin), any number of draws, then [`SpriteBatch::end`].
pub struct RenderSession {
    config: SessionConfig,
    camera: Camera,
    geometry: GeometryBuffer,
    pipeline: SpritePipeline,
    engine: BatchEngine,
}

impl RenderSession {
    pub fn new(ctx: &RenderCtx<'_>, config: SessionConfig) -> Result<Self> {
        let engine = BatchEngine::with_capacity(config.max_sprites_per_batch)?;
        let pipeline = SpritePipeline::new(ctx)?;
        let geometry = GeometryBuffer::new(ctx.device, engine.capacity());

        let mut camera = Camera::new(ctx.viewport);
        camera.update();

        log::debug!(
            "render session ready: {} sprites per batch, {}x{} canvas",
            engine.capacity(),
            ctx.viewport.width,
            ctx.viewport.height
        );

        Ok(Self {
            config,
            camera,
            geometry,
            pipeline,
            engine,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// New canvas size; used from the next `begin`.
    pub fn resize(&mut self, viewport: Viewport) {
        self.camera.set_size(viewport);
    }

    /// A texture store whose bind groups match this session's pipeline.
    pub fn create_texture_store(&self, ctx: &RenderCtx<'_>) -> TextureStore {
        TextureStore::new(
            ctx.device,
            self.pipeline.texture_layout().clone(),
            self.config.filter,
        )
    }

    /// Opens a batch drawing into `target`.
    pub fn begin<'a>(
        &'a mut self,
        ctx: &RenderCtx<'a>,
        target: RenderTarget<'a>,
        textures: &'a TextureStore,
    ) -> Result<SpriteBatch<'a>, BatchError> {
        self.engine.begin()?;

        self.camera.update();
        self.pipeline
            .write_camera(ctx.queue, self.camera.projection_view());

        Ok(SpriteBatch {
            session: self,
            ctx: *ctx,
            target,
            textures,
            ended: false,
        })
    }
}

/// One open batch. Dropping it without [`end`](Self::end) still flushes.
pub struct SpriteBatch<'a> {
    session: &'a mut RenderSession,
    ctx: RenderCtx<'a>,
    target: RenderTarget<'a>,
    textures: &'a TextureStore,
    ended: bool,
}

impl<'a> SpriteBatch<'a> {
    pub fn draw_sprite(&mut self, texture: Texture, dest: Rect) -> Result<(), BatchError> {
        self.draw_sprite_with(texture, dest, &DrawParams::default())
    }

    pub fn draw_sprite_source(
        &mut self,
        texture: Texture,
        dest: Rect,
        source: Rect,
    ) -> Result<(), BatchError> {
        self.draw_sprite_with(texture, dest, &DrawParams::default().source(source))
    }

    pub fn draw_sprite_with(
        &mut self,
        texture: Texture,
        dest: Rect,
        params: &DrawParams,
    ) -> Result<(), BatchError> {
        let (engine, mut target) = self.split();
        engine.draw_sprite_with(&mut target, texture, dest, params)
    }

    /// Draws a sprite at its draw rect with its source region.
    pub fn draw(&mut self, sprite: &Sprite) -> Result<(), BatchError> {
        self.draw_sprite_with(
            sprite.texture,
            sprite.draw_rect,
            &DrawParams::default().source(sprite.source_rect),
        )
    }

    pub fn draw_with(&mut self, sprite: &Sprite, params: DrawParams) -> Result<(), BatchError> {
        self.draw_sprite_with(
            sprite.texture,
            sprite.draw_rect,
            &params.source(sprite.source_rect),
        )
    }

    /// Flushes the remaining sprites and closes the batch.
    pub fn end(mut self) -> Result<BatchStats, BatchError> {
        self.ended = true;
        let (engine, mut target) = self.split();
        let stats = engine.end(&mut target)?;
        log::trace!("batch: {} draw calls, {} sprites", stats.draw_calls, stats.sprites);
        Ok(stats)
    }

    fn split(&mut self) -> (&mut BatchEngine, FrameTarget<'_>) {
        let RenderSession {
            engine,
            geometry,
            pipeline,
            ..
        } = &mut *self.session;

        let target = FrameTarget {
            ctx: &self.ctx,
            color_view: self.target.color_view,
            geometry,
            pipeline,
            textures: self.textures,
        };
        (engine, target)
    }
}

impl Drop for SpriteBatch<'_> {
    fn drop(&mut self) {
        if self.ended || !self.session.engine.is_batching() {
            return;
        }
        log::warn!("sprite batch dropped without end(); flushing");
        let (engine, mut target) = self.split();
        if let Err(err) = engine.end(&mut target) {
            log::warn!("flush of dropped batch failed: {err}");
        }
    }
}

/// Submits each flush as its own render pass over the frame's color view.
struct FrameTarget<'a> {
    ctx: &'a RenderCtx<'a>,
    color_view: &'a wgpu::TextureView,
    geometry: &'a GeometryBuffer,
    pipeline: &'a SpritePipeline,
    textures: &'a TextureStore,
}

impl BatchTarget for FrameTarget<'_> {
    fn flush(
        &mut self,
        texture: &Texture,
        vertices: &[SpriteVertex],
        sprite_count: usize,
    ) -> Result<(), BatchError> {
        let bind_group = self
            .textures
            .bind_group(texture.handle)
            .ok_or(BatchError::UnknownTexture(texture.handle))?;

        // Written at offset 0; submitting right away keeps earlier draws intact.
        self.geometry.upload(self.ctx.queue, vertices);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("pixie sprite encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("pixie sprite pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            self.pipeline.bind(&mut rpass);
            rpass.set_bind_group(1, bind_group, &[]);
            self.geometry.bind(&mut rpass);
            rpass.draw_indexed(0..index_count(sprite_count), 0, 0..1);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}
