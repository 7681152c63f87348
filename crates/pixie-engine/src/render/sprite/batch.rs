//! GPU-agnostic sprite batching.
//!
//! [`BatchEngine`] turns a stream of sprite draws into as few flushes as
//! possible. A flush happens when the texture changes, when the staging
//! array is full and at `end()`. Where a flush goes is decided by a
//! [`BatchTarget`]: the wgpu frame target in the renderer, a recorder in tests.

use crate::coords::{Rect, Vec2};
use crate::paint::Color;

use super::error::BatchError;
use super::texture::Texture;
use super::vertex::{MAX_BATCH_CAPACITY, MAX_SPRITES_PER_BATCH, SpriteVertex, VERTICES_PER_SPRITE};

/// Receives finished batches.
pub trait BatchTarget {
    /// Draws `sprite_count` quads from `vertices` with `texture` bound.
    ///
    /// `vertices` holds exactly `sprite_count * 4` entries.
    fn flush(
        &mut self,
        texture: &Texture,
        vertices: &[SpriteVertex],
        sprite_count: usize,
    ) -> Result<(), BatchError>;
}

/// Optional arguments of a sprite draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawParams {
    /// Region of the texture in texels; `None` draws the whole texture.
    pub source: Option<Rect>,
    pub color: Color,
    /// Radians; positive turns clockwise on screen.
    pub rotation: f32,
    /// Pivot as a fraction of the destination rectangle.
    pub rotation_origin: Vec2,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            source: None,
            color: Color::WHITE,
            rotation: 0.0,
            rotation_origin: Vec2::CENTER,
        }
    }
}

impl DrawParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: Rect) -> Self {
        self.source = Some(source);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    pub fn origin(mut self, origin: Vec2) -> Self {
        self.rotation_origin = origin;
        self
    }
}

/// Counters for one begin/end cycle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub draw_calls: u32,
    pub sprites: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum BatchState {
    Idle,
    Batching,
}

pub struct BatchEngine {
    capacity: usize,
    staging: Vec<SpriteVertex>,
    instance_count: usize,
    current_texture: Option<Texture>,
    state: BatchState,
    corners: [Vec2; 4],
    stats: BatchStats,
}

impl Default for BatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchEngine {
    /// Engine flushing every [`MAX_SPRITES_PER_BATCH`] sprites.
    pub fn new() -> Self {
        Self::build(MAX_SPRITES_PER_BATCH)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, BatchError> {
        if !(1..=MAX_BATCH_CAPACITY).contains(&capacity) {
            return Err(BatchError::CapacityOutOfRange {
                requested: capacity,
                max: MAX_BATCH_CAPACITY,
            });
        }
        Ok(Self::build(capacity))
    }

    fn build(capacity: usize) -> Self {
        Self {
            capacity,
            staging: vec![SpriteVertex::default(); capacity * VERTICES_PER_SPRITE],
            instance_count: 0,
            current_texture: None,
            state: BatchState::Idle,
            corners: [Vec2::ZERO; 4],
            stats: BatchStats::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn instance_count(&self) -> usize {
        self.instance_count
    }

    pub fn is_batching(&self) -> bool {
        self.state == BatchState::Batching
    }

    pub fn current_texture(&self) -> Option<Texture> {
        self.current_texture
    }

    /// Opens a batch. Staged sprites and the current texture are reset.
    pub fn begin(&mut self) -> Result<(), BatchError> {
        if self.is_batching() {
            return Err(BatchError::AlreadyBatching);
        }
        self.state = BatchState::Batching;
        self.instance_count = 0;
        self.current_texture = None;
        self.stats = BatchStats::default();
        Ok(())
    }

    pub fn draw_sprite(
        &mut self,
        target: &mut impl BatchTarget,
        texture: Texture,
        dest: Rect,
    ) -> Result<(), BatchError> {
        self.draw_sprite_with(target, texture, dest, &DrawParams::default())
    }

    pub fn draw_sprite_source(
        &mut self,
        target: &mut impl BatchTarget,
        texture: Texture,
        dest: Rect,
        source: Rect,
    ) -> Result<(), BatchError> {
        self.draw_sprite_with(target, texture, dest, &DrawParams::default().source(source))
    }

    /// Appends one quad, flushing first if `texture` differs from the bound one.
    pub fn draw_sprite_with(
        &mut self,
        target: &mut impl BatchTarget,
        texture: Texture,
        dest: Rect,
        params: &DrawParams,
    ) -> Result<(), BatchError> {
        if !self.is_batching() {
            return Err(BatchError::NotBatching { op: "draw_sprite" });
        }

        if self.current_texture.map(|t| t.handle) != Some(texture.handle) {
            self.flush(target)?;
            self.current_texture = Some(texture);
        }

        self.corners = dest.corners();
        if params.rotation != 0.0 {
            let pivot = dest.point_at(params.rotation_origin);
            for corner in &mut self.corners {
                *corner = corner.rotate_around(pivot, params.rotation);
            }
        }

        let uvs = texture.uv_corners(params.source);
        let color = params.color.to_array();
        let offset = self.instance_count * VERTICES_PER_SPRITE;
        for (i, vertex) in self.staging[offset..offset + VERTICES_PER_SPRITE]
            .iter_mut()
            .enumerate()
        {
            *vertex = SpriteVertex {
                position: [self.corners[i].x, self.corners[i].y],
                uv: uvs[i],
                color,
            };
        }
        self.instance_count += 1;

        if self.instance_count == self.capacity {
            self.flush(target)?;
        }
        Ok(())
    }

    /// Flushes what is left and closes the batch.
    pub fn end(&mut self, target: &mut impl BatchTarget) -> Result<BatchStats, BatchError> {
        if !self.is_batching() {
            return Err(BatchError::NotBatching { op: "end" });
        }
        self.state = BatchState::Idle;
        self.flush(target)?;
        Ok(self.stats)
    }

    fn flush(&mut self, target: &mut impl BatchTarget) -> Result<(), BatchError> {
        let count = std::mem::take(&mut self.instance_count);
        if count == 0 {
            return Ok(());
        }
        let Some(texture) = self.current_texture else {
            return Ok(());
        };

        log::trace!("flush {count} sprites with {:?}", texture.handle);
        target.flush(&texture, &self.staging[..count * VERTICES_PER_SPRITE], count)?;

        self.stats.draw_calls += 1;
        self.stats.sprites += count as u32;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::sprite::texture::TextureHandle;
    use approx::assert_abs_diff_eq;

    #[derive(Default)]
    struct RecordingTarget {
        flushes: Vec<(TextureHandle, Vec<SpriteVertex>)>,
        fail: bool,
    }

    impl RecordingTarget {
        fn counts(&self) -> Vec<usize> {
            self.flushes.iter().map(|(_, v)| v.len() / VERTICES_PER_SPRITE).collect()
        }
    }

    impl BatchTarget for RecordingTarget {
        fn flush(
            &mut self,
            texture: &Texture,
            vertices: &[SpriteVertex],
            sprite_count: usize,
        ) -> Result<(), BatchError> {
            assert_eq!(vertices.len(), sprite_count * VERTICES_PER_SPRITE);
            if self.fail {
                return Err(BatchError::UnknownTexture(texture.handle));
            }
            self.flushes.push((texture.handle, vertices.to_vec()));
            Ok(())
        }
    }

    fn tex(id: u32) -> Texture {
        Texture::new(TextureHandle::detached(id), 64, 64)
    }

    fn square() -> Rect {
        Rect::new(0.0, 0.0, 10.0, 10.0)
    }

    fn positions(vertices: &[SpriteVertex]) -> Vec<[f32; 2]> {
        vertices.iter().map(|v| v.position).collect()
    }

    // ── flushing ──────────────────────────────────────────────────────────

    #[test]
    fn same_texture_is_one_draw_call() {
        let mut engine = BatchEngine::new();
        let mut target = RecordingTarget::default();
        engine.begin().unwrap();
        for _ in 0..25 {
            engine.draw_sprite(&mut target, tex(1), square()).unwrap();
        }
        assert!(target.flushes.is_empty());

        let stats = engine.end(&mut target).unwrap();
        assert_eq!(target.counts(), vec![25]);
        assert_eq!(stats, BatchStats { draw_calls: 1, sprites: 25 });
    }

    #[test]
    fn texture_runs_split_flushes() {
        let mut engine = BatchEngine::new();
        let mut target = RecordingTarget::default();
        engine.begin().unwrap();
        for id in [1, 1, 1, 2, 2, 1] {
            engine.draw_sprite(&mut target, tex(id), square()).unwrap();
        }
        engine.end(&mut target).unwrap();

        assert_eq!(target.counts(), vec![3, 2, 1]);
        let order: Vec<u32> = target.flushes.iter().map(|(h, _)| h.id()).collect();
        assert_eq!(order, vec![1, 2, 1]);
    }

    #[test]
    fn alternating_textures_flush_every_sprite() {
        let mut engine = BatchEngine::new();
        let mut target = RecordingTarget::default();
        engine.begin().unwrap();
        for i in 0..8 {
            engine.draw_sprite(&mut target, tex(i % 2), square()).unwrap();
        }
        let stats = engine.end(&mut target).unwrap();
        assert_eq!(stats.draw_calls, 8);
    }

    #[test]
    fn full_batch_flushes_immediately() {
        let mut engine = BatchEngine::with_capacity(4).unwrap();
        let mut target = RecordingTarget::default();
        engine.begin().unwrap();
        for _ in 0..3 {
            engine.draw_sprite(&mut target, tex(1), square()).unwrap();
        }
        assert!(target.flushes.is_empty());

        engine.draw_sprite(&mut target, tex(1), square()).unwrap();
        assert_eq!(target.counts(), vec![4]);
        assert_eq!(engine.instance_count(), 0);

        engine.draw_sprite(&mut target, tex(1), square()).unwrap();
        engine.end(&mut target).unwrap();
        assert_eq!(target.counts(), vec![4, 1]);
    }

    #[test]
    fn default_capacity_flushes_at_limit() {
        let mut engine = BatchEngine::new();
        let mut target = RecordingTarget::default();
        engine.begin().unwrap();
        for _ in 0..MAX_SPRITES_PER_BATCH {
            engine.draw_sprite(&mut target, tex(1), square()).unwrap();
        }
        assert_eq!(target.counts(), vec![MAX_SPRITES_PER_BATCH]);
        let stats = engine.end(&mut target).unwrap();
        assert_eq!(stats.draw_calls, 1);
    }

    #[test]
    fn empty_batch_issues_nothing() {
        let mut engine = BatchEngine::new();
        let mut target = RecordingTarget::default();
        engine.begin().unwrap();
        let stats = engine.end(&mut target).unwrap();
        assert!(target.flushes.is_empty());
        assert_eq!(stats, BatchStats::default());
    }

    #[test]
    fn failed_flush_still_empties_batch() {
        let mut engine = BatchEngine::with_capacity(2).unwrap();
        let mut target = RecordingTarget { fail: true, ..Default::default() };
        engine.begin().unwrap();
        engine.draw_sprite(&mut target, tex(1), square()).unwrap();
        assert!(engine.draw_sprite(&mut target, tex(1), square()).is_err());
        assert_eq!(engine.instance_count(), 0);
    }

    // ── state machine ─────────────────────────────────────────────────────

    #[test]
    fn draw_while_idle_is_rejected() {
        let mut engine = BatchEngine::new();
        let mut target = RecordingTarget::default();
        assert_eq!(
            engine.draw_sprite(&mut target, tex(1), square()),
            Err(BatchError::NotBatching { op: "draw_sprite" })
        );
        assert_eq!(engine.instance_count(), 0);
    }

    #[test]
    fn end_while_idle_is_rejected() {
        let mut engine = BatchEngine::new();
        let mut target = RecordingTarget::default();
        assert_eq!(
            engine.end(&mut target),
            Err(BatchError::NotBatching { op: "end" })
        );
    }

    #[test]
    fn begin_twice_is_rejected() {
        let mut engine = BatchEngine::new();
        let mut target = RecordingTarget::default();
        engine.begin().unwrap();
        engine.draw_sprite(&mut target, tex(1), square()).unwrap();
        assert_eq!(engine.begin(), Err(BatchError::AlreadyBatching));
        assert!(engine.is_batching());
        assert_eq!(engine.instance_count(), 1);
    }

    #[test]
    fn begin_resets_texture() {
        let mut engine = BatchEngine::new();
        let mut target = RecordingTarget::default();
        engine.begin().unwrap();
        engine.draw_sprite(&mut target, tex(7), square()).unwrap();
        engine.end(&mut target).unwrap();

        engine.begin().unwrap();
        assert_eq!(engine.current_texture(), None);
    }

    #[test]
    fn capacity_bounds() {
        assert!(BatchEngine::with_capacity(1).is_ok());
        assert!(BatchEngine::with_capacity(MAX_BATCH_CAPACITY).is_ok());
        assert_eq!(
            BatchEngine::with_capacity(0).err(),
            Some(BatchError::CapacityOutOfRange { requested: 0, max: MAX_BATCH_CAPACITY })
        );
        assert!(BatchEngine::with_capacity(MAX_BATCH_CAPACITY + 1).is_err());
    }

    // ── vertex contents ───────────────────────────────────────────────────

    #[test]
    fn unrotated_quad_uses_rect_corners() {
        let mut engine = BatchEngine::new();
        let mut target = RecordingTarget::default();
        engine.begin().unwrap();
        engine
            .draw_sprite(&mut target, tex(1), Rect::new(10.0, 20.0, 30.0, 40.0))
            .unwrap();
        engine.end(&mut target).unwrap();

        assert_eq!(
            positions(&target.flushes[0].1),
            vec![[10.0, 20.0], [40.0, 20.0], [40.0, 60.0], [10.0, 60.0]]
        );
    }

    #[test]
    fn default_color_is_white() {
        let mut engine = BatchEngine::new();
        let mut target = RecordingTarget::default();
        engine.begin().unwrap();
        engine.draw_sprite(&mut target, tex(1), square()).unwrap();
        engine.end(&mut target).unwrap();

        assert!(target.flushes[0].1.iter().all(|v| v.color == [1.0, 1.0, 1.0]));
    }

    #[test]
    fn tint_reaches_every_vertex() {
        let mut engine = BatchEngine::new();
        let mut target = RecordingTarget::default();
        engine.begin().unwrap();
        let params = DrawParams::new().color(Color::new(0.2, 0.4, 0.6));
        engine.draw_sprite_with(&mut target, tex(1), square(), &params).unwrap();
        engine.end(&mut target).unwrap();

        assert!(target.flushes[0].1.iter().all(|v| v.color == [0.2, 0.4, 0.6]));
    }

    #[test]
    fn full_source_rect_matches_default_uvs() {
        let mut engine = BatchEngine::new();
        let mut target = RecordingTarget::default();
        engine.begin().unwrap();
        engine.draw_sprite(&mut target, tex(1), square()).unwrap();
        engine
            .draw_sprite_source(&mut target, tex(1), square(), Rect::from_size(64.0, 64.0))
            .unwrap();
        engine.end(&mut target).unwrap();

        let vertices = &target.flushes[0].1;
        let uv = |range: std::ops::Range<usize>| -> Vec<[f32; 2]> {
            vertices[range].iter().map(|v| v.uv).collect()
        };
        assert_eq!(uv(0..4), uv(4..8));
    }

    #[test]
    fn rotation_around_center() {
        let theta = 0.7_f32;
        let mut engine = BatchEngine::new();
        let mut target = RecordingTarget::default();
        engine.begin().unwrap();
        let params = DrawParams::new().rotation(theta);
        engine.draw_sprite_with(&mut target, tex(1), square(), &params).unwrap();
        engine.end(&mut target).unwrap();

        let tl = target.flushes[0].1[0].position;
        let (s, c) = theta.sin_cos();
        assert_abs_diff_eq!(tl[0], 5.0 - 5.0 * c + 5.0 * s, epsilon = 1e-5);
        assert_abs_diff_eq!(tl[1], 5.0 - 5.0 * s - 5.0 * c, epsilon = 1e-5);
    }

    #[test]
    fn rotation_around_top_left_keeps_pivot() {
        let mut engine = BatchEngine::new();
        let mut target = RecordingTarget::default();
        engine.begin().unwrap();
        let params = DrawParams::new()
            .rotation(core::f32::consts::FRAC_PI_2)
            .origin(Vec2::ZERO);
        engine
            .draw_sprite_with(&mut target, tex(1), Rect::new(5.0, 5.0, 10.0, 4.0), &params)
            .unwrap();
        engine.end(&mut target).unwrap();

        let [tl, tr, ..] = <[[f32; 2]; 4]>::try_from(positions(&target.flushes[0].1)).unwrap();
        assert_eq!(tl, [5.0, 5.0]);
        // The top edge now points down the screen.
        assert_abs_diff_eq!(tr[0], 5.0, epsilon = 1e-5);
        assert_abs_diff_eq!(tr[1], 15.0, epsilon = 1e-5);
    }
}
