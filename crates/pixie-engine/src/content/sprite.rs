use crate::coords::Rect;
use crate::render::sprite::Texture;

/// A texture region placed on the canvas.
///
/// `source_rect` is in texels, `draw_rect` in pixels. Callers move the
/// sprite by changing `draw_rect` between frames.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sprite {
    pub texture: Texture,
    pub draw_rect: Rect,
    pub source_rect: Rect,
}

impl Sprite {
    pub fn new(texture: Texture, draw_rect: Rect, source_rect: Rect) -> Self {
        Self {
            texture,
            draw_rect,
            source_rect,
        }
    }

    /// Whole texture drawn at its native size at the origin.
    pub fn from_texture(texture: Texture) -> Self {
        let size = Rect::from_size(texture.width as f32, texture.height as f32);
        Self::new(texture, size, size)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.draw_rect.set_position(x, y);
    }
}
