use super::Vec2;

/// Axis-aligned rectangle in pixels (top-left origin, +Y down).
///
/// Used both for destination placement (screen pixels) and for source regions
/// (texels). Width and height are expected to be non-negative; nothing enforces it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub fn top_left(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Point at a normalized position inside the rectangle.
    ///
    /// `(0, 0)` is the top-left corner, `(1, 1)` the bottom-right and
    /// `(0.5, 0.5)` the center.
    #[inline]
    pub fn point_at(self, fraction: Vec2) -> Vec2 {
        self.top_left() + self.size().scale(fraction)
    }

    /// Corners in quad order: top-left, top-right, bottom-right, bottom-left.
    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        let right = self.x + self.width;
        let bottom = self.y + self.height;
        [
            Vec2::new(self.x, self.y),
            Vec2::new(right, self.y),
            Vec2::new(right, bottom),
            Vec2::new(self.x, bottom),
        ]
    }

    /// Moves the rectangle so its top-left corner sits at `(x, y)`.
    #[inline]
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.top_left().is_finite() && self.size().is_finite()
    }
}
