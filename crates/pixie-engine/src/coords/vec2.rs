use core::ops::{Add, Mul, Sub};

/// 2D vector in pixels (or a normalized fraction when used as a rotation origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Center of a rectangle when interpreted as a rotation origin.
    pub const CENTER: Self = Self::new(0.5, 0.5);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise product.
    #[inline]
    pub fn scale(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x * other.x, self.y * other.y)
    }

    /// Rotates `self` around `pivot` by `radians`.
    ///
    /// Positive angles turn from +X towards +Y. With pixel space (+Y down) this
    /// reads as clockwise on screen.
    #[inline]
    pub fn rotate_around(self, pivot: Vec2, radians: f32) -> Vec2 {
        let (sin, cos) = radians.sin_cos();
        let d = self - pivot;
        Vec2::new(
            pivot.x + d.x * cos - d.y * sin,
            pivot.y + d.x * sin + d.y * cos,
        )
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rotate_by_zero_is_identity() {
        let p = Vec2::new(3.0, -7.5);
        let r = p.rotate_around(Vec2::new(1.0, 1.0), 0.0);
        assert_eq!(r, p);
    }

    #[test]
    fn quarter_turn_moves_right_to_down() {
        // +X rotated a quarter turn lands on +Y (downwards on screen).
        let r = Vec2::new(1.0, 0.0).rotate_around(Vec2::ZERO, core::f32::consts::FRAC_PI_2);
        assert_abs_diff_eq!(r.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(r.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn rotation_keeps_distance_to_pivot() {
        let pivot = Vec2::new(4.0, 2.0);
        let p = Vec2::new(10.0, -1.0);
        let before = p - pivot;
        let after = p.rotate_around(pivot, 1.234) - pivot;
        assert_abs_diff_eq!(
            before.x.hypot(before.y),
            after.x.hypot(after.y),
            epsilon = 1e-4
        );
    }

    #[test]
    fn scale_is_component_wise() {
        assert_eq!(Vec2::new(2.0, 3.0).scale(Vec2::new(0.5, 4.0)), Vec2::new(1.0, 12.0));
    }
}
