use glam::{Mat4, Vec3};

use crate::coords::Viewport;

/// Fixed orthographic camera over the canvas.
///
/// Pixel `(0, 0)` is the top-left corner of the target and `(width, height)`
/// the bottom-right. The eye never moves; only the canvas size changes.
#[derive(Debug, Clone)]
pub struct Camera {
    width: f32,
    height: f32,
    projection: Mat4,
    view: Mat4,
    projection_view: Mat4,
}

impl Camera {
    const EYE: Vec3 = Vec3::new(0.0, 0.0, 1.0);
    const TARGET: Vec3 = Vec3::ZERO;
    const UP: Vec3 = Vec3::Y;

    /// Creates a camera for a canvas of `viewport` size.
    ///
    /// Matrices stay identity until the first [`update`](Self::update).
    pub fn new(viewport: Viewport) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection_view: Mat4::IDENTITY,
        }
    }

    /// Changes the canvas size. Takes effect on the next `update`.
    pub fn set_size(&mut self, viewport: Viewport) {
        self.width = viewport.width;
        self.height = viewport.height;
    }

    pub fn size(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    /// Recomputes projection, view and their product.
    pub fn update(&mut self) {
        // Bottom = height, top = 0 flips Y so +Y points down the canvas.
        self.projection = Mat4::orthographic_rh_gl(0.0, self.width, self.height, 0.0, -1.0, 1.0);
        self.view = Mat4::look_at_rh(Self::EYE, Self::TARGET, Self::UP);
        self.projection_view = self.projection * self.view;
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection_view(&self) -> Mat4 {
        self.projection_view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ndc(camera: &Camera, x: f32, y: f32) -> (f32, f32) {
        let p = camera.projection_view().project_point3(Vec3::new(x, y, 0.0));
        (p.x, p.y)
    }

    fn camera(w: f32, h: f32) -> Camera {
        let mut c = Camera::new(Viewport::new(w, h));
        c.update();
        c
    }

    #[test]
    fn identity_before_first_update() {
        let c = Camera::new(Viewport::new(800.0, 600.0));
        assert_eq!(c.projection_view(), Mat4::IDENTITY);
    }

    #[test]
    fn top_left_maps_to_upper_left_ndc() {
        let (x, y) = ndc(&camera(800.0, 600.0), 0.0, 0.0);
        assert_abs_diff_eq!(x, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn bottom_right_maps_to_lower_right_ndc() {
        let (x, y) = ndc(&camera(800.0, 600.0), 800.0, 600.0);
        assert_abs_diff_eq!(x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(y, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn center_maps_to_origin() {
        let (x, y) = ndc(&camera(1024.0, 768.0), 512.0, 384.0);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn resize_applies_on_update() {
        let mut c = camera(100.0, 100.0);
        c.set_size(Viewport::new(200.0, 50.0));
        let stale = ndc(&c, 200.0, 50.0);
        assert_abs_diff_eq!(stale.0, 3.0, epsilon = 1e-5);

        c.update();
        let (x, y) = ndc(&c, 200.0, 50.0);
        assert_abs_diff_eq!(x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(y, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn product_matches_components() {
        let c = camera(320.0, 240.0);
        let expected = c.projection() * c.view();
        assert!(c.projection_view().abs_diff_eq(expected, 1e-6));
    }
}
