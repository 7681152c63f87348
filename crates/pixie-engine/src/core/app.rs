use winit::event::WindowEvent;

use crate::coords::Viewport;
use crate::render::RenderCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`Runtime`](crate::window::Runtime).
pub trait App {
    /// Called once, right after the GPU device exists.
    ///
    /// Create render sessions and upload textures here. An error stops the runtime.
    fn on_start(&mut self, ctx: &RenderCtx<'_>) -> anyhow::Result<()>;

    /// Called after the window is resized or its scale factor changes.
    fn on_resize(&mut self, viewport: Viewport) {
        let _ = viewport;
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
