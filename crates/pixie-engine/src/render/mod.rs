//! GPU rendering subsystem.
//!
//! Convention:
//! - CPU geometry is in pixels (top-left origin, +Y down).
//! - The camera's projection-view matrix maps that space to clip space in the
//!   vertex shader.

mod camera;
mod ctx;
pub mod sprite;

pub use camera::Camera;
pub use ctx::{RenderCtx, RenderTarget};
