//! Pixie engine crate.
//!
//! Batched 2D sprite rendering on wgpu, plus the window/GPU runtime that
//! drives it.

pub mod content;
pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod window;
