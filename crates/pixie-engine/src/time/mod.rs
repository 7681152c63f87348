//! Frame timing.
//!
//! The runtime ticks one `FrameClock` per redraw and hands the resulting
//! `FrameTime` to the app, which uses it to animate sprites.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
