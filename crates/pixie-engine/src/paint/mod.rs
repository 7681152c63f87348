//! Color model shared by sprites and the frame clear.
//!
//! Sprite tints are straight RGB without alpha; transparency comes from the
//! texture's alpha channel only.

pub mod color;

pub use color::Color;
