//! Batched textured quads.
//!
//! - [`BatchEngine`]: CPU-side batching, independent of wgpu
//! - [`RenderSession`] / [`SpriteBatch`]: the engine wired to a wgpu frame
//! - [`TextureStore`]: GPU textures behind plain [`Texture`] values

mod batch;
mod error;
mod geometry;
mod pipeline;
mod session;
mod texture;
mod vertex;

pub use batch::{BatchEngine, BatchStats, BatchTarget, DrawParams};
pub use error::BatchError;
pub use geometry::GeometryBuffer;
pub use pipeline::SpritePipeline;
pub use session::{RenderSession, SessionConfig, SpriteBatch};
pub use texture::{Texture, TextureHandle, TextureStore};
pub use vertex::{
    FLOATS_PER_VERTEX, INDICES_PER_SPRITE, MAX_BATCH_CAPACITY, MAX_SPRITES_PER_BATCH,
    SpriteVertex, VERTICES_PER_SPRITE, index_count, quad_indices,
};
