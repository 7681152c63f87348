//! Named content: textures, sprites and sprite sheets.

mod atlas;
mod sprite;
mod store;

pub use atlas::{AtlasError, AtlasRegion, parse_atlas};
pub use sprite::Sprite;
pub use store::ContentStore;
