use thiserror::Error;

use super::texture::TextureHandle;

/// Misuse of the begin / draw / end cycle or an unusable batch setup.
///
/// Returning one of these never corrupts batch state: the call is rejected
/// and the engine stays where it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("`{op}` called outside of begin()/end()")]
    NotBatching { op: &'static str },

    #[error("begin() called while a batch is already open")]
    AlreadyBatching,

    #[error("texture {0:?} is not owned by this texture store")]
    UnknownTexture(TextureHandle),

    #[error("batch capacity {requested} is outside 1..={max}")]
    CapacityOutOfRange { requested: usize, max: usize },
}
