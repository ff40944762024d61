use thiserror::Error;

use crate::emoji::EmojiId;

/// Errors returned by model operations and document intents.
///
/// A failing operation never partially applies: the model is left exactly
/// as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmojiArtError {
    /// Text that is not a single emoji, a non-positive size or scale factor
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The operation referenced an emoji id that is not in the document
    #[error("No emoji with id {0}")]
    NotFound(EmojiId),

    /// Persisted bytes could not be turned back into a document
    #[error("Failed to decode document: {0}")]
    Decode(String),

    #[error("Failed to encode document: {0}")]
    Encode(String),
}

/// Result type for model and intent operations
pub type EmojiArtResult<T> = Result<T, EmojiArtError>;
