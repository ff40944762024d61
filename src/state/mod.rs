mod controller;
pub mod persistence;

pub use controller::{EmojiArtDocument, SharedDocument};
pub use persistence::{PersistenceError, PersistenceResult, load_document, save_document};
