#![warn(clippy::all, rust_2018_idioms)]

pub mod background;
pub mod bitmap;
pub mod command;
pub mod config;
pub mod document;
pub mod emoji;
pub mod error;
pub mod event;
pub mod fetch;
mod id_generator;
pub mod palette;
pub mod selection;
pub mod state;
pub mod view;

pub use background::Background;
pub use bitmap::BackgroundImage;
pub use command::{Command, CommandHistory, HistoryEntry, UndoRecorder};
pub use config::{EmojiArtConfig, FetchConfig};
pub use document::EmojiArt;
pub use emoji::{Emoji, EmojiId};
pub use error::{EmojiArtError, EmojiArtResult};
pub use event::{DocumentEvent, DocumentSnapshot, EventBus, EventHandler};
pub use fetch::{BackgroundFetchStatus, FetchError, ImageFetcher};
pub use palette::{Palette, PaletteId, PaletteStore};
pub use selection::Selection;
pub use state::{EmojiArtDocument, SharedDocument};
pub use view::ViewTransform;
