use std::sync::Arc;

use crate::bitmap::BackgroundImage;
use crate::command::Command;
use crate::document::EmojiArt;
use crate::fetch::BackgroundFetchStatus;
use crate::selection::Selection;

/// Everything a renderer needs, frozen at one point in time.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    pub art: EmojiArt,
    pub background_image: Option<BackgroundImage>,
    pub fetch_status: BackgroundFetchStatus,
    pub selection: Selection,
}

/// Published by a document after each change, synchronously for intents
/// and whenever a background fetch resolves.
#[derive(Debug, Clone)]
pub enum DocumentEvent {
    /// An intent changed the document
    Changed {
        command: Command,
        snapshot: Arc<DocumentSnapshot>,
    },
    /// The document was replaced by an undo, redo or load
    Restored { snapshot: Arc<DocumentSnapshot> },
    SelectionChanged { snapshot: Arc<DocumentSnapshot> },
    /// A background fetch succeeded or failed
    BackgroundResolved { snapshot: Arc<DocumentSnapshot> },
}

impl DocumentEvent {
    pub fn snapshot(&self) -> &Arc<DocumentSnapshot> {
        match self {
            DocumentEvent::Changed { snapshot, .. }
            | DocumentEvent::Restored { snapshot }
            | DocumentEvent::SelectionChanged { snapshot }
            | DocumentEvent::BackgroundResolved { snapshot } => snapshot,
        }
    }
}
