use log::debug;

use super::Command;
use crate::document::EmojiArt;

/// One undoable step: the command and the document before and after it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub command: Command,
    pub before: EmojiArt,
    pub after: EmojiArt,
}

/// Receives an entry for every intent that changes a document.
pub trait UndoRecorder {
    fn record(&mut self, entry: HistoryEntry);
}

/// Snapshot-based undo/redo history for a single document
#[derive(Debug, Default)]
pub struct CommandHistory {
    /// Entries that can be undone, most recent last
    undo_stack: Vec<HistoryEntry>,
    /// Entries that can be redone, most recently undone last
    redo_stack: Vec<HistoryEntry>,
    /// Oldest entries are dropped beyond this many
    limit: Option<usize>,
}

impl CommandHistory {
    /// Creates a new empty command history
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history that keeps at most `limit` undo steps
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Moves the latest entry to the redo stack and returns the document
    /// as it was before that entry.
    pub fn undo(&mut self) -> Option<EmojiArt> {
        let entry = self.undo_stack.pop()?;
        debug!("Undo {}", entry.command.name());
        let before = entry.before.clone();
        self.redo_stack.push(entry);
        Some(before)
    }

    /// Moves the latest undone entry back and returns the document as it
    /// was after that entry.
    pub fn redo(&mut self) -> Option<EmojiArt> {
        let entry = self.redo_stack.pop()?;
        debug!("Redo {}", entry.command.name());
        let after = entry.after.clone();
        self.undo_stack.push(entry);
        Some(after)
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Menu title for the next undo, e.g. "Undo Move"
    pub fn undo_title(&self) -> Option<String> {
        self.undo_stack
            .last()
            .map(|entry| format!("Undo {}", entry.command.name()))
    }

    pub fn redo_title(&self) -> Option<String> {
        self.redo_stack
            .last()
            .map(|entry| format!("Redo {}", entry.command.name()))
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl UndoRecorder for CommandHistory {
    fn record(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        self.redo_stack.clear();

        if let Some(limit) = self.limit {
            if self.undo_stack.len() > limit {
                let excess = self.undo_stack.len() - limit;
                self.undo_stack.drain(..excess);
            }
        }
    }
}
