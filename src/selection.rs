use std::collections::BTreeSet;

use crate::document::EmojiArt;
use crate::emoji::EmojiId;

/// The set of selected emoji ids. Transient view state, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<EmojiId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `id` if it wasn't, deselects it otherwise.
    /// Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: EmojiId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: EmojiId) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drops ids of emojis no longer in `art`. Returns true if any were dropped.
    pub fn retain_existing(&mut self, art: &EmojiArt) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| art.contains(*id));
        self.ids.len() != before
    }

    pub fn ids(&self) -> &BTreeSet<EmojiId> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
