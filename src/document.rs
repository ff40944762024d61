use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::background::Background;
use crate::emoji::{self, Emoji, EmojiId};
use crate::error::{EmojiArtError, EmojiArtResult};
use crate::id_generator;

/// A piece of emoji art: a background plus emojis in insertion order.
///
/// This is a plain value. Every operation either applies fully or returns an
/// error and leaves the value untouched, so callers can keep old copies
/// around as undo snapshots.
///
/// Emojis are looked up by id with a linear scan. Documents hold tens of
/// emojis, and the scan keeps insertion (z-)order as the only ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiArt {
    background: Background,
    emojis: Vec<Emoji>,
}

impl EmojiArt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Emojis in insertion order, bottom-most first
    pub fn emojis(&self) -> &[Emoji] {
        &self.emojis
    }

    pub fn emoji(&self, id: EmojiId) -> Option<&Emoji> {
        self.emojis.iter().find(|emoji| emoji.id() == id)
    }

    pub fn contains(&self, id: EmojiId) -> bool {
        self.emoji(id).is_some()
    }

    fn index_of(&self, id: EmojiId) -> EmojiArtResult<usize> {
        self.emojis
            .iter()
            .position(|emoji| emoji.id() == id)
            .ok_or(EmojiArtError::NotFound(id))
    }

    /// The id the next `add_emoji` call will assign.
    /// Fails once the largest id in the document is `usize::MAX`.
    pub fn next_emoji_id(&self) -> EmojiArtResult<EmojiId> {
        id_generator::next_id(self.emojis.iter().map(Emoji::id)).ok_or_else(|| {
            EmojiArtError::InvalidInput("no emoji ids left after the largest one".to_owned())
        })
    }

    pub fn add_emoji(
        &mut self,
        text: &str,
        location: (i32, i32),
        size: u32,
    ) -> EmojiArtResult<EmojiId> {
        if !emoji::is_single_emoji(text) {
            return Err(EmojiArtError::InvalidInput(format!(
                "{:?} is not a single emoji",
                text
            )));
        }
        if size == 0 {
            return Err(EmojiArtError::InvalidInput(
                "emoji size must be positive".to_owned(),
            ));
        }

        let id = self.next_emoji_id()?;
        self.emojis
            .push(Emoji::new(id, text.to_owned(), location, size));
        Ok(id)
    }

    /// Moves an emoji by an offset already rounded to document units.
    ///
    /// A move that would leave the `i32` coordinate range is rejected, so a
    /// move followed by the opposite move always lands where it started.
    pub fn move_emoji(&mut self, id: EmojiId, offset: (i32, i32)) -> EmojiArtResult<()> {
        let index = self.index_of(id)?;
        let emoji = &mut self.emojis[index];
        let location = emoji.offset_location(offset).ok_or_else(|| {
            EmojiArtError::InvalidInput(format!(
                "moving emoji {} by {:?} leaves the document",
                id, offset
            ))
        })?;
        emoji.set_location(location);
        Ok(())
    }

    /// Scales an emoji's size, rounding half away from zero and never going below 1.
    pub fn scale_emoji(&mut self, id: EmojiId, factor: f32) -> EmojiArtResult<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(EmojiArtError::InvalidInput(format!(
                "scale factor must be positive, got {}",
                factor
            )));
        }
        let index = self.index_of(id)?;

        let emoji = &mut self.emojis[index];
        let scaled = (f64::from(emoji.size()) * f64::from(factor)).round();
        emoji.set_size(scaled.clamp(1.0, f64::from(u32::MAX)) as u32);
        Ok(())
    }

    pub fn remove_emoji(&mut self, id: EmojiId) -> EmojiArtResult<Emoji> {
        let index = self.index_of(id)?;
        Ok(self.emojis.remove(index))
    }

    /// Replaces the background. Fetching a URL background is the controller's job.
    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub fn encode(&self) -> EmojiArtResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| EmojiArtError::Encode(e.to_string()))
    }

    /// Decodes bytes produced by [`EmojiArt::encode`], rejecting payloads
    /// that break the document invariants.
    pub fn decode(bytes: &[u8]) -> EmojiArtResult<Self> {
        let art: EmojiArt =
            serde_json::from_slice(bytes).map_err(|e| EmojiArtError::Decode(e.to_string()))?;
        art.validate()?;
        Ok(art)
    }

    fn validate(&self) -> EmojiArtResult<()> {
        let mut seen = HashSet::new();
        for emoji in &self.emojis {
            if !seen.insert(emoji.id()) {
                return Err(EmojiArtError::Decode(format!(
                    "duplicate emoji id {}",
                    emoji.id()
                )));
            }
            if emoji.size() == 0 {
                return Err(EmojiArtError::Decode(format!(
                    "emoji {} has zero size",
                    emoji.id()
                )));
            }
            if !emoji::is_single_emoji(emoji.text()) {
                return Err(EmojiArtError::Decode(format!(
                    "emoji {} has invalid text {:?}",
                    emoji.id(),
                    emoji.text()
                )));
            }
        }
        Ok(())
    }
}
