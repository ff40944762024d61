use serde::{Deserialize, Serialize};

use crate::background::Background;
use crate::document::EmojiArt;
use crate::emoji::EmojiId;
use crate::error::EmojiArtResult;

/// The intents that change a document.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Place a new emoji
    AddEmoji {
        text: String,
        location: (i32, i32),
        size: u32,
    },

    /// Move an emoji by a document-space offset
    MoveEmoji {
        id: EmojiId,
        offset: (i32, i32),
    },

    /// Resize an emoji by a factor
    ScaleEmoji {
        id: EmojiId,
        factor: f32,
    },

    /// Take an emoji off the document
    RemoveEmoji {
        id: EmojiId,
    },

    SetBackground(Background),
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::AddEmoji { text, location, size } => f
                .debug_struct("AddEmoji")
                .field("text", text)
                .field("location", location)
                .field("size", size)
                .finish(),
            Command::MoveEmoji { id, offset } => f
                .debug_struct("MoveEmoji")
                .field("id", id)
                .field("offset", offset)
                .finish(),
            Command::ScaleEmoji { id, factor } => f
                .debug_struct("ScaleEmoji")
                .field("id", id)
                .field("factor", factor)
                .finish(),
            Command::RemoveEmoji { id } => f.debug_struct("RemoveEmoji").field("id", id).finish(),
            Command::SetBackground(background) => {
                f.debug_tuple("SetBackground").field(background).finish()
            }
        }
    }
}

impl Command {
    /// Applies the command to `art` in place.
    ///
    /// Errors leave `art` unchanged.
    pub fn execute(&self, art: &mut EmojiArt) -> EmojiArtResult<()> {
        match self {
            Command::AddEmoji { text, location, size } => {
                art.add_emoji(text, *location, *size)?;
            }
            Command::MoveEmoji { id, offset } => art.move_emoji(*id, *offset)?,
            Command::ScaleEmoji { id, factor } => art.scale_emoji(*id, *factor)?,
            Command::RemoveEmoji { id } => {
                art.remove_emoji(*id)?;
            }
            Command::SetBackground(background) => art.set_background(background.clone()),
        }
        Ok(())
    }

    /// Applies the command to a copy of `art` and returns the new value.
    pub fn apply(&self, art: &EmojiArt) -> EmojiArtResult<EmojiArt> {
        let mut updated = art.clone();
        self.execute(&mut updated)?;
        Ok(updated)
    }

    /// Short action name for undo/redo menu titles
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddEmoji { .. } => "Add",
            Command::MoveEmoji { .. } => "Move",
            Command::ScaleEmoji { .. } => "Scale",
            Command::RemoveEmoji { .. } => "Remove",
            Command::SetBackground(_) => "Set Background",
        }
    }
}
