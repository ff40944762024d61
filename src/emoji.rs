use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

pub type EmojiId = usize;

/// An emoji sticker placed on the document.
///
/// Coordinates are in document space with the origin at the document center,
/// independent of the current zoom and pan of any view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Emoji {
    id: EmojiId,
    text: String,
    x: i32,
    y: i32,
    size: u32,
}

impl Emoji {
    pub(crate) fn new(id: EmojiId, text: String, location: (i32, i32), size: u32) -> Self {
        Self {
            id,
            text,
            x: location.0,
            y: location.1,
            size,
        }
    }

    pub fn id(&self) -> EmojiId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn location(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Point size, always at least 1
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The location moved by `offset`, or `None` if that leaves the `i32` range.
    pub(crate) fn offset_location(&self, offset: (i32, i32)) -> Option<(i32, i32)> {
        Some((self.x.checked_add(offset.0)?, self.y.checked_add(offset.1)?))
    }

    pub(crate) fn set_location(&mut self, location: (i32, i32)) {
        self.x = location.0;
        self.y = location.1;
    }

    pub(crate) fn set_size(&mut self, size: u32) {
        self.size = size.max(1);
    }
}

/// Splits `text` into extended grapheme clusters, so ZWJ sequences, flags,
/// keycaps and skin tone modifiers stay together.
pub fn clusters(text: &str) -> Vec<&str> {
    text.graphemes(true).collect()
}

/// Whether a grapheme is a complete emoji in the Unicode emoji tables.
///
/// Bare digits, `#` and `*` are not, and neither is a ZWJ sequence joining
/// an emoji to something that isn't one.
fn is_emoji_cluster(cluster: &str) -> bool {
    emojis::get(cluster).is_some()
}

/// True when `text` is exactly one emoji grapheme.
pub fn is_single_emoji(text: &str) -> bool {
    let mut graphemes = text.graphemes(true);
    match (graphemes.next(), graphemes.next()) {
        (Some(grapheme), None) => is_emoji_cluster(grapheme),
        _ => false,
    }
}

/// The emoji graphemes of `text` in order, dropping everything else.
pub fn emojis_in(text: &str) -> Vec<&str> {
    clusters(text)
        .into_iter()
        .filter(|cluster| is_emoji_cluster(cluster))
        .collect()
}

/// Emoji graphemes of `text`, keeping only the first occurrence of each.
pub fn unique_emojis(text: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for emoji in emojis_in(text) {
        if !seen.contains(&emoji) {
            seen.push(emoji);
        }
    }
    seen.concat()
}
