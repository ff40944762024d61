use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::emoji;
use crate::id_generator;
use crate::state::persistence::{self, PersistenceResult};

pub type PaletteId = usize;

/// A named set of emojis offered as quick-insert shortcuts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub id: PaletteId,
    pub name: String,
    /// Distinct emoji graphemes, concatenated
    pub emojis: String,
}

impl Palette {
    /// The palette's emojis one grapheme at a time
    pub fn emoji_list(&self) -> Vec<&str> {
        emoji::emojis_in(&self.emojis)
    }
}

const DEFAULT_PALETTES: &[(&str, &str)] = &[
    ("Vehicles", "🚙🚗🚘🚕🚖🏎🚚🛻🚛🚐🚓🚔🚑🚒🚀✈️🛫🛬🛩🚁🛸🚲🏍🛶⛵️🚤🛥🛳⛴🚢🚂🚝🚅🚆🚊🚉🚇🛺🚜"),
    ("Sports", "🏈⚾️🏀⚽️🎾🏐🥏🏓⛳️🥅🥌🏂⛷🎳"),
    ("Music", "🎼🎤🎹🪘🥁🎺🪗🪕🎻"),
    ("Animals", "🐥🐣🐂🐄🐎🐖🐏🐑🦙🐐🐓🐁🐀🐒🦆🦅🦉🦇🐢🐍🦎🦖🦕🐅🐆🦓🦍🦧🦣🐘🦛🦏🐪🐫🦒🦘🦬🐃🦙🐐🦌🐕🐩🦮🐈🦤🦢🦩🕊🦝🦨🦡🦫🦦🦥🐿🦔"),
    ("Animal Faces", "🐵🙈🙊🙉🐶🐱🐭🐹🐰🦊🐻🐼🐻‍❄️🐨🐯🦁🐮🐷🐸🐲"),
    ("Flora", "🌲🌴🌿☘️🍀🍁🍄🌾💐🌷🌹🥀🌺🌸🌼🌻"),
    ("Weather", "☀️🌤⛅️🌥☁️🌦🌧⛈🌩🌨❄️💨☔️💧💦🌊☂️🌫🌪"),
    ("COVID", "💉🦠😷🤧🤒"),
    ("Faces", "😀😃😄😁😆😅😂🤣🥲☺️😊😇🙂🙃😉😌😍🥰😘😗😙😚😋😛😝😜🤪🤨🧐🤓😎🥸🤩🥳😏😞😔😟😕🙁☹️😣😖😫😩🥺😢😭😤😠😡🤯😳😶‍🌫️😥😓🤗🤔🤭🤫🤥😬🙄😯😧🥱😴🤮😷🤧🤒🤠"),
];

/// An ordered, named collection of palettes.
///
/// The store is never empty: it seeds the default palettes when created or
/// loaded empty, and refuses to remove its last palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteStore {
    name: String,
    palettes: Vec<Palette>,
}

impl PaletteStore {
    /// A store seeded with the default palettes
    pub fn named(name: impl Into<String>) -> Self {
        let mut store = Self {
            name: name.into(),
            palettes: Vec::new(),
        };
        store.seed_defaults();
        store
    }

    fn seed_defaults(&mut self) {
        for (name, emojis) in DEFAULT_PALETTES {
            self.insert_palette(name, emojis, self.palettes.len());
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    /// The palette at `index`, clamped into range so any index is usable
    pub fn palette(&self, index: usize) -> &Palette {
        let index = self.clamped(index);
        &self.palettes[index]
    }

    pub fn palette_by_id(&self, id: PaletteId) -> Option<&Palette> {
        self.palettes.iter().find(|palette| palette.id == id)
    }

    pub fn index_of(&self, id: PaletteId) -> Option<usize> {
        self.palettes.iter().position(|palette| palette.id == id)
    }

    fn clamped(&self, index: usize) -> usize {
        index.min(self.palettes.len().saturating_sub(1))
    }

    /// Inserts a palette at `index` (clamped to the end) and returns its id.
    /// Non-emoji characters and duplicates are dropped from `emojis`.
    ///
    /// Returns `None`, leaving the store unchanged, when no id is left.
    pub fn insert_palette(
        &mut self,
        name: &str,
        emojis: &str,
        index: usize,
    ) -> Option<PaletteId> {
        let existing = self.palettes.iter().map(|palette| palette.id);
        let Some(id) = id_generator::next_id(existing) else {
            warn!("No palette ids left in store {}", self.name);
            return None;
        };
        let palette = Palette {
            id,
            name: name.to_owned(),
            emojis: emoji::unique_emojis(emojis),
        };
        let index = index.min(self.palettes.len());
        self.palettes.insert(index, palette);
        Some(id)
    }

    /// Removes the palette at `index` (clamped) unless it is the last one left.
    pub fn remove_palette(&mut self, index: usize) -> Option<Palette> {
        if self.palettes.len() <= 1 {
            warn!("Refusing to remove the last palette of store {}", self.name);
            return None;
        }
        let index = self.clamped(index);
        Some(self.palettes.remove(index))
    }

    /// Moves the palette at `from` so it ends up at `to`. Out of range indices are clamped.
    pub fn move_palette(&mut self, from: usize, to: usize) {
        if self.palettes.is_empty() {
            return;
        }
        let from = self.clamped(from);
        let palette = self.palettes.remove(from);
        let to = to.min(self.palettes.len());
        self.palettes.insert(to, palette);
    }

    pub fn rename_palette(&mut self, id: PaletteId, name: &str) -> bool {
        match self.palettes.iter_mut().find(|palette| palette.id == id) {
            Some(palette) => {
                palette.name = name.to_owned();
                true
            }
            None => false,
        }
    }

    /// Adds the emojis in `text` to the front of a palette, keeping the set
    /// free of duplicates and non-emoji characters.
    pub fn add_emojis(&mut self, id: PaletteId, text: &str) -> bool {
        match self.palettes.iter_mut().find(|palette| palette.id == id) {
            Some(palette) => {
                palette.emojis = emoji::unique_emojis(&format!("{}{}", text, palette.emojis));
                true
            }
            None => false,
        }
    }

    pub fn remove_emoji(&mut self, id: PaletteId, emoji: &str) -> bool {
        match self.palettes.iter_mut().find(|palette| palette.id == id) {
            Some(palette) => {
                palette.emojis = emoji::emojis_in(&palette.emojis)
                    .into_iter()
                    .filter(|existing| *existing != emoji)
                    .collect();
                true
            }
            None => false,
        }
    }

    /// Loads the store called `name` from `dir`, falling back to the
    /// defaults when there is no saved store yet.
    pub fn load(dir: impl AsRef<Path>, name: &str) -> PersistenceResult<Self> {
        let path = persistence::palette_store_path(&dir, name);
        if !path.exists() {
            info!("No saved palette store {}, using defaults", name);
            return Ok(Self::named(name));
        }

        let mut store: PaletteStore = persistence::read_json(&path)?;
        store.name = name.to_owned();
        if store.palettes.is_empty() {
            store.seed_defaults();
        }
        info!("Loaded palette store {} ({} palettes)", name, store.len());
        Ok(store)
    }

    pub fn save(&self, dir: impl AsRef<Path>) -> PersistenceResult<()> {
        let path = persistence::palette_store_path(&dir, &self.name);
        persistence::write_json(&path, self)?;
        info!("Saved palette store {} to {}", self.name, path.display());
        Ok(())
    }
}
