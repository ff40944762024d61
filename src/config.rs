use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::state::persistence::{self, PersistenceResult};

/// Settings for background image downloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Give up on a download after this many seconds. `None` waits for the
    /// transport to report an error.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: concat!("emoji_art/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// Application settings.
///
/// Unknown or missing fields fall back to their defaults, so config files
/// written by older versions keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmojiArtConfig {
    /// Point size of an emoji dropped at zoom 1.0
    pub default_emoji_size: f32,
    /// Name of the palette store shared by all documents
    pub palette_store: String,
    pub fetch: FetchConfig,
}

impl Default for EmojiArtConfig {
    fn default() -> Self {
        Self {
            default_emoji_size: 40.0,
            palette_store: "Default".to_owned(),
            fetch: FetchConfig::default(),
        }
    }
}

impl EmojiArtConfig {
    pub fn load(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        persistence::read_json(path)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> PersistenceResult<()> {
        persistence::write_json(path, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: EmojiArtConfig =
            serde_json::from_str(r#"{"fetch":{"timeout_secs":5}}"#).unwrap();
        assert_eq!(config.default_emoji_size, 40.0);
        assert_eq!(config.palette_store, "Default");
        assert_eq!(config.fetch.timeout_secs, Some(5));
        assert!(config.fetch.user_agent.starts_with("emoji_art/"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = EmojiArtConfig {
            default_emoji_size: 32.0,
            ..EmojiArtConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(EmojiArtConfig::load(&path).unwrap(), config);
    }
}
