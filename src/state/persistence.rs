use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::document::EmojiArt;

/// Errors that can occur while saving or loading files
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write: {0}")]
    WriteError(#[from] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadError(String),

    #[error("Invalid data: {0}")]
    InvalidState(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Serializes `value` as pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> PersistenceResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> PersistenceResult<T> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .map_err(|e| PersistenceError::ReadError(format!("{}: {}", path.display(), e)))?;
    Ok(serde_json::from_str(&json)?)
}

/// Writes an encoded document to `path`.
pub fn save_document(path: impl AsRef<Path>, art: &EmojiArt) -> PersistenceResult<()> {
    let path = path.as_ref();
    let bytes = art
        .encode()
        .map_err(|e| PersistenceError::InvalidState(e.to_string()))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    info!("Saved document to {}", path.display());
    Ok(())
}

pub fn load_document(path: impl AsRef<Path>) -> PersistenceResult<EmojiArt> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .map_err(|e| PersistenceError::ReadError(format!("{}: {}", path.display(), e)))?;
    let art =
        EmojiArt::decode(&bytes).map_err(|e| PersistenceError::InvalidState(e.to_string()))?;
    info!("Loaded document from {}", path.display());
    Ok(art)
}

/// File a named palette store is kept in, inside `dir`
pub fn palette_store_path(dir: impl AsRef<Path>, name: &str) -> PathBuf {
    dir.as_ref().join(format!("palette_store_{}.json", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs").join("art.emojiart");

        let mut art = EmojiArt::new();
        art.add_emoji("🤓", (-200, -200), 60).unwrap();
        save_document(&path, &art).unwrap();

        assert_eq!(load_document(&path).unwrap(), art);
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_document(dir.path().join("missing.emojiart"));
        assert!(matches!(result, Err(PersistenceError::ReadError(_))));
    }

    #[test]
    fn test_load_garbage_is_invalid_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.emojiart");
        fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(
            load_document(&path),
            Err(PersistenceError::InvalidState(_))
        ));
    }
}
