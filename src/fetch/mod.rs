//! Background image fetching.
//!
//! The state machine for a URL background:
//!
//! ```text
//!   ┌──────┐  set_background(Url)  ┌──────────────┐  bytes decode   ┌──────┐
//!   │ Idle ├──────────────────────►│ Fetching(url)├────────────────►│ Idle │ + image
//!   └──────┘                       └──────┬───────┘                 └──────┘
//!                                         │ transport or decode error
//!                                         ▼
//!                                   ┌─────────────┐
//!                                   │ Failed(url) │
//!                                   └─────────────┘
//! ```
//!
//! Every background change bumps a generation counter. A completion carrying
//! an older generation is dropped on arrival, so a slow response for a URL
//! that has since been replaced can never overwrite newer state.

mod fetcher;

use log::debug;
use thiserror::Error;
use url::Url;

use crate::bitmap::BitmapError;

pub use fetcher::{
    FetchCompletion, FetchReply, FetchRequest, HttpImageFetcher, ImageFetcher, fetch_bytes,
};

/// Errors from fetching background bytes. They only ever surface as
/// [`BackgroundFetchStatus::Failed`], never as an intent error.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Server responded with status {0}")]
    Status(i32),
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error("Not a local file path: {0}")]
    InvalidPath(String),
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Fetched data is not a usable image: {0}")]
    Decode(#[from] BitmapError),
    #[error("Fetch was dropped before it completed")]
    Abandoned,
}

/// Transient, UI-facing status of the background image. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BackgroundFetchStatus {
    #[default]
    Idle,
    Fetching(Url),
    /// The background could not be turned into an image. Carries the URL for
    /// URL backgrounds and `None` for inline image data that failed to decode.
    Failed(Option<Url>),
}

impl BackgroundFetchStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, BackgroundFetchStatus::Idle)
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self, BackgroundFetchStatus::Fetching(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BackgroundFetchStatus::Failed(_))
    }
}

/// Tracks the fetch status together with the request generation.
#[derive(Debug, Default)]
pub struct FetchTracker {
    generation: u64,
    status: BackgroundFetchStatus,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &BackgroundFetchStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a fetch for `url`, invalidating any fetch still in flight.
    /// Returns the generation the completion must carry to be accepted.
    pub fn begin(&mut self, url: Url) -> u64 {
        self.generation += 1;
        self.status = BackgroundFetchStatus::Fetching(url);
        self.generation
    }

    /// Invalidates any fetch in flight and returns to `Idle`.
    /// Used when the background changes to a variant that needs no fetch.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.status = BackgroundFetchStatus::Idle;
    }

    /// Marks inline image data as undecodable.
    pub fn fail_inline(&mut self) {
        self.status = BackgroundFetchStatus::Failed(None);
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation && self.status.is_fetching()
    }

    /// Resolves the fetch tagged `generation`. Returns false, without touching
    /// the status, when that fetch has been superseded.
    pub fn resolve(&mut self, generation: u64, succeeded: bool) -> bool {
        let url = match &self.status {
            BackgroundFetchStatus::Fetching(url) if generation == self.generation => url.clone(),
            _ => {
                debug!(
                    "Ignoring stale fetch completion (generation {}, current {})",
                    generation, self.generation
                );
                return false;
            }
        };

        self.status = if succeeded {
            BackgroundFetchStatus::Idle
        } else {
            BackgroundFetchStatus::Failed(Some(url))
        };
        true
    }
}
