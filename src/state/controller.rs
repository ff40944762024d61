//! The document controller: the single owner of one piece of emoji art.
//!
//! `EmojiArtDocument` holds the model, the background fetch state, the
//! decoded background image and the selection. Collaborators change the
//! document only through its intents and observe it through snapshots and
//! [`DocumentEvent`]s.
//!
//! # Threading
//!
//! Intents take `&mut self`, so they are serialized by construction. The
//! only concurrent work is the background fetch, which runs wherever the
//! [`ImageFetcher`] puts it and hands its result back over a channel. The
//! result is applied when the owner calls [`EmojiArtDocument::poll_background`]
//! (typically once per frame) or [`EmojiArtDocument::wait_for_background`].
//! Callers that must drive a document from several threads wrap it with
//! [`EmojiArtDocument::into_shared`].
//!
//! # Example
//!
//! ```rust,no_run
//! use emoji_art::{CommandHistory, EmojiArtDocument};
//!
//! let mut document = EmojiArtDocument::new();
//! let mut history = CommandHistory::new();
//!
//! let id = document.add_emoji("🤓", (-200, -200), 60.0, Some(&mut history))?;
//! document.move_emoji(id, (10, 5), Some(&mut history))?;
//! document.undo(&mut history);
//! # Ok::<(), emoji_art::EmojiArtError>(())
//! ```
use std::sync::Arc;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{FutureExt, StreamExt};
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::background::{self, Background};
use crate::bitmap::{self, BackgroundImage};
use crate::command::{Command, CommandHistory, HistoryEntry, UndoRecorder};
use crate::config::EmojiArtConfig;
use crate::document::EmojiArt;
use crate::emoji::{Emoji, EmojiId};
use crate::error::{EmojiArtError, EmojiArtResult};
use crate::event::{DocumentEvent, DocumentSnapshot, EventBus, EventHandler};
use crate::fetch::{
    BackgroundFetchStatus, FetchCompletion, FetchError, FetchReply, FetchRequest, FetchTracker,
    HttpImageFetcher, ImageFetcher,
};
use crate::selection::Selection;

/// A document shared between threads; every intent runs under the lock.
pub type SharedDocument = Arc<Mutex<EmojiArtDocument>>;

pub struct EmojiArtDocument {
    art: EmojiArt,
    selection: Selection,
    fetch: FetchTracker,
    background_image: Option<BackgroundImage>,
    fetcher: Arc<dyn ImageFetcher>,
    completions_tx: UnboundedSender<FetchCompletion>,
    completions: UnboundedReceiver<FetchCompletion>,
    event_bus: EventBus,
    config: EmojiArtConfig,
}

impl std::fmt::Debug for EmojiArtDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmojiArtDocument")
            .field("art", &self.art)
            .field("selection", &self.selection)
            .field("fetch", &self.fetch)
            .field("has_background_image", &self.background_image.is_some())
            .field("event_bus", &self.event_bus)
            .finish()
    }
}

impl Default for EmojiArtDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl EmojiArtDocument {
    /// An empty document that downloads backgrounds over HTTP
    pub fn new() -> Self {
        Self::with_config(EmojiArtConfig::default())
    }

    pub fn with_config(config: EmojiArtConfig) -> Self {
        let fetcher = Arc::new(HttpImageFetcher::new(config.fetch.clone()));
        Self::with_fetcher(config, fetcher)
    }

    pub fn with_fetcher(config: EmojiArtConfig, fetcher: Arc<dyn ImageFetcher>) -> Self {
        let (completions_tx, completions) = mpsc::unbounded();
        Self {
            art: EmojiArt::new(),
            selection: Selection::new(),
            fetch: FetchTracker::new(),
            background_image: None,
            fetcher,
            completions_tx,
            completions,
            event_bus: EventBus::new(),
            config,
        }
    }

    /// The starter content a new document opens with
    pub fn with_sample_content(mut self) -> Self {
        let mut art = EmojiArt::new();
        let seeded = art
            .add_emoji("🤓", (-200, -200), 60)
            .and_then(|_| art.add_emoji("😷", (50, 50), 50));
        match seeded {
            Ok(_) => self.art = art,
            Err(err) => warn!("Failed to seed sample content: {}", err),
        }
        self
    }

    pub fn into_shared(self) -> SharedDocument {
        Arc::new(Mutex::new(self))
    }

    pub fn art(&self) -> &EmojiArt {
        &self.art
    }

    pub fn emojis(&self) -> &[Emoji] {
        self.art.emojis()
    }

    pub fn background(&self) -> &Background {
        self.art.background()
    }

    pub fn background_image(&self) -> Option<&BackgroundImage> {
        self.background_image.as_ref()
    }

    pub fn fetch_status(&self) -> &BackgroundFetchStatus {
        self.fetch.status()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selected(&self, id: EmojiId) -> bool {
        self.selection.contains(id)
    }

    pub fn config(&self) -> &EmojiArtConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Arc<DocumentSnapshot> {
        Arc::new(DocumentSnapshot {
            art: self.art.clone(),
            background_image: self.background_image.clone(),
            fetch_status: self.fetch.status().clone(),
            selection: self.selection.clone(),
        })
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.event_bus.subscribe(handler);
    }

    pub fn subscribe_channel(&self) -> UnboundedReceiver<DocumentEvent> {
        self.event_bus.subscribe_channel()
    }

    pub fn encode(&self) -> EmojiArtResult<Vec<u8>> {
        self.art.encode()
    }

    /// Places an emoji and returns its id.
    ///
    /// `size` comes straight from the view (default size divided by zoom) and
    /// is rounded half away from zero.
    pub fn add_emoji(
        &mut self,
        text: &str,
        location: (i32, i32),
        size: f32,
        undo: Option<&mut dyn UndoRecorder>,
    ) -> EmojiArtResult<EmojiId> {
        let size = Self::point_size(size)?;
        let id = self.art.next_emoji_id()?;
        self.perform(
            Command::AddEmoji {
                text: text.to_owned(),
                location,
                size,
            },
            undo,
        )?;
        Ok(id)
    }

    /// Moves an emoji. Unknown ids are ignored.
    pub fn move_emoji(
        &mut self,
        id: EmojiId,
        offset: (i32, i32),
        undo: Option<&mut dyn UndoRecorder>,
    ) -> EmojiArtResult<()> {
        self.perform(Command::MoveEmoji { id, offset }, undo)
    }

    /// Scales an emoji. Unknown ids are ignored; non-positive factors are rejected.
    pub fn scale_emoji(
        &mut self,
        id: EmojiId,
        factor: f32,
        undo: Option<&mut dyn UndoRecorder>,
    ) -> EmojiArtResult<()> {
        self.perform(Command::ScaleEmoji { id, factor }, undo)
    }

    /// Removes an emoji, deselecting it. Unknown ids are ignored.
    pub fn remove_emoji(
        &mut self,
        id: EmojiId,
        undo: Option<&mut dyn UndoRecorder>,
    ) -> EmojiArtResult<()> {
        self.perform(Command::RemoveEmoji { id }, undo)
    }

    /// Replaces the background and starts fetching or decoding it.
    pub fn set_background(
        &mut self,
        background: Background,
        undo: Option<&mut dyn UndoRecorder>,
    ) -> EmojiArtResult<()> {
        self.perform(Command::SetBackground(background), undo)
    }

    /// Selects or deselects an emoji. Unknown ids are ignored.
    pub fn toggle_selection(&mut self, id: EmojiId) {
        if !self.art.contains(id) {
            debug!("Ignoring selection toggle for unknown emoji {}", id);
            return;
        }
        self.selection.toggle(id);
        self.publish_selection();
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.selection.clear();
        self.publish_selection();
    }

    /// Restores the document to before the last recorded intent.
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self, history: &mut CommandHistory) -> bool {
        match history.undo() {
            Some(art) => {
                self.restore(art);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self, history: &mut CommandHistory) -> bool {
        match history.redo() {
            Some(art) => {
                self.restore(art);
                true
            }
            None => false,
        }
    }

    /// Replaces the whole document with one decoded from `bytes`.
    ///
    /// The selection is cleared, since ids in the new document may name
    /// different emojis. On error the current document is kept.
    pub fn load(&mut self, bytes: &[u8]) -> EmojiArtResult<()> {
        let art = EmojiArt::decode(bytes)?;
        info!("Loaded document with {} emojis", art.emojis().len());
        self.selection.clear();
        self.restore(art);
        Ok(())
    }

    /// Applies every fetch result that has arrived, without blocking.
    /// Returns true if the document changed.
    pub fn poll_background(&mut self) -> bool {
        let mut changed = false;
        while let Some(Some(completion)) = self.completions.next().now_or_never() {
            changed |= self.apply_completion(completion);
        }
        changed
    }

    /// Blocks until the current background fetch resolves, then returns the status.
    pub fn wait_for_background(&mut self) -> &BackgroundFetchStatus {
        while self.fetch.status().is_fetching() {
            match futures::executor::block_on(self.completions.next()) {
                Some(completion) => {
                    self.apply_completion(completion);
                }
                None => break,
            }
        }
        self.fetch.status()
    }

    fn apply_completion(&mut self, completion: FetchCompletion) -> bool {
        let FetchCompletion {
            generation,
            url,
            result,
        } = completion;

        if !self.fetch.is_current(generation) {
            debug!("Discarding stale background for {}", url);
            return false;
        }

        let decoded =
            result.and_then(|bytes| bitmap::decode_background(&bytes).map_err(FetchError::from));
        match decoded {
            Ok(image) => {
                info!(
                    "Background from {} ready: {}x{}",
                    url, image.size[0], image.size[1]
                );
                self.fetch.resolve(generation, true);
                self.background_image = Some(image);
            }
            Err(err) => {
                warn!("Couldn't load background image from {}: {}", url, err);
                self.fetch.resolve(generation, false);
                self.background_image = None;
            }
        }

        let snapshot = self.snapshot();
        self.event_bus.emit(DocumentEvent::BackgroundResolved { snapshot });
        true
    }

    /// Brings the fetch state and decoded image in line with the model's background.
    fn sync_background(&mut self) {
        match self.art.background().clone() {
            Background::Blank => {
                self.fetch.reset();
                self.background_image = None;
            }
            Background::ImageData(bytes) => {
                self.fetch.reset();
                match bitmap::decode_background(&bytes) {
                    Ok(image) => self.background_image = Some(image),
                    Err(err) => {
                        warn!("Couldn't decode background image data: {}", err);
                        self.background_image = None;
                        self.fetch.fail_inline();
                    }
                }
            }
            Background::Url(url) => {
                self.background_image = None;
                let generation = self.fetch.begin(url.clone());
                let request = FetchRequest {
                    image_url: background::image_url(&url),
                    url,
                    generation,
                };
                debug!("Starting background fetch #{} for {}", generation, request.url);
                let reply = FetchReply::new(&request, self.completions_tx.clone());
                self.fetcher.fetch(request, reply);
            }
        }
    }

    fn point_size(size: f32) -> EmojiArtResult<u32> {
        let rounded = size.round();
        if !rounded.is_finite() || rounded < 1.0 {
            return Err(EmojiArtError::InvalidInput(format!(
                "emoji size must be positive, got {}",
                size
            )));
        }
        Ok(rounded.min(u32::MAX as f32) as u32)
    }

    fn perform(
        &mut self,
        command: Command,
        undo: Option<&mut dyn UndoRecorder>,
    ) -> EmojiArtResult<()> {
        let updated = match command.apply(&self.art) {
            Ok(updated) => updated,
            Err(EmojiArtError::NotFound(id)) => {
                debug!("Ignoring {:?}: emoji {} is gone", command, id);
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        if let Some(recorder) = undo {
            recorder.record(HistoryEntry {
                command: command.clone(),
                before: self.art.clone(),
                after: updated.clone(),
            });
        }

        info!("Applying {}", command.name());
        // Setting a background always (re)starts its fetch, even for the same URL.
        let force_sync = matches!(command, Command::SetBackground(_));
        self.replace_art(updated, force_sync);
        let snapshot = self.snapshot();
        self.event_bus.emit(DocumentEvent::Changed { command, snapshot });
        Ok(())
    }

    /// Swaps in a recorded snapshot, such as the `before` or `after` of a
    /// [`HistoryEntry`]. This is how undo recorders other than
    /// [`CommandHistory`] replay their entries.
    ///
    /// Selected emojis that still exist stay selected, and the background is
    /// fetched again if it differs. Publishes [`DocumentEvent::Restored`].
    pub fn restore(&mut self, art: EmojiArt) {
        self.replace_art(art, false);
        let snapshot = self.snapshot();
        self.event_bus.emit(DocumentEvent::Restored { snapshot });
    }

    /// Swaps in a new model value, keeping selection and background in step.
    fn replace_art(&mut self, art: EmojiArt, force_background_sync: bool) {
        let previous = std::mem::replace(&mut self.art, art);
        self.selection.retain_existing(&self.art);
        if force_background_sync || previous.background() != self.art.background() {
            self.sync_background();
        }
    }

    fn publish_selection(&self) {
        let snapshot = self.snapshot();
        self.event_bus.emit(DocumentEvent::SelectionChanged { snapshot });
    }
}
