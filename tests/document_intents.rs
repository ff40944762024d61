use std::sync::Arc;

use emoji_art::fetch::{FetchReply, FetchRequest};
use emoji_art::{
    Background, CommandHistory, DocumentEvent, EmojiArt, EmojiArtConfig, EmojiArtDocument,
    EmojiArtError, HistoryEntry, ImageFetcher, UndoRecorder,
};
use futures::StreamExt;
use parking_lot::Mutex;

/// Holds on to requests; these tests never complete a fetch.
#[derive(Default)]
struct NullFetcher {
    requests: Mutex<Vec<FetchRequest>>,
    replies: Mutex<Vec<FetchReply>>,
}

impl ImageFetcher for NullFetcher {
    fn fetch(&self, request: FetchRequest, reply: FetchReply) {
        self.requests.lock().push(request);
        self.replies.lock().push(reply);
    }
}

fn create_document() -> (EmojiArtDocument, Arc<NullFetcher>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let fetcher = Arc::new(NullFetcher::default());
    let document = EmojiArtDocument::with_fetcher(EmojiArtConfig::default(), fetcher.clone());
    (document, fetcher)
}

fn record_events(document: &EmojiArtDocument) -> Arc<Mutex<Vec<DocumentEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    document.subscribe(Box::new(move |event: &DocumentEvent| {
        sink.lock().push(event.clone());
    }));
    events
}

#[test]
fn test_intents_scenario() {
    let (mut document, _) = create_document();

    let first = document.add_emoji("🤓", (-200, -200), 60.0, None).unwrap();
    let second = document.add_emoji("😷", (50, 50), 50.0, None).unwrap();
    assert_eq!((first, second), (1, 2));

    document.move_emoji(first, (10, 5), None).unwrap();
    document.scale_emoji(second, 2.0, None).unwrap();

    assert_eq!(document.art().emoji(first).unwrap().location(), (-190, -195));
    assert_eq!(document.art().emoji(second).unwrap().size(), 100);
}

#[test]
fn test_each_intent_publishes_once() {
    let (mut document, _) = create_document();
    let events = record_events(&document);

    let id = document.add_emoji("🤓", (0, 0), 40.0, None).unwrap();
    document.move_emoji(id, (1, 1), None).unwrap();
    document.scale_emoji(id, 1.5, None).unwrap();

    let events = events.lock();
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|event| matches!(event, DocumentEvent::Changed { .. })));

    // Each event carries the state right after its intent.
    assert_eq!(events[0].snapshot().art.emoji(id).unwrap().location(), (0, 0));
    assert_eq!(events[1].snapshot().art.emoji(id).unwrap().location(), (1, 1));
    assert_eq!(events[2].snapshot().art.emoji(id).unwrap().size(), 60);
}

#[test]
fn test_unknown_id_is_silent_noop() {
    let (mut document, _) = create_document();
    document.add_emoji("🤓", (0, 0), 40.0, None).unwrap();
    let events = record_events(&document);
    let mut history = CommandHistory::new();
    let before = document.art().clone();

    assert!(document.move_emoji(99, (5, 5), Some(&mut history)).is_ok());
    assert!(document.scale_emoji(99, 2.0, Some(&mut history)).is_ok());
    assert!(document.remove_emoji(99, Some(&mut history)).is_ok());
    document.toggle_selection(99);

    assert_eq!(document.art(), &before);
    assert!(document.selection().is_empty());
    assert!(events.lock().is_empty());
    assert!(!history.can_undo());
}

#[test]
fn test_invalid_input_is_returned_and_not_applied() {
    let (mut document, _) = create_document();
    let id = document.add_emoji("🤓", (0, 0), 40.0, None).unwrap();
    let events = record_events(&document);
    let mut history = CommandHistory::new();
    let before = document.art().clone();

    assert!(matches!(
        document.add_emoji("abc", (0, 0), 40.0, Some(&mut history)),
        Err(EmojiArtError::InvalidInput(_))
    ));
    assert!(matches!(
        document.add_emoji("🐶", (0, 0), 0.0, Some(&mut history)),
        Err(EmojiArtError::InvalidInput(_))
    ));
    assert!(matches!(
        document.add_emoji("🐶", (0, 0), f32::NAN, Some(&mut history)),
        Err(EmojiArtError::InvalidInput(_))
    ));
    assert!(matches!(
        document.scale_emoji(id, -1.0, Some(&mut history)),
        Err(EmojiArtError::InvalidInput(_))
    ));

    assert_eq!(document.art(), &before);
    assert!(events.lock().is_empty());
    assert!(!history.can_undo());
}

#[test]
fn test_drop_size_is_rounded() {
    let (mut document, _) = create_document();
    let id = document.add_emoji("🤓", (0, 0), 40.0 / 1.6, None).unwrap();
    assert_eq!(document.art().emoji(id).unwrap().size(), 25);
    let id = document.add_emoji("😷", (0, 0), 12.5, None).unwrap();
    assert_eq!(document.art().emoji(id).unwrap().size(), 13);
}

#[test]
fn test_undo_redo_each_intent() {
    let (mut document, _) = create_document();
    let mut history = CommandHistory::new();

    let id = document
        .add_emoji("🤓", (-200, -200), 60.0, Some(&mut history))
        .unwrap();
    let after_add = document.art().clone();
    document.move_emoji(id, (10, 5), Some(&mut history)).unwrap();
    let after_move = document.art().clone();
    document.scale_emoji(id, 2.0, Some(&mut history)).unwrap();
    let after_scale = document.art().clone();

    assert_eq!(history.undo_title().as_deref(), Some("Undo Scale"));

    assert!(document.undo(&mut history));
    assert_eq!(document.art(), &after_move);
    assert!(document.undo(&mut history));
    assert_eq!(document.art(), &after_add);
    assert!(document.undo(&mut history));
    assert!(document.emojis().is_empty());
    assert!(!document.undo(&mut history));

    assert!(document.redo(&mut history));
    assert!(document.redo(&mut history));
    assert!(document.redo(&mut history));
    assert_eq!(document.art(), &after_scale);
    assert!(!document.redo(&mut history));
}

#[test]
fn test_undo_publishes_restored_event() {
    let (mut document, _) = create_document();
    let mut history = CommandHistory::new();
    document.add_emoji("🤓", (0, 0), 40.0, Some(&mut history)).unwrap();
    let events = record_events(&document);

    document.undo(&mut history);

    let events = events.lock();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        DocumentEvent::Restored { snapshot } if snapshot.art.emojis().is_empty()
    ));
}

#[test]
fn test_toggle_selection() {
    let (mut document, _) = create_document();
    let first = document.add_emoji("🤓", (0, 0), 40.0, None).unwrap();
    let second = document.add_emoji("😷", (0, 0), 40.0, None).unwrap();
    let events = record_events(&document);

    document.toggle_selection(first);
    document.toggle_selection(second);
    assert!(document.is_selected(first) && document.is_selected(second));

    document.toggle_selection(first);
    assert!(!document.is_selected(first));
    assert_eq!(document.selection().len(), 1);

    document.clear_selection();
    assert!(document.selection().is_empty());

    let events = events.lock();
    assert_eq!(events.len(), 4);
    assert!(
        events
            .iter()
            .all(|event| matches!(event, DocumentEvent::SelectionChanged { .. }))
    );
    assert_eq!(events[1].snapshot().selection.len(), 2);
}

#[test]
fn test_selection_follows_removal_and_undo() {
    let (mut document, _) = create_document();
    let mut history = CommandHistory::new();
    let kept = document.add_emoji("🤓", (0, 0), 40.0, None).unwrap();
    let added = document.add_emoji("😷", (0, 0), 40.0, Some(&mut history)).unwrap();

    document.toggle_selection(kept);
    document.toggle_selection(added);

    // Undoing the add takes the emoji, and its selection, away.
    document.undo(&mut history);
    assert!(!document.is_selected(added));
    assert!(document.is_selected(kept));

    document.remove_emoji(kept, None).unwrap();
    assert!(document.selection().is_empty());
}

#[test]
fn test_encoding_excludes_transient_state() {
    let (mut document, _) = create_document();
    let id = document.add_emoji("🤓", (0, 0), 40.0, None).unwrap();
    document.toggle_selection(id);

    let (mut reopened, _) = create_document();
    reopened.load(&document.encode().unwrap()).unwrap();
    assert_eq!(reopened.art(), document.art());
    assert!(reopened.selection().is_empty());

    assert!(reopened.load(b"not a document").is_err());
    assert_eq!(reopened.art(), document.art());
}

#[test]
fn test_load_clears_selection() {
    let (mut document, _) = create_document();
    let id = document.add_emoji("🤓", (0, 0), 40.0, None).unwrap();
    document.toggle_selection(id);

    // A different document that happens to reuse id 1.
    let mut other = EmojiArt::new();
    other.add_emoji("🐶", (100, 100), 30).unwrap();
    document.load(&other.encode().unwrap()).unwrap();

    assert_eq!(document.art(), &other);
    assert!(document.selection().is_empty());
    assert!(!document.is_selected(id));
}

#[test]
fn test_overflowing_move_is_returned() {
    let (mut document, _) = create_document();
    let mut history = CommandHistory::new();
    let id = document.add_emoji("🤓", (0, i32::MIN + 3), 40.0, None).unwrap();
    let events = record_events(&document);
    let before = document.art().clone();

    assert!(matches!(
        document.move_emoji(id, (0, -4), Some(&mut history)),
        Err(EmojiArtError::InvalidInput(_))
    ));
    assert_eq!(document.art(), &before);
    assert!(events.lock().is_empty());
    assert!(!history.can_undo());
}

/// Keeps entries in a plain list and replays them through `restore`.
#[derive(Default)]
struct EntryLog {
    entries: Vec<HistoryEntry>,
}

impl UndoRecorder for EntryLog {
    fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }
}

#[test]
fn test_custom_recorder_replays_with_restore() {
    let (mut document, _) = create_document();
    let mut log = EntryLog::default();

    let id = document.add_emoji("🤓", (0, 0), 40.0, Some(&mut log)).unwrap();
    document.move_emoji(id, (15, -5), Some(&mut log)).unwrap();
    document.toggle_selection(id);
    let events = record_events(&document);

    let last = log.entries.pop().unwrap();
    assert_eq!(last.command.name(), "Move");
    document.restore(last.before);

    assert_eq!(document.art().emoji(id).unwrap().location(), (0, 0));
    assert!(document.is_selected(id));
    assert!(matches!(events.lock()[0], DocumentEvent::Restored { .. }));

    document.restore(last.after);
    assert_eq!(document.art().emoji(id).unwrap().location(), (15, -5));
}

#[test]
fn test_channel_subscriber() {
    let (mut document, _) = create_document();
    let mut events = document.subscribe_channel();

    document.add_emoji("🤓", (0, 0), 40.0, None).unwrap();

    let event = futures::executor::block_on(events.next()).unwrap();
    assert!(matches!(event, DocumentEvent::Changed { .. }));
    assert_eq!(event.snapshot().art.emojis().len(), 1);

    // Publishing keeps working after the receiver goes away.
    drop(events);
    assert!(document.add_emoji("😷", (0, 0), 40.0, None).is_ok());
}

#[test]
fn test_shared_document_across_threads() {
    let (document, _) = create_document();
    let shared = document.into_shared();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            std::thread::spawn(move || {
                for _ in 0..10 {
                    shared.lock().add_emoji("🤓", (0, 0), 40.0, None).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let document = shared.lock();
    let ids: Vec<_> = document.emojis().iter().map(|emoji| emoji.id()).collect();
    assert_eq!(ids, (1..=40).collect::<Vec<_>>());
}

#[test]
fn test_set_background_url_starts_fetch_once_per_intent() {
    let (mut document, fetcher) = create_document();
    let url = url::Url::parse("https://example.com/a.png").unwrap();

    document.set_background(Background::Url(url.clone()), None).unwrap();
    document.set_background(Background::Url(url.clone()), None).unwrap();

    let requests = fetcher.requests.lock();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].generation < requests[1].generation);
    assert!(document.fetch_status().is_fetching());
}
