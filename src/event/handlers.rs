use futures::channel::mpsc::UnboundedSender;

use crate::event::{DocumentEvent, EventHandler};

/// Forwards events into a channel. Unsubscribes itself once the receiver is dropped.
#[derive(Debug)]
pub struct ChannelHandler {
    tx: UnboundedSender<DocumentEvent>,
}

impl ChannelHandler {
    pub fn new(tx: UnboundedSender<DocumentEvent>) -> Self {
        Self { tx }
    }
}

impl EventHandler for ChannelHandler {
    fn handle_event(&mut self, event: &DocumentEvent) {
        let _ = self.tx.unbounded_send(event.clone());
    }

    fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl<F> EventHandler for F
where
    F: FnMut(&DocumentEvent) + Send,
{
    fn handle_event(&mut self, event: &DocumentEvent) {
        self(event)
    }
}
