use std::cell::RefCell;

use futures::channel::mpsc::{self, UnboundedReceiver};

use crate::event::{ChannelHandler, DocumentEvent, EventHandler};

/// A simple event bus for broadcasting document events to registered handlers
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    /// Subscribe through a channel, for observers living on another thread
    pub fn subscribe_channel(&self) -> UnboundedReceiver<DocumentEvent> {
        let (tx, rx) = mpsc::unbounded();
        self.subscribe(Box::new(ChannelHandler::new(tx)));
        rx
    }

    /// Emit an event to all registered handlers
    pub fn emit(&self, event: DocumentEvent) {
        let mut handlers = self.handlers.borrow_mut();
        for handler in handlers.iter_mut() {
            handler.handle_event(&event);
        }
        handlers.retain(|handler| !handler.is_closed());
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}
