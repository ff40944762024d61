mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::{DocumentEvent, DocumentSnapshot};
pub use handlers::ChannelHandler;

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &DocumentEvent);

    /// Handlers returning true are dropped from the bus after the next emit
    fn is_closed(&self) -> bool {
        false
    }
}
