// src/events.rs
// Platform event bus: found-object notifications fanned out to listeners.

use serde::Serialize;
use tokio::sync::broadcast;

/// Event name fired when a detection region clears the confidence threshold.
pub const EVENT_FOUND_OBJECT: &str = "image_processing.found_object";

/// Payload of a found-object event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoundObjectEvent {
    pub object: String,
    pub entity_id: String,
}

/// Broadcast-backed event bus; clones share the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<FoundObjectEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FoundObjectEvent> {
        self.tx.subscribe()
    }

    /// Fire an event. A bus with no listeners swallows it.
    pub fn fire(&self, event: FoundObjectEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(16)
    }
}
