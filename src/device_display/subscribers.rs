use crate::device_display::interface::UiEvent;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Fan-out of UI events to every live subscription.
#[derive(Clone, Default)]
pub struct UiEventSubscribers {
    senders: Arc<Mutex<Vec<Sender<UiEvent>>>>,
}

impl UiEventSubscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<UiEvent> {
        let (tx, rx) = channel();
        if let Ok(mut senders) = self.senders.lock() {
            senders.push(tx);
        }
        rx
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.senders.lock().map(|senders| senders.len()).unwrap_or(0)
    }

    pub fn publish(&self, event: UiEvent) {
        if let Ok(mut senders) = self.senders.lock() {
            senders.retain(|sender| sender.send(event.clone()).is_ok());
        }
    }
}
