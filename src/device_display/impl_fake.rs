use crate::device_display::interface::{DeviceDisplay, UiEvent, View};
use crate::device_display::subscribers::UiEventSubscribers;
use crate::library::logger::interface::Logger;
use std::error::Error;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};

/// Records every view shown and lets tests play the user.
#[derive(Clone)]
pub struct DeviceDisplayFake {
    logger: Arc<dyn Logger + Send + Sync>,
    views: Arc<Mutex<Vec<View>>>,
    subscribers: UiEventSubscribers,
}

impl DeviceDisplayFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("device_display").with_namespace("fake"),
            views: Arc::new(Mutex::new(vec![])),
            subscribers: UiEventSubscribers::new(),
        }
    }

    pub fn emit(&self, event: UiEvent) {
        self.subscribers.publish(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn views(&self) -> Vec<View> {
        self.views
            .lock()
            .map(|views| views.clone())
            .unwrap_or_default()
    }

    pub fn last_view(&self) -> Option<View> {
        self.views
            .lock()
            .ok()
            .and_then(|views| views.last().cloned())
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn show(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger.info(&format!("show: {}", view.status))?;
        self.views
            .lock()
            .map_err(|e| format!("Failed to lock views: {}", e))?
            .push(view.clone());
        Ok(())
    }

    fn events(&self) -> Receiver<UiEvent> {
        self.subscribers.subscribe()
    }
}
