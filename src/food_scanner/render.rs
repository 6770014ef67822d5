use crate::config::Config;
use crate::device_display::interface::DeviceDisplay;
use crate::food_scanner::core::Model;
use crate::food_scanner::view::view;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Render {
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    config: Config,
}

impl Render {
    pub fn new(
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        config: Config,
    ) -> Self {
        Self {
            device_display,
            config,
        }
    }

    pub fn render(&self, model: &Model) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut device_display = self
            .device_display
            .lock()
            .map_err(|e| format!("Failed to lock display: {}", e))?;

        device_display.show(&view(&self.config, model))
    }
}
