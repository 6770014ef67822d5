use crate::image_classifier::interface::Prediction;
use image::DynamicImage;
use std::error::Error;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// What the user asked for through the display's controls.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    StartCamera,
    StopCamera,
    Upload(PathBuf),
    ThresholdChanged(f32),
    RemoteLookup,
    Quit,
}

/// Everything a display needs to draw one screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct View {
    pub status: String,
    pub notice: Option<String>,
    pub model_ready: bool,
    pub camera_running: bool,
    pub threshold: f32,
    pub predictions: Vec<Prediction>,
    pub nutrition: Vec<String>,
    /// Remote lookup button caption, when the button is offered.
    pub lookup_action: Option<String>,
    pub lookup_in_flight: bool,
    pub preview: Option<Arc<DynamicImage>>,
}

pub trait DeviceDisplay: Send + Sync {
    fn show(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// A new subscription to the display's UI events.
    fn events(&self) -> Receiver<UiEvent>;
}
