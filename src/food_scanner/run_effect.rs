use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::food_scanner::core::{Effect, Event};
use crate::image_classifier::interface::ImageClassifier;
use crate::image_source::frame::Frame;
use crate::image_source::upload::load_upload;
use crate::library::logger::interface::Logger;
use crate::nutrition_lookup::error::LookupError;
use crate::nutrition_lookup::interface::NutritionLookup;
use crate::prediction::pipeline::classify_ranked;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    nutrition_lookup: Arc<dyn NutritionLookup>,
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        nutrition_lookup: Arc<dyn NutritionLookup>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("run_effect"),
            device_camera,
            device_display,
            image_classifier,
            nutrition_lookup,
        }
    }

    fn log_error<T>(
        &self,
        context: &str,
        result: &Result<T, Box<dyn std::error::Error + Send + Sync>>,
    ) {
        if let Err(e) = result {
            let _ = self.logger.error(&format!("{}: {}", context, e));
        }
    }

    pub fn run_effect(&self, effect: Effect, event_sender: Sender<Event>) {
        if !effect.is_per_frame() {
            let _ = self
                .logger
                .info(&format!("Running effect: {}", effect.to_display_string()));
        }

        match effect {
            Effect::LoadModel => {
                let loaded = self.image_classifier.load();
                self.log_error("Model load failed, check the model path", &loaded);
                if let Ok(info) = &loaded {
                    let _ = self.logger.info(&format!(
                        "Model {} ready with {} classes",
                        info.name.as_deref().unwrap_or("(unnamed)"),
                        info.class_count
                    ));
                }
                let _ = event_sender.send(Event::ModelLoadDone(loaded));
            }
            Effect::SubscribeToUiEvents => {
                let events = match self.device_display.lock() {
                    Ok(device_display) => device_display.events(),
                    Err(e) => {
                        let _ = self.logger.error(&format!("Failed to lock display: {}", e));
                        return;
                    }
                };
                while let Ok(event) = events.recv() {
                    if event_sender.send(Event::Ui(event)).is_err() {
                        break;
                    }
                }
            }
            Effect::StartCamera => {
                let started = self.device_camera.start();
                self.log_error("Camera start failed", &started);
                let _ = event_sender.send(Event::CameraStartDone(started));
            }
            Effect::StopCamera => {
                let stopped = self.device_camera.stop();
                self.log_error("Camera stop failed", &stopped);
                let _ = event_sender.send(Event::CameraStopDone(stopped));
            }
            Effect::RequestFrame { session } => {
                std::thread::sleep(self.config.frame_interval);
                let _ = event_sender.send(Event::FrameRequested { session });
            }
            Effect::CaptureFrame { session } => {
                let result = self
                    .device_camera
                    .capture_frame()
                    .map(|image| Frame::from_camera(session, image));
                self.log_error("Frame capture failed", &result);
                let _ = event_sender.send(Event::FrameCaptureDone { session, result });
            }
            Effect::LoadUpload { id, path } => {
                let result = load_upload(id, &path);
                self.log_error(&format!("Could not read {}", path.display()), &result);
                let _ = event_sender.send(Event::UploadLoadDone { id, result });
            }
            Effect::Classify { frame } => {
                let result = classify_ranked(self.image_classifier.as_ref(), &frame);
                self.log_error("Prediction error", &result);
                let _ = event_sender.send(Event::ClassifyDone {
                    origin: frame.origin,
                    result,
                });
            }
            Effect::RemoteLookup { label } => {
                let result = self.nutrition_lookup.lookup(&label);
                match &result {
                    Err(LookupError::NotConfigured) => {
                        let _ = self.logger.warn("Remote nutrition lookup is not configured");
                    }
                    Err(e) => {
                        let _ = self.logger.error(&format!(
                            "{} lookup for {:?} failed: {}",
                            self.config.nutrition_lookup.source_name, label, e
                        ));
                    }
                    Ok(_) => {}
                }
                let _ = event_sender.send(Event::RemoteLookupDone { label, result });
            }
        }
    }
}
