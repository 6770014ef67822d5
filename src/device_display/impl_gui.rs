use crate::device_display::interface::{DeviceDisplay, UiEvent, View};
use crate::device_display::subscribers::UiEventSubscribers;
use eframe::egui;
use image::DynamicImage;
use std::error::Error;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const REPAINT_INTERVAL: Duration = Duration::from_millis(33);
const PREVIEW_MAX_WIDTH: f32 = 320.0;

pub struct DeviceDisplayGui {
    view: Arc<Mutex<View>>,
    subscribers: UiEventSubscribers,
}

/// The window half of the GUI display. eframe wants the main thread, so the
/// window is run separately from the runtime that drives the display.
pub struct GuiWindow {
    view: Arc<Mutex<View>>,
    subscribers: UiEventSubscribers,
    upload_path: String,
    threshold: f32,
    preview: Option<(Arc<DynamicImage>, egui::TextureHandle)>,
}

impl DeviceDisplayGui {
    pub fn new() -> (Self, GuiWindow) {
        let view = Arc::new(Mutex::new(View::default()));
        let subscribers = UiEventSubscribers::new();

        let window = GuiWindow {
            view: view.clone(),
            subscribers: subscribers.clone(),
            upload_path: String::new(),
            threshold: 0.0,
            preview: None,
        };

        (Self { view, subscribers }, window)
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn show(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut shared = self
            .view
            .lock()
            .map_err(|e| format!("Failed to lock view: {}", e))?;
        *shared = view.clone();
        Ok(())
    }

    fn events(&self) -> Receiver<UiEvent> {
        self.subscribers.subscribe()
    }
}

impl GuiWindow {
    /// Blocks until the window is closed, then asks the runtime to quit.
    pub fn run(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let subscribers = self.subscribers.clone();
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size([480.0, 720.0]),
            ..Default::default()
        };

        let result =
            eframe::run_native("Food Scanner", options, Box::new(move |_cc| Box::new(self)));
        subscribers.publish(UiEvent::Quit);

        result.map_err(|e| format!("GUI failed: {}", e).into())
    }

    fn preview_texture(
        &mut self,
        ctx: &egui::Context,
        image: &Arc<DynamicImage>,
    ) -> egui::TextureHandle {
        if let Some((shown, texture)) = &self.preview {
            if Arc::ptr_eq(shown, image) {
                return texture.clone();
            }
        }

        let rgba = image.to_rgba8();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [rgba.width() as usize, rgba.height() as usize],
            rgba.as_raw(),
        );
        let texture = ctx.load_texture("preview", color_image, egui::TextureOptions::default());
        self.preview = Some((image.clone(), texture.clone()));
        texture
    }

    fn controls(&mut self, ui: &mut egui::Ui, view: &View) {
        ui.horizontal(|ui| {
            let start = ui.add_enabled(
                view.model_ready && !view.camera_running,
                egui::Button::new("Start camera"),
            );
            if start.clicked() {
                self.subscribers.publish(UiEvent::StartCamera);
            }

            let stop = ui.add_enabled(view.camera_running, egui::Button::new("Stop camera"));
            if stop.clicked() {
                self.subscribers.publish(UiEvent::StopCamera);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Image:");
            ui.text_edit_singleline(&mut self.upload_path);
            let can_upload = !self.upload_path.trim().is_empty();
            if ui.add_enabled(can_upload, egui::Button::new("Classify")).clicked() {
                let path = PathBuf::from(self.upload_path.trim());
                self.subscribers.publish(UiEvent::Upload(path));
            }
        });

        ui.horizontal(|ui| {
            ui.label("Confidence threshold:");
            self.threshold = view.threshold;
            let slider = ui.add(egui::Slider::new(&mut self.threshold, 0.0..=1.0).step_by(0.05));
            if slider.changed() {
                self.subscribers
                    .publish(UiEvent::ThresholdChanged(self.threshold));
            }
        });
    }
}

impl eframe::App for GuiWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let view = match self.view.lock() {
            Ok(view) => view.clone(),
            Err(_) => return,
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Food Scanner");
            self.controls(ui, &view);
            ui.separator();

            match &view.preview {
                Some(image) => {
                    let texture = self.preview_texture(ctx, image);
                    ui.add(egui::Image::new(&texture).max_width(PREVIEW_MAX_WIDTH));
                }
                None => {
                    self.preview = None;
                    ui.weak("Camera / image preview");
                }
            }

            ui.separator();
            ui.label(egui::RichText::new(&view.status).strong().size(18.0));
            if let Some(notice) = &view.notice {
                ui.colored_label(egui::Color32::from_rgb(200, 120, 0), notice);
            }

            for prediction in &view.predictions {
                ui.add(egui::ProgressBar::new(prediction.probability).text(format!(
                    "{} — {:.1}%",
                    prediction.label,
                    prediction.probability * 100.0
                )));
            }

            ui.separator();
            egui::Frame::group(ui.style()).show(ui, |ui| {
                if view.nutrition.is_empty() {
                    ui.weak("Nutrition");
                }
                for (i, line) in view.nutrition.iter().enumerate() {
                    if i == 0 {
                        ui.strong(line);
                    } else {
                        ui.label(line);
                    }
                }
            });

            if let Some(action) = &view.lookup_action {
                let lookup = ui.add_enabled(!view.lookup_in_flight, egui::Button::new(action));
                if lookup.clicked() {
                    self.subscribers.publish(UiEvent::RemoteLookup);
                }
            }
        });

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
