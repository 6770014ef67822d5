use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::food_scanner::core::{init, is_done, transition, Effect, Event, Model};
use crate::food_scanner::render::Render;
use crate::food_scanner::run_effect::RunEffect;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use crate::library::state_machine::StateMachine;
use crate::nutrition::local_table::NutritionTable;
use crate::nutrition_lookup::interface::NutritionLookup;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct FoodScanner {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub nutrition_table: Arc<NutritionTable>,
    pub device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    pub device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    pub image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    pub nutrition_lookup: Arc<dyn NutritionLookup>,
}

impl FoodScanner {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        nutrition_table: NutritionTable,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        nutrition_lookup: Arc<dyn NutritionLookup>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("food_scanner"),
            nutrition_table: Arc::new(nutrition_table),
            device_camera,
            device_display,
            image_classifier,
            nutrition_lookup,
        }
    }

    /// Runs until the user quits and returns the final model.
    pub fn run(&self) -> Result<Model, Box<dyn std::error::Error + Send + Sync>> {
        let config = self.config.clone();
        let table = self.nutrition_table.clone();
        let logger = self.logger.clone();
        let transition_fn = move |model: Model, event: Event| {
            if !event.is_per_frame() {
                let _ = logger.info(&format!("Event: {}", event.to_display_string()));
            }
            transition(&config, &table, model, event)
        };

        let render = Render::new(self.device_display.clone(), self.config.clone());
        let logger = self.logger.clone();
        let render_fn = move |model: &Model| {
            if let Err(e) = render.render(model) {
                let _ = logger.error(&format!("Render failed: {}", e));
            }
        };

        let run_effect = RunEffect::new(
            self.config.clone(),
            self.logger.clone(),
            self.device_camera.clone(),
            self.device_display.clone(),
            self.image_classifier.clone(),
            self.nutrition_lookup.clone(),
        );
        let run_effect_fn = move |effect: Effect, event_sender: Sender<Event>| {
            run_effect.run_effect(effect, event_sender)
        };

        let state_machine = StateMachine::new(
            init(&self.config),
            transition_fn,
            render_fn,
            run_effect_fn,
            is_done,
        );

        self.logger.info("Started")?;
        let model = state_machine.run()?;
        self.logger.info("Stopped")?;

        Ok(model)
    }
}
