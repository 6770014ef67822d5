use config::{Config, DisplayKind};
use device_camera::impl_fake::DeviceCameraFake;
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::DeviceDisplayGui;
use device_display::interface::DeviceDisplay;
use food_scanner::main::FoodScanner;
use image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use library::logger::{impl_console::LoggerConsole, interface::Logger};
use nutrition::local_table::NutritionTable;
use nutrition_lookup::impl_http::NutritionLookupHttp;
use std::sync::{Arc, Mutex};

mod config;
mod device_camera;
mod device_display;
mod food_scanner;
mod image_classifier;
mod image_source;
mod library;
mod nutrition;
mod nutrition_lookup;
mod prediction;

fn build_food_scanner(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
) -> Result<FoodScanner, Box<dyn std::error::Error + Send + Sync>> {
    let nutrition_table = match &config.nutrition_table_path {
        Some(path) => NutritionTable::from_json_file(path)?,
        None => NutritionTable::demo(),
    };
    if nutrition_table.is_empty() {
        logger.warn("Nutrition table is empty, every label will be not found")?;
    } else {
        logger.info(&format!(
            "Nutrition table has {} entries",
            nutrition_table.len()
        ))?;
    }

    let device_camera = Arc::new(DeviceCameraFake::new(config.camera.clone(), logger.clone())?);

    let image_classifier = Arc::new(ImageClassifierTractOnnx::new(
        config.model.clone(),
        logger.clone(),
    ));

    let nutrition_lookup = Arc::new(NutritionLookupHttp::new(
        &config.nutrition_lookup,
        logger.clone(),
    )?);

    Ok(FoodScanner::new(
        config.clone(),
        logger,
        nutrition_table,
        device_camera,
        device_display,
        image_classifier,
        nutrition_lookup,
    ))
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::default();

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    match config.display {
        DisplayKind::Gui => {
            let (device_display, window) = DeviceDisplayGui::new();
            let device_display = Arc::new(Mutex::new(device_display));
            let app = build_food_scanner(&config, logger, device_display)?;

            let runtime = std::thread::spawn(move || app.run().map(|_| ()));
            window.run()?;
            runtime.join().map_err(|_| "Runtime thread panicked")??;
        }
        DisplayKind::Console => {
            let device_display = DeviceDisplayConsole::new();
            let device_display = Arc::new(Mutex::new(device_display));
            let app = build_food_scanner(&config, logger, device_display)?;

            app.run()?;
        }
    }

    Ok(())
}
