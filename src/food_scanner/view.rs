use crate::config::Config;
use crate::device_display::interface::View;
use crate::food_scanner::core::{
    ClassifierStatus, Failure, Model, NutritionCard, Readout, RenderLoop,
};
use crate::prediction::pipeline::PipelineOutcome;

pub const LOADING_MODEL: &str = "Loading model…";
pub const MODEL_READY: &str = "Model loaded — use webcam or upload an image";
pub const MODEL_FAILED: &str = "Error loading model (see log).";
pub const NOT_CONFIDENT: &str = "Not confident enough — try a better photo or lower threshold";
pub const NO_NUTRITION_DATA: &str = "No nutrition data";

pub fn format_percent(probability: f32) -> String {
    format!("{:.1}%", probability * 100.0)
}

fn format_amount(amount: Option<f64>) -> String {
    match amount {
        Some(amount) => amount.to_string(),
        None => "—".to_string(),
    }
}

pub fn status_text(model: &Model) -> String {
    match model.classifier {
        ClassifierStatus::Loading => return LOADING_MODEL.to_string(),
        ClassifierStatus::Failed => return MODEL_FAILED.to_string(),
        ClassifierStatus::Ready => {}
    }

    match &model.readout {
        Readout::Waiting => MODEL_READY.to_string(),
        Readout::Prediction(PipelineOutcome::Confident { top, .. }) => {
            format!("{} — {}", top.label, format_percent(top.probability))
        }
        Readout::Prediction(PipelineOutcome::LowConfidence) => NOT_CONFIDENT.to_string(),
        Readout::Failed(Failure::Prediction) => "Prediction failed (see log)".to_string(),
        Readout::Failed(Failure::Camera) => "Could not start camera (see log)".to_string(),
        Readout::Failed(Failure::Capture) => "Camera stopped (see log)".to_string(),
        Readout::Failed(Failure::Upload) => "Could not read image (see log)".to_string(),
    }
}

fn macro_lines(
    label: &str,
    source: &str,
    calories: Option<f64>,
    protein: Option<f64>,
    fat: Option<f64>,
    carbs: Option<f64>,
) -> Vec<String> {
    vec![
        format!("{} ({})", label, source),
        format!("Calories: {} kcal", format_amount(calories)),
        format!("Protein: {} g", format_amount(protein)),
        format!("Fat: {} g", format_amount(fat)),
        format!("Carbs: {} g", format_amount(carbs)),
    ]
}

pub fn nutrition_lines(card: &NutritionCard, source_name: &str) -> Vec<String> {
    match card {
        NutritionCard::Empty => vec![],
        NutritionCard::NoData => vec![NO_NUTRITION_DATA.to_string()],
        NutritionCard::Local { label, record } => macro_lines(
            label,
            "local",
            Some(record.calories),
            Some(record.protein),
            Some(record.fat),
            Some(record.carbs),
        ),
        NutritionCard::NotFound { label } => vec![format!(
            "No demo data for \"{}\". Try \"Apple\" or \"Banana\".",
            label
        )],
        NutritionCard::Searching { .. } => vec![format!("Searching {}...", source_name)],
        NutritionCard::Remote { label, nutrients } => macro_lines(
            label,
            source_name,
            nutrients.calories,
            nutrients.protein,
            nutrients.fat,
            nutrients.carbs,
        ),
        NutritionCard::RemoteNoData { .. } => vec![format!("No {} data found", source_name)],
        NutritionCard::RemoteFailed { .. } => {
            vec![format!("{} lookup failed (see log)", source_name)]
        }
        NutritionCard::RemoteNotConfigured => {
            vec![format!("{} lookup is not configured", source_name)]
        }
    }
}

pub fn view(config: &Config, model: &Model) -> View {
    let source_name = &config.nutrition_lookup.source_name;

    let predictions = match &model.readout {
        Readout::Prediction(PipelineOutcome::Confident { top_n, .. }) => top_n.clone(),
        _ => vec![],
    };

    View {
        status: status_text(model),
        notice: model.notice.clone(),
        model_ready: model.classifier == ClassifierStatus::Ready,
        camera_running: model.render_loop != RenderLoop::Idle,
        threshold: model.threshold,
        predictions,
        nutrition: nutrition_lines(&model.nutrition, source_name),
        lookup_action: model
            .last_top_label
            .as_ref()
            .map(|_| format!("Lookup {}", source_name)),
        lookup_in_flight: model.lookup_in_flight,
        preview: model.preview.clone(),
    }
}
