use chrono::{FixedOffset, Offset, Utc};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[1, height, width, 3]`, what Teachable Machine / Keras exports use.
    Nhwc,
    /// `[1, 3, height, width]`, what most PyTorch exports use.
    #[allow(dead_code)]
    Nchw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// `pixel / 127.5 - 1`
    SignedUnit,
    /// `pixel / 255`
    #[allow(dead_code)]
    Unit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub model_dir: PathBuf,
    pub model_file: String,
    pub metadata_file: String,
    pub input_shape: (u32, u32),
    pub layout: TensorLayout,
    pub normalization: Normalization,
    pub apply_softmax: bool,
}

impl ModelConfig {
    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(&self.model_file)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.model_dir.join(&self.metadata_file)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("./model/"),
            model_file: "model.onnx".to_string(),
            metadata_file: "metadata.json".to_string(),
            input_shape: (224, 224),
            layout: TensorLayout::Nhwc,
            normalization: Normalization::SignedUnit,
            apply_softmax: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub width: u32,
    pub height: u32,
    pub flip_horizontal: bool,
    pub fake_frames_dir: Option<PathBuf>,
    pub fake_delay: Duration,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            flip_horizontal: true,
            fake_frames_dir: None,
            fake_delay: Duration::from_millis(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutritionLookupConfig {
    /// Full URL of the lookup endpoint; the label goes into its `q` parameter.
    pub endpoint: Option<String>,
    pub source_name: String,
    pub timeout: Duration,
}

impl Default for NutritionLookupConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            source_name: "USDA".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Gui,
    #[allow(dead_code)]
    Console,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub frame_interval: Duration,
    pub confidence_threshold: f32,
    pub top_n: usize,
    pub model: ModelConfig,
    pub camera: CameraConfig,
    pub nutrition_table_path: Option<PathBuf>,
    pub nutrition_lookup: NutritionLookupConfig,
    pub display: DisplayKind,
    pub logger_timezone: FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            confidence_threshold: 0.5,
            top_n: 5,
            model: ModelConfig::default(),
            camera: CameraConfig::default(),
            nutrition_table_path: None,
            nutrition_lookup: NutritionLookupConfig::default(),
            display: DisplayKind::Gui,
            logger_timezone: Utc.fix(),
        }
    }
}
