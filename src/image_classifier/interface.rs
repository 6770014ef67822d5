use crate::image_source::frame::Frame;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub probability: f32,
}

impl Prediction {
    pub fn new(label: &str, probability: f32) -> Self {
        Self {
            label: label.to_string(),
            probability,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: Option<String>,
    pub class_count: usize,
}

pub trait ImageClassifier {
    /// Loads model assets. Must succeed before [`ImageClassifier::classify`].
    fn load(&self) -> Result<ModelInfo, Box<dyn std::error::Error + Send + Sync>>;

    /// One prediction per known class, in the model's class order.
    fn classify(
        &self,
        frame: &Frame,
    ) -> Result<Vec<Prediction>, Box<dyn std::error::Error + Send + Sync>>;
}
