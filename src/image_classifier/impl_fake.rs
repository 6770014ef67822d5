use crate::image_classifier::interface::{ImageClassifier, ModelInfo, Prediction};
use crate::image_source::frame::Frame;
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Behavior {
    Random { labels: Vec<String> },
    Fixed(Vec<Prediction>),
    FailClassify(String),
    FailLoad(String),
}

pub struct ImageClassifierFake {
    behavior: Behavior,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierFake {
    /// Random probabilities over `labels`, summing to one.
    pub fn new(labels: Vec<String>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::with_behavior(Behavior::Random { labels }, logger)
    }

    pub fn fixed(predictions: Vec<Prediction>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::with_behavior(Behavior::Fixed(predictions), logger)
    }

    pub fn failing_classify(message: &str, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::with_behavior(Behavior::FailClassify(message.to_string()), logger)
    }

    pub fn failing_load(message: &str, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::with_behavior(Behavior::FailLoad(message.to_string()), logger)
    }

    fn with_behavior(behavior: Behavior, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            behavior,
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
        }
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn load(&self) -> Result<ModelInfo, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Loading fake model...")?;
        let class_count = match &self.behavior {
            Behavior::FailLoad(message) => return Err(message.clone().into()),
            Behavior::Random { labels } => labels.len(),
            Behavior::Fixed(predictions) => predictions.len(),
            Behavior::FailClassify(_) => 0,
        };
        Ok(ModelInfo {
            name: Some("fake".to_string()),
            class_count,
        })
    }

    fn classify(
        &self,
        _frame: &Frame,
    ) -> Result<Vec<Prediction>, Box<dyn std::error::Error + Send + Sync>> {
        match &self.behavior {
            Behavior::Fixed(predictions) => Ok(predictions.clone()),
            Behavior::FailClassify(message) | Behavior::FailLoad(message) => {
                Err(message.clone().into())
            }
            Behavior::Random { labels } => {
                let mut rng = rand::rng();
                let weight_dist = Uniform::new(0.0f32, 1.0)?;

                let weights = labels
                    .iter()
                    .map(|_| weight_dist.sample(&mut rng))
                    .collect::<Vec<_>>();
                let total = weights.iter().sum::<f32>().max(f32::EPSILON);

                Ok(labels
                    .iter()
                    .zip(weights)
                    .map(|(label, weight)| Prediction::new(label, weight / total))
                    .collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;
    use image::DynamicImage;

    fn frame() -> Frame {
        Frame::from_camera(1, DynamicImage::new_rgb8(2, 2))
    }

    #[test]
    fn test_random_probabilities_sum_to_one() {
        let labels = vec!["Apple".to_string(), "Banana".to_string(), "Pizza".to_string()];
        let classifier = ImageClassifierFake::new(labels.clone(), Arc::new(LoggerFake::new()));

        let predictions = classifier.classify(&frame()).unwrap();

        assert_eq!(
            predictions.iter().map(|p| p.label.clone()).collect::<Vec<_>>(),
            labels
        );
        let total: f32 = predictions.iter().map(|p| p.probability).sum();
        assert!((total - 1.0).abs() < 1e-4);
        assert!(predictions
            .iter()
            .all(|p| (0.0..=1.0).contains(&p.probability)));
    }

    #[test]
    fn test_failing_load() {
        let classifier = ImageClassifierFake::failing_load("no model", Arc::new(LoggerFake::new()));

        let err = classifier.load().unwrap_err();

        assert_eq!(err.to_string(), "no model");
    }
}
