use crate::image_classifier::interface::{ImageClassifier, Prediction};
use crate::image_source::frame::Frame;
use crate::prediction::confidence_gate::gate;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Confident {
        top: Prediction,
        top_n: Vec<Prediction>,
    },
    LowConfidence,
}

impl PipelineOutcome {
    pub fn top_label(&self) -> Option<&str> {
        match self {
            PipelineOutcome::Confident { top, .. } => Some(&top.label),
            PipelineOutcome::LowConfidence => None,
        }
    }
}

/// Sorts descending by probability. Equal probabilities keep the classifier's
/// order; non-finite probabilities are dropped.
pub fn rank(predictions: Vec<Prediction>) -> Vec<Prediction> {
    let mut ranked = predictions
        .into_iter()
        .filter(|p| p.probability.is_finite())
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    ranked
}

pub fn classify_ranked(
    classifier: &dyn ImageClassifier,
    frame: &Frame,
) -> Result<Vec<Prediction>, Box<dyn std::error::Error + Send + Sync>> {
    Ok(rank(classifier.classify(frame)?))
}

/// Applies the confidence gate to a ranked list using the threshold current at
/// the time the result is shown.
pub fn evaluate(ranked: &[Prediction], threshold: f32, top_n: usize) -> PipelineOutcome {
    match gate(ranked, threshold) {
        Some(top) => PipelineOutcome::Confident {
            top: top.clone(),
            top_n: ranked.iter().take(top_n).cloned().collect(),
        },
        None => PipelineOutcome::LowConfidence,
    }
}
