use crate::image_classifier::interface::Prediction;

/// Top prediction of an already ranked list, if it clears `threshold`.
pub fn gate(ranked: &[Prediction], threshold: f32) -> Option<&Prediction> {
    ranked
        .first()
        .filter(|top| top.probability >= threshold)
}

/// Threshold as set from the UI: clamped into `[0, 1]`, `None` when not a number.
pub fn sanitize_threshold(value: f32) -> Option<f32> {
    if value.is_nan() {
        return None;
    }
    Some(value.clamp(0.0, 1.0))
}
