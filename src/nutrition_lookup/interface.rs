use crate::nutrition_lookup::error::LookupError;
use serde::Deserialize;

/// Per-serving values reported by the remote service. Any of them may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RemoteNutrients {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbs: Option<f64>,
}

pub trait NutritionLookup: Send + Sync {
    /// `Ok(None)` when the service answered but had nothing usable for `label`.
    fn lookup(&self, label: &str) -> Result<Option<RemoteNutrients>, LookupError>;
}
