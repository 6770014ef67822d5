use serde::Deserialize;
use std::path::Path;

/// The `metadata.json` that ships next to an exported image model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub labels: Vec<String>,
    #[serde(default)]
    pub image_size: Option<u32>,
    #[serde(default)]
    pub model_name: Option<String>,
}

impl ModelMetadata {
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let metadata: ModelMetadata = serde_json::from_str(json)?;
        if metadata.labels.is_empty() {
            return Err("Model metadata lists no labels".into());
        }
        Ok(metadata)
    }

    pub fn from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_teachable_machine_metadata() {
        let json = r#"{
            "tfjsVersion": "1.3.1",
            "tmVersion": "2.4.5",
            "packageVersion": "0.8.4-alpha2",
            "packageName": "@teachablemachine/image",
            "timeStamp": "2024-02-10T19:04:05.137Z",
            "userMetadata": {},
            "modelName": "tm-my-image-model",
            "labels": ["Apple", "Banana", "Pizza"],
            "imageSize": 224
        }"#;

        let metadata = ModelMetadata::from_json(json).unwrap();

        assert_eq!(metadata.labels, vec!["Apple", "Banana", "Pizza"]);
        assert_eq!(metadata.image_size, Some(224));
        assert_eq!(metadata.model_name.as_deref(), Some("tm-my-image-model"));
    }

    #[test]
    fn test_optional_fields_may_be_missing() {
        let metadata = ModelMetadata::from_json(r#"{"labels": ["Salad"]}"#).unwrap();

        assert_eq!(metadata.image_size, None);
        assert_eq!(metadata.model_name, None);
    }

    #[test]
    fn test_rejects_empty_labels() {
        assert!(ModelMetadata::from_json(r#"{"labels": []}"#).is_err());
    }

    #[test]
    fn test_rejects_missing_labels() {
        assert!(ModelMetadata::from_json(r#"{"imageSize": 224}"#).is_err());
    }
}
