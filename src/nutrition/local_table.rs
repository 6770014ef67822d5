use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct NutritionRecord {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

impl NutritionRecord {
    pub const fn new(calories: f64, protein: f64, fat: f64, carbs: f64) -> Self {
        Self {
            calories,
            protein,
            fat,
            carbs,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Local {
        label: String,
        record: NutritionRecord,
    },
    NotFound {
        label: String,
    },
}

/// Label to record mapping. Lookups ignore case; the stored label is canonical.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionTable {
    records: Vec<(String, NutritionRecord)>,
}

impl NutritionTable {
    pub fn new(records: Vec<(String, NutritionRecord)>) -> Self {
        Self { records }
    }

    pub fn demo() -> Self {
        Self::new(vec![
            ("Apple".to_string(), NutritionRecord::new(95.0, 0.5, 0.3, 25.0)),
            ("Banana".to_string(), NutritionRecord::new(105.0, 1.3, 0.3, 27.0)),
            ("Pizza".to_string(), NutritionRecord::new(285.0, 12.0, 10.0, 36.0)),
            ("Salad".to_string(), NutritionRecord::new(33.0, 2.0, 0.4, 6.0)),
            ("Orange".to_string(), NutritionRecord::new(62.0, 1.2, 0.2, 15.0)),
        ])
    }

    /// Rejects labels that only differ by case.
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let parsed: BTreeMap<String, NutritionRecord> = serde_json::from_str(json)?;

        let mut seen = BTreeSet::new();
        for label in parsed.keys() {
            if !seen.insert(label.trim().to_lowercase()) {
                return Err(format!("Nutrition table lists \"{}\" more than once", label).into());
            }
        }

        Ok(Self::new(parsed.into_iter().collect()))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read nutrition table {}: {}", path.display(), e))?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn resolve(&self, label: &str) -> Resolution {
        let wanted = label.trim().to_lowercase();

        self.records
            .iter()
            .find(|(known, _)| known.to_lowercase() == wanted)
            .map(|(known, record)| Resolution::Local {
                label: known.clone(),
                record: *record,
            })
            .unwrap_or_else(|| Resolution::NotFound {
                label: label.to_string(),
            })
    }
}

impl Default for NutritionTable {
    fn default() -> Self {
        Self::demo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_ignores_case() {
        let table = NutritionTable::demo();

        for label in ["apple", "APPLE", "Apple", " aPpLe "] {
            assert_eq!(
                table.resolve(label),
                Resolution::Local {
                    label: "Apple".to_string(),
                    record: NutritionRecord::new(95.0, 0.5, 0.3, 25.0),
                }
            );
        }
    }

    #[test]
    fn test_resolve_unknown_label() {
        let table = NutritionTable::demo();

        assert_eq!(
            table.resolve("Spaceship"),
            Resolution::NotFound {
                label: "Spaceship".to_string()
            }
        );
    }

    #[test]
    fn test_demo_table_has_banana() {
        let table = NutritionTable::demo();

        match table.resolve("banana") {
            Resolution::Local { record, .. } => {
                assert_eq!(record, NutritionRecord::new(105.0, 1.3, 0.3, 27.0))
            }
            other => panic!("Unexpected {:?}", other),
        }
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_from_json() {
        let table = NutritionTable::from_json(
            r#"{"Kiwi": {"calories": 42, "protein": 0.8, "fat": 0.4, "carbs": 10.1}}"#,
        )
        .unwrap();

        assert_eq!(
            table.resolve("KIWI"),
            Resolution::Local {
                label: "Kiwi".to_string(),
                record: NutritionRecord::new(42.0, 0.8, 0.4, 10.1),
            }
        );
        assert_eq!(
            table.resolve("Apple"),
            Resolution::NotFound {
                label: "Apple".to_string()
            }
        );
    }

    #[test]
    fn test_from_json_rejects_missing_fields() {
        assert!(NutritionTable::from_json(r#"{"Kiwi": {"calories": 42}}"#).is_err());
    }

    #[test]
    fn test_from_json_rejects_labels_differing_by_case() {
        let err = NutritionTable::from_json(
            r#"{
                "apple": {"calories": 1, "protein": 0, "fat": 0, "carbs": 0},
                "Apple": {"calories": 95, "protein": 0.5, "fat": 0.3, "carbs": 25}
            }"#,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "Nutrition table lists \"apple\" more than once");
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = NutritionTable::from_json_file(Path::new("/no/such/nutrition.json")).unwrap_err();

        assert!(err.to_string().starts_with("Failed to read nutrition table"));
    }
}
