use crate::config::NutritionLookupConfig;
use crate::library::logger::interface::Logger;
use crate::nutrition_lookup::error::LookupError;
use crate::nutrition_lookup::interface::{NutritionLookup, RemoteNutrients};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct LookupResponse {
    nutrients: RemoteNutrients,
}

/// Body that is valid JSON but not `{ "nutrients": {..} }` means no data.
pub fn parse_response(body: &str) -> Result<Option<RemoteNutrients>, LookupError> {
    let value: serde_json::Value = serde_json::from_str(body)?;

    Ok(serde_json::from_value::<LookupResponse>(value)
        .ok()
        .map(|response| response.nutrients))
}

pub struct NutritionLookupHttp {
    endpoint: Option<String>,
    client: reqwest::blocking::Client,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl NutritionLookupHttp {
    pub fn new(
        config: &NutritionLookupConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
            logger: logger.with_namespace("nutrition_lookup").with_namespace("http"),
        })
    }

    /// Appends `q=<label>` to whatever query the endpoint already carries.
    pub fn request_for(&self, label: &str) -> Result<reqwest::blocking::Request, LookupError> {
        let endpoint = self.endpoint.as_deref().ok_or(LookupError::NotConfigured)?;
        Ok(self.client.get(endpoint).query(&[("q", label)]).build()?)
    }
}

impl NutritionLookup for NutritionLookupHttp {
    fn lookup(&self, label: &str) -> Result<Option<RemoteNutrients>, LookupError> {
        let request = self.request_for(label)?;
        let _ = self.logger.info(&format!("GET {}", request.url()));

        let response = self.client.execute(request)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.text()?;
        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;

    #[test]
    fn test_parse_full_response() {
        let parsed = parse_response(
            r#"{"nutrients": {"calories": 52, "protein": 0.3, "fat": 0.2, "carbs": 14}}"#,
        )
        .unwrap();

        assert_eq!(
            parsed,
            Some(RemoteNutrients {
                calories: Some(52.0),
                protein: Some(0.3),
                fat: Some(0.2),
                carbs: Some(14.0),
            })
        );
    }

    #[test]
    fn test_parse_partial_response() {
        let parsed = parse_response(r#"{"nutrients": {"calories": 52}}"#).unwrap();

        assert_eq!(
            parsed,
            Some(RemoteNutrients {
                calories: Some(52.0),
                ..RemoteNutrients::default()
            })
        );
    }

    #[test]
    fn test_parse_shape_mismatch_is_no_data() {
        for body in [
            r#"{}"#,
            r#"{"nutrients": null}"#,
            r#"{"nutrients": {"calories": "lots"}}"#,
            r#"[1, 2, 3]"#,
        ] {
            assert_eq!(parse_response(body).unwrap(), None, "{}", body);
        }
    }

    #[test]
    fn test_parse_unreadable_body() {
        let err = parse_response("<html>oops</html>").unwrap_err();

        assert!(matches!(err, LookupError::Body(_)));
    }

    fn lookup_for(endpoint: Option<&str>) -> NutritionLookupHttp {
        let config = NutritionLookupConfig {
            endpoint: endpoint.map(str::to_string),
            ..NutritionLookupConfig::default()
        };
        NutritionLookupHttp::new(&config, Arc::new(LoggerFake::new())).unwrap()
    }

    #[test]
    fn test_request_encodes_label() {
        let request = lookup_for(Some("http://localhost/usda"))
            .request_for("Ice Cream & Co")
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://localhost/usda?q=Ice+Cream+%26+Co"
        );
    }

    #[test]
    fn test_request_keeps_endpoint_query() {
        let request = lookup_for(Some("http://localhost/usda?api_key=k&dataType=Foundation"))
            .request_for("Apple")
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://localhost/usda?api_key=k&dataType=Foundation&q=Apple"
        );
        assert_eq!(
            request
                .url()
                .query_pairs()
                .filter(|(key, _)| key == "q")
                .count(),
            1
        );
    }

    #[test]
    fn test_request_without_endpoint() {
        let err = lookup_for(None).request_for("Apple").unwrap_err();

        assert!(matches!(err, LookupError::NotConfigured));
    }
}
