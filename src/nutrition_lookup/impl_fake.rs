use crate::nutrition_lookup::error::LookupError;
use crate::nutrition_lookup::interface::{NutritionLookup, RemoteNutrients};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct NutritionLookupFake {
    responses: HashMap<String, RemoteNutrients>,
    fail_with_status: Option<u16>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl NutritionLookupFake {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            fail_with_status: None,
            requests: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn with_response(mut self, label: &str, nutrients: RemoteNutrients) -> Self {
        self.responses.insert(label.to_lowercase(), nutrients);
        self
    }

    pub fn failing(mut self, status: u16) -> Self {
        self.fail_with_status = Some(status);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Default for NutritionLookupFake {
    fn default() -> Self {
        Self::new()
    }
}

impl NutritionLookup for NutritionLookupFake {
    fn lookup(&self, label: &str) -> Result<Option<RemoteNutrients>, LookupError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(label.to_string());
        }

        if let Some(status) = self.fail_with_status {
            return Err(LookupError::Status(status));
        }

        Ok(self.responses.get(&label.to_lowercase()).copied())
    }
}
