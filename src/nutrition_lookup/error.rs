use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Lookup endpoint is not configured")]
    NotConfigured,

    #[error("Lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Lookup returned status {0}")]
    Status(u16),

    #[error("Lookup response is not valid JSON: {0}")]
    Body(#[from] serde_json::Error),
}
