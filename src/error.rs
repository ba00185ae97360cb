use thiserror::Error;

pub use crate::domain::PayloadError;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Errors that stop a run from starting or its results from being saved.
///
/// Failed requests are not errors; they are recorded as failed checks.
#[derive(Debug, Error)]
pub enum LoadTestError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
    #[error("Failed to write summary to {path}: {source}")]
    SummaryExport {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize summary: {0}")]
    SummarySerialize(#[from] serde_json::Error),
}
