//! Error types for Manasik.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ManasikError>;

#[derive(Debug, Error)]
pub enum ManasikError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("API key missing for provider: {0}")]
    ApiKeyMissing(String),

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// The service answered, but the response carried no output text.
    #[error("Provider response missing output text: {0}")]
    MissingOutput(String),

    #[error("{0}")]
    Other(String),
}

impl ManasikError {
    /// True for failures of the external generative service.
    ///
    /// Lets callers tell "service unavailable" apart from configuration or
    /// corpus problems without matching on every variant.
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Provider(_) | Self::ApiKeyMissing(_) | Self::MissingOutput(_)
        )
    }
}
