//! Generative model provider trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ProviderResponse;

/// Per-call generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateParams {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl GenerateParams {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            max_output_tokens: None,
        }
    }
}

/// A text-in, text-out generative service.
///
/// Implementations make a single request per call and never retry.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// Generate a completion for a single prompt.
    async fn generate(&self, prompt: &str, params: &GenerateParams) -> Result<ProviderResponse>;

    /// Whether the provider looks usable (credentials present or server reachable).
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
