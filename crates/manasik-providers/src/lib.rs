//! # Manasik Providers
//!
//! Generative model clients. Every supported service (OpenAI, OpenRouter, Groq,
//! DeepSeek, Ollama, custom endpoints) is served by a single
//! `OpenAiCompatibleProvider`, configured from the static provider registry.

pub mod openai_compatible;
pub mod provider_registry;

use manasik_core::config::ManasikConfig;
use manasik_core::error::{ManasikError, Result};
use manasik_core::traits::Provider;

pub use openai_compatible::OpenAiCompatibleProvider;

/// Create a provider from configuration (`[llm] provider`).
pub fn create_provider(config: &ManasikConfig) -> Result<Box<dyn Provider>> {
    let provider_name = config.llm.provider.as_str();

    let provider = match provider_name {
        // Custom endpoint: "custom:https://my-server.com/v1"
        other if other.starts_with("custom:") => {
            OpenAiCompatibleProvider::custom(other, &config.llm)?
        }
        _ => {
            let registry = provider_registry::get_provider_config(provider_name)
                .ok_or_else(|| ManasikError::ProviderNotFound(provider_name.into()))?;
            OpenAiCompatibleProvider::from_registry(registry, &config.llm)?
        }
    };

    tracing::info!(
        "🧠 Provider: {} ({}), model: {}",
        provider_name,
        provider.base_url(),
        config.llm.model
    );
    Ok(Box::new(provider))
}

/// List all available provider names.
pub fn available_providers() -> Vec<&'static str> {
    let mut names = provider_registry::all_provider_names();
    names.push("custom");
    names
}
