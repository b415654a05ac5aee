//! Unified OpenAI-compatible provider.
//!
//! One struct serves every registry entry. Providers differ only by endpoint
//! URL, wire style (Responses vs Chat Completions), auth style and API key.
//! Response bodies are decoded into typed structs and normalised into a
//! `ProviderResponse`; a body without text surfaces as `MissingOutput` when the
//! caller asks for the primary text.

use std::time::Duration;

use async_trait::async_trait;
use manasik_core::config::LlmConfig;
use manasik_core::error::{ManasikError, Result};
use manasik_core::traits::provider::{GenerateParams, Provider};
use manasik_core::types::{ProviderResponse, Usage};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::provider_registry::{ApiStyle, AuthStyle, ProviderConfig};

/// A unified provider that works with any OpenAI-compatible API.
pub struct OpenAiCompatibleProvider {
    /// Provider name (e.g., "openai", "groq").
    name: String,
    api_key: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    base_url: String,
    api_style: ApiStyle,
    auth_style: AuthStyle,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    /// Create from a known provider config + LLM settings.
    ///
    /// Resolution order:
    /// - API key: `llm.api_key` > registry env vars > empty
    /// - Base URL: `llm.endpoint` > env override > registry default
    pub fn from_registry(registry: &ProviderConfig, llm: &LlmConfig) -> Result<Self> {
        let api_key = if !llm.api_key.is_empty() {
            llm.api_key.clone()
        } else {
            registry
                .env_keys
                .iter()
                .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
                .unwrap_or_default()
        };

        let base_url = if !llm.endpoint.is_empty() {
            llm.endpoint.trim_end_matches('/').to_string()
        } else {
            let env_value = registry.base_url_env.and_then(|key| std::env::var(key).ok());
            resolve_base_url(registry, env_value.as_deref())
        };

        Ok(Self {
            name: registry.name.to_string(),
            api_key,
            base_url,
            api_style: registry.api_style,
            auth_style: registry.auth_style,
            client: build_client(llm.timeout_secs)?,
        })
    }

    /// Create for a custom endpoint (e.g., "custom:https://my-server.com/v1").
    ///
    /// Custom endpoints speak Chat Completions and use bearer auth only when a
    /// key is configured (`llm.api_key` or `CUSTOM_API_KEY`).
    pub fn custom(endpoint: &str, llm: &LlmConfig) -> Result<Self> {
        let base_url = endpoint
            .strip_prefix("custom:")
            .unwrap_or(endpoint)
            .trim_end_matches('/')
            .to_string();
        if base_url.is_empty() {
            return Err(ManasikError::Config("custom provider needs an endpoint URL".into()));
        }

        let api_key = if !llm.api_key.is_empty() {
            llm.api_key.clone()
        } else {
            std::env::var("CUSTOM_API_KEY").unwrap_or_default()
        };

        let auth_style = if api_key.is_empty() {
            AuthStyle::None
        } else {
            AuthStyle::Bearer
        };

        Ok(Self {
            name: "custom".to_string(),
            api_key,
            base_url,
            api_style: ApiStyle::ChatCompletions,
            auth_style,
            client: build_client(llm.timeout_secs)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_style(&self) -> ApiStyle {
        self.api_style
    }

    /// Build the auth header for the request.
    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_style {
            AuthStyle::Bearer if !self.api_key.is_empty() => {
                req.header("Authorization", format!("Bearer {}", self.api_key))
            }
            _ => req,
        }
    }

    fn request_body(&self, prompt: &str, params: &GenerateParams) -> Value {
        let mut body = match self.api_style {
            ApiStyle::Responses => json!({
                "model": params.model,
                "input": prompt,
            }),
            ApiStyle::ChatCompletions => json!({
                "model": params.model,
                "messages": [{ "role": "user", "content": prompt }],
            }),
        };
        if let Some(temperature) = params.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = params.max_output_tokens {
            let key = match self.api_style {
                ApiStyle::Responses => "max_output_tokens",
                ApiStyle::ChatCompletions => "max_tokens",
            };
            body[key] = json!(max_tokens);
        }
        body
    }
}

/// Base URL from the registry's env override, falling back to its default.
///
/// Empty values are ignored. Full base URLs are used as given (minus a
/// trailing slash); host-style values get `/v1` appended when missing.
fn resolve_base_url(registry: &ProviderConfig, env_value: Option<&str>) -> String {
    let Some(val) = env_value.map(|v| v.trim().trim_end_matches('/')).filter(|v| !v.is_empty()) else {
        return registry.base_url.to_string();
    };
    if registry.base_url_env_is_host && !val.ends_with("/v1") {
        format!("{val}/v1")
    } else {
        val.to_string()
    }
}

fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }
    builder
        .build()
        .map_err(|e| ManasikError::Http(format!("failed to build HTTP client: {e}")))
}

#[async_trait]
impl Provider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str, params: &GenerateParams) -> Result<ProviderResponse> {
        if self.auth_style != AuthStyle::None && self.api_key.is_empty() {
            return Err(ManasikError::ApiKeyMissing(self.name.clone()));
        }

        let url = format!("{}{}", self.base_url, self.api_style.path());
        let body = self.request_body(prompt, params);
        tracing::debug!(
            "→ {} {} (model: {}, prompt: {} chars)",
            self.name,
            url,
            params.model,
            prompt.len()
        );

        let req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        let req = self.apply_auth(req);

        let resp = req.send().await.map_err(|e| {
            ManasikError::Http(format!("{} connection failed ({}): {}", self.name, url, e))
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ManasikError::Provider(format!(
                "{} API error {}: {}",
                self.name, status, text
            )));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| ManasikError::Http(format!("{} response body: {e}", self.name)))?;

        let response = match self.api_style {
            ApiStyle::Responses => parse_responses(json),
            ApiStyle::ChatCompletions => parse_chat_completion(json),
        }
        .map_err(|e| ManasikError::Provider(format!("{} malformed response: {e}", self.name)))?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                "← {} tokens: {} in / {} out",
                self.name,
                usage.input_tokens,
                usage.output_tokens
            );
        }
        Ok(response)
    }

    async fn health_check(&self) -> Result<bool> {
        if self.auth_style != AuthStyle::None {
            return Ok(!self.api_key.is_empty());
        }

        // Local servers: try to connect
        let url = format!("{}/models", self.base_url);
        Ok(self.client.get(&url).send().await.is_ok())
    }
}

// ─── Wire formats ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    output: Vec<ResponsesOutputItem>,
    #[serde(default)]
    usage: Option<ResponsesUsage>,
}

#[derive(Debug, Deserialize)]
struct ResponsesOutputItem {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    content: Vec<ResponsesContent>,
}

#[derive(Debug, Deserialize)]
struct ResponsesContent {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponsesUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionBody {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

/// Normalise a Responses API body.
///
/// The primary text is the first text part of the first `message` output item;
/// reasoning items that precede it are skipped.
fn parse_responses(json: Value) -> serde_json::Result<ProviderResponse> {
    let body: ResponsesBody = serde_json::from_value(json)?;
    let content = body
        .output
        .iter()
        .filter(|item| item.kind == "message")
        .flat_map(|item| item.content.iter())
        .find_map(|part| part.text.clone());

    Ok(ProviderResponse {
        content,
        finish_reason: body.status,
        usage: body.usage.map(|u| Usage {
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
            total_tokens: u.total_tokens,
        }),
    })
}

/// Normalise a Chat Completions body. Only the first choice is used.
fn parse_chat_completion(json: Value) -> serde_json::Result<ProviderResponse> {
    let body: ChatCompletionBody = serde_json::from_value(json)?;
    let choice = body.choices.into_iter().next();

    Ok(ProviderResponse {
        content: choice
            .as_ref()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.clone()),
        finish_reason: choice.and_then(|c| c.finish_reason),
        usage: body.usage.map(|u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }),
    })
}
