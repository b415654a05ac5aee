//! Manasik configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ManasikError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManasikConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl ManasikConfig {
    /// Load config from the default path (~/.manasik/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ManasikError::Config(format!("Failed to read config {}: {e}", path.display())))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ManasikError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Apply environment overrides on top of file values.
    ///
    /// `PORT` overrides the gateway port, `MANASIK_CORPUS` the corpus path and
    /// `MANASIK_MODEL` the model id. API keys are resolved per provider by the
    /// provider registry.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable source. Empty values and a
    /// non-numeric `PORT` are ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse().ok()) {
            self.gateway.port = port;
        }
        if let Some(path) = lookup("MANASIK_CORPUS").filter(|p| !p.is_empty()) {
            self.knowledge.corpus_path = path;
        }
        if let Some(model) = lookup("MANASIK_MODEL").filter(|m| !m.is_empty()) {
            self.llm.model = model;
        }
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the Manasik home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".manasik")
    }
}

/// Generative model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    /// Overrides the registry base URL when set.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
    /// HTTP request timeout; 0 disables it.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String { "openai".into() }
fn default_model() -> String { "gpt-4.1-mini".into() }
fn default_timeout_secs() -> u64 { 60 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: String::new(),
            endpoint: String::new(),
            temperature: None,
            max_output_tokens: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Knowledge corpus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,
}

fn default_corpus_path() -> String { "data/knowledge.json".into() }

impl KnowledgeConfig {
    /// Corpus path with `~` expanded.
    pub fn resolved_corpus_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.corpus_path).into_owned())
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self { corpus_path: default_corpus_path() }
    }
}

/// Retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize { 4 }

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: default_top_k() }
    }
}

/// Gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "bool_true")]
    pub cors: bool,
}

fn bool_true() -> bool { true }
fn default_port() -> u16 { 3001 }
fn default_host() -> String { "127.0.0.1".into() }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            cors: true,
        }
    }
}
