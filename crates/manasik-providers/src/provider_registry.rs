//! Provider registry — maps provider names to endpoint configurations.
//!
//! Every supported service speaks an OpenAI-style HTTP API; entries differ in
//! base URL, wire style, auth style and where the API key comes from.

/// How to attach auth credentials to requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// No authentication required (local servers).
    None,
}

/// Which request/response shape the endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApiStyle {
    /// `POST /responses` with `{model, input}`.
    Responses,
    /// `POST /chat/completions` with `{model, messages}`.
    ChatCompletions,
}

impl ApiStyle {
    pub fn path(self) -> &'static str {
        match self {
            ApiStyle::Responses => "/responses",
            ApiStyle::ChatCompletions => "/chat/completions",
        }
    }
}

/// Configuration for a single provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider identifier.
    pub name: &'static str,
    /// Base URL for the API.
    pub base_url: &'static str,
    pub api_style: ApiStyle,
    /// Environment variable names to try for the API key (in order).
    pub env_keys: &'static [&'static str],
    pub auth_style: AuthStyle,
    /// Environment variable to override the base URL (e.g., OLLAMA_HOST).
    pub base_url_env: Option<&'static str>,
    /// The override names a host (`http://host:port`), not a full API base;
    /// `/v1` is appended when missing.
    pub base_url_env_is_host: bool,
}

static PROVIDERS: &[ProviderConfig] = &[
    ProviderConfig {
        name: "openai",
        base_url: "https://api.openai.com/v1",
        api_style: ApiStyle::Responses,
        env_keys: &["OPENAI_API_KEY"],
        auth_style: AuthStyle::Bearer,
        base_url_env: Some("OPENAI_BASE_URL"),
        base_url_env_is_host: false,
    },
    ProviderConfig {
        name: "openrouter",
        base_url: "https://openrouter.ai/api/v1",
        api_style: ApiStyle::ChatCompletions,
        env_keys: &["OPENROUTER_API_KEY"],
        auth_style: AuthStyle::Bearer,
        base_url_env: None,
        base_url_env_is_host: false,
    },
    ProviderConfig {
        name: "groq",
        base_url: "https://api.groq.com/openai/v1",
        api_style: ApiStyle::ChatCompletions,
        env_keys: &["GROQ_API_KEY"],
        auth_style: AuthStyle::Bearer,
        base_url_env: None,
        base_url_env_is_host: false,
    },
    ProviderConfig {
        name: "deepseek",
        base_url: "https://api.deepseek.com/v1",
        api_style: ApiStyle::ChatCompletions,
        env_keys: &["DEEPSEEK_API_KEY"],
        auth_style: AuthStyle::Bearer,
        base_url_env: None,
        base_url_env_is_host: false,
    },
    ProviderConfig {
        name: "ollama",
        base_url: "http://localhost:11434/v1",
        api_style: ApiStyle::ChatCompletions,
        env_keys: &[],
        auth_style: AuthStyle::None,
        base_url_env: Some("OLLAMA_HOST"),
        base_url_env_is_host: true,
    },
];

/// Look up a provider config by name.
pub fn get_provider_config(name: &str) -> Option<&'static ProviderConfig> {
    let lookup = match name {
        "open_ai" | "chatgpt" => "openai",
        "open_router" => "openrouter",
        other => other,
    };
    PROVIDERS.iter().find(|p| p.name == lookup)
}

/// List all known provider names.
pub fn all_provider_names() -> Vec<&'static str> {
    PROVIDERS.iter().map(|p| p.name).collect()
}
