//! # Manasik Agent
//! Grounded answer synthesis over the knowledge corpus.
//!
//! ```text
//! question ─▶ Retriever.retrieve(question, top_k)
//!              │ empty ─▶ NO_RESULTS_FALLBACK (model never called)
//!              ▼
//!          build_prompt(question, results)
//!              ▼
//!          Provider.generate(prompt, model) ─▶ primary text ─▶ trim
//! ```

pub mod prompt;

use std::sync::Arc;

use manasik_core::config::ManasikConfig;
use manasik_core::error::Result;
use manasik_core::traits::provider::{GenerateParams, Provider};
use manasik_knowledge::{DEFAULT_TOP_K, Retriever};

pub use prompt::{NOT_IN_CONTEXT_FALLBACK, PROMPT_VERSION, build_prompt};

/// Returned when no corpus document overlaps the question at all.
///
/// Distinct from `NOT_IN_CONTEXT_FALLBACK`, which the model itself uses when
/// retrieved passages turn out not to answer the question.
pub const NO_RESULTS_FALLBACK: &str = "I couldn't find relevant information in this Hajj & Umrah knowledge base. Please consult a trusted scholar for this question.";

/// Answers questions from the corpus through a generative provider.
///
/// Holds only shared, read-only state: `answer` takes `&self` and can run
/// concurrently from many tasks.
pub struct AnswerSynthesizer {
    retriever: Arc<Retriever>,
    provider: Arc<dyn Provider>,
    params: GenerateParams,
    top_k: usize,
}

impl AnswerSynthesizer {
    pub fn new(retriever: Arc<Retriever>, provider: Arc<dyn Provider>, params: GenerateParams) -> Self {
        Self {
            retriever,
            provider,
            params,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Build from configuration: model id, sampling options and `top_k`.
    pub fn from_config(
        config: &ManasikConfig,
        retriever: Arc<Retriever>,
        provider: Arc<dyn Provider>,
    ) -> Self {
        let params = GenerateParams {
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            max_output_tokens: config.llm.max_output_tokens,
        };
        Self::new(retriever, provider, params).with_top_k(config.retrieval.top_k)
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.params.model
    }

    /// Whether the provider reports itself usable. Errors count as unhealthy.
    pub async fn provider_healthy(&self) -> bool {
        match self.provider.health_check().await {
            Ok(ok) => ok,
            Err(e) => {
                tracing::warn!("{} health check failed: {e}", self.provider.name());
                false
            }
        }
    }

    /// Answer `question` from the corpus.
    ///
    /// Provider failures, including responses without output text, are
    /// returned unchanged; nothing is retried.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let results = self.retriever.retrieve(question, self.top_k);
        if results.is_empty() {
            tracing::info!("No relevant documents, returning fallback");
            return Ok(NO_RESULTS_FALLBACK.to_string());
        }

        tracing::debug!(
            "Top results: {}",
            results
                .iter()
                .map(|r| format!("{} ({:.2})", r.doc.display_title().unwrap_or("Untitled"), r.score))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let prompt = build_prompt(question, &results);
        tracing::debug!("Prompt {} ({} chars)", PROMPT_VERSION, prompt.len());
        let response = self.provider.generate(&prompt, &self.params).await?;
        let answer = response.primary_text()?.trim().to_string();

        tracing::info!(
            "Answered with {} document(s) via {} ({} chars)",
            results.len(),
            self.provider.name(),
            answer.len()
        );
        Ok(answer)
    }
}
