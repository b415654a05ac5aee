//! API route handlers for the gateway.

use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use serde_json::{Value, json};

use super::server::AppState;

/// Returned to clients on any synthesis failure; details stay in the logs.
pub const CHAT_FAILURE_MESSAGE: &str = "Failed to generate answer. Please try again later.";

/// Health check endpoint.
///
/// The gateway itself is always `ok`; `provider_ok` reports whether the
/// generative provider looks usable (key present, local server reachable).
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let synth = &state.synthesizer;
    Json(json!({
        "status": "ok",
        "message": "Hajj RAG backend is running",
        "provider": synth.provider_name(),
        "provider_ok": synth.provider_healthy().await,
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Answer a question: `{"message": "..."}` → `{"answer": "..."}`.
///
/// The body is parsed by hand so a missing or malformed body gets the same
/// 400 as an empty message instead of an extractor rejection.
pub async fn chat(State(state): State<Arc<AppState>>, body: Bytes) -> (StatusCode, Json<Value>) {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let message = body["message"].as_str().map(str::trim).unwrap_or("");
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "message is required"})),
        );
    }

    match state.synthesizer.answer(message).await {
        Ok(answer) => (StatusCode::OK, Json(json!({"answer": answer}))),
        Err(e) => {
            tracing::error!("Error in /api/chat: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": CHAT_FAILURE_MESSAGE})),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use manasik_agent::{AnswerSynthesizer, NO_RESULTS_FALLBACK};
    use manasik_core::error::{ManasikError, Result};
    use manasik_core::traits::provider::{GenerateParams, Provider};
    use manasik_core::types::{Document, ProviderResponse};
    use manasik_knowledge::Retriever;
    use std::sync::Mutex;

    /// Echoes the question line of the prompt it receives.
    struct EchoProvider {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Provider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str, _params: &GenerateParams) -> Result<ProviderResponse> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let question = prompt
                .split("QUESTION:\n")
                .nth(1)
                .and_then(|rest| rest.lines().next())
                .unwrap_or_default();
            Ok(ProviderResponse::text(format!("\n  You asked: {question}  \n")))
        }
    }

    struct DownProvider;

    #[async_trait]
    impl Provider for DownProvider {
        fn name(&self) -> &str {
            "down"
        }

        async fn generate(&self, _prompt: &str, _params: &GenerateParams) -> Result<ProviderResponse> {
            Err(ManasikError::Http("connection refused".into()))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(false)
        }
    }

    fn test_state_with(provider: Arc<dyn Provider>) -> State<Arc<AppState>> {
        let retriever = Arc::new(Retriever::new(vec![
            Document::new("Tawaf is circling the Kaaba seven times").with_title("Tawaf"),
            Document::new("Ihram is the sacred state entered before Hajj").with_title("Ihram"),
        ]));
        let synth = AnswerSynthesizer::new(retriever, provider, GenerateParams::new("gpt-4.1-mini"));
        State(Arc::new(AppState::new(Arc::new(synth))))
    }

    fn test_state() -> State<Arc<AppState>> {
        test_state_with(Arc::new(EchoProvider {
            prompts: Mutex::new(vec![]),
        }))
    }

    fn body(value: Value) -> Bytes {
        Bytes::from(value.to_string())
    }

    #[tokio::test]
    async fn test_health_check() {
        let json = health_check(test_state()).await.0;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["message"], "Hajj RAG backend is running");
        assert!(json["uptime_secs"].is_number());
        assert_eq!(json["provider"], "echo");
        assert_eq!(json["provider_ok"], true);
    }

    #[tokio::test]
    async fn test_health_reports_unusable_provider() {
        let json = health_check(test_state_with(Arc::new(DownProvider))).await.0;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["provider"], "down");
        assert_eq!(json["provider_ok"], false);
    }

    #[tokio::test]
    async fn test_chat_answers_trimmed_message() {
        let (status, json) = chat(test_state(), body(json!({"message": "  What is Tawaf?  "}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.0["answer"], "You asked: What is Tawaf?");
    }

    #[tokio::test]
    async fn test_chat_empty_message_is_bad_request() {
        for payload in [json!({"message": ""}), json!({"message": "   "}), json!({}), json!({"message": 42})] {
            let (status, json) = chat(test_state(), body(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json.0["error"], "message is required");
        }
    }

    #[tokio::test]
    async fn test_chat_malformed_body_is_bad_request() {
        let (status, _) = chat(test_state(), Bytes::from_static(b"not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = chat(test_state(), Bytes::new()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_no_results_fallback() {
        let (status, json) = chat(test_state(), body(json!({"message": "Tell me about prayer"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.0["answer"], NO_RESULTS_FALLBACK);
    }

    #[tokio::test]
    async fn test_chat_provider_failure_is_500() {
        let state = test_state_with(Arc::new(DownProvider));
        let (status, json) = chat(state, body(json!({"message": "What is Tawaf?"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json.0["error"], CHAT_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_router_serves_chat() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let State(state) = test_state();
        let app = crate::server::build_router(AppState::new(state.synthesizer.clone()), true);

        let req = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("Content-Type", "application/json")
            .header("Origin", "http://localhost:5173")
            .body(Body::from(r#"{"message": "What is Ihram?"}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let allow_origin = resp.headers().get("access-control-allow-origin").unwrap();
        assert_eq!(allow_origin.to_str().unwrap(), "*");

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["answer"], "You asked: What is Ihram?");
    }

    #[tokio::test]
    async fn test_router_unknown_route() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let State(state) = test_state();
        let app = crate::server::build_router(AppState::new(state.synthesizer.clone()), false);
        let req = Request::builder().uri("/api/missing").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
