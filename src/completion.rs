//! Client for the hosted text-completion service.
//!
//! One prompt in, one block of text out. There is no streaming and no retry;
//! every failure is mapped to a [`CompletionError`] that the caller turns into
//! a user-facing message.

use std::env;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::CompletionConfig;
use crate::prompt::PromptTarget;

/// Errors from the completion layer.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The credential environment variable is unset or empty.
    #[error("{0} environment variable not set")]
    MissingCredential(String),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service returned its own error payload.
    #[error("{message}")]
    Service { status: Option<u16>, message: String },

    /// Non-2xx response without a recognisable error payload.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The response contained no text.
    #[error("response contained no text")]
    EmptyResponse,
}

impl CompletionError {
    /// Message shown to the user in place of a generated prompt pack.
    pub fn user_message(&self, target: PromptTarget) -> String {
        match self {
            CompletionError::EmptyResponse => {
                format!("生成 {} Prompts 時發生未知錯誤。", target.label())
            }
            other => format!("生成 {} Prompts 時發生錯誤：{}", target.label(), other),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(default, rename = "promptTokenCount")]
    prompt_token_count: Option<u32>,
    #[serde(default, rename = "candidatesTokenCount")]
    candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
}

/// HTTP client bound to one endpoint and credential, with a model per
/// prompt target.
#[derive(Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    copilot_model: String,
    api_key: String,
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("copilot_model", &self.copilot_model)
            .finish_non_exhaustive()
    }
}

impl CompletionClient {
    /// Both targets use `model` until [`Self::with_copilot_model`].
    pub fn new(endpoint: String, model: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            copilot_model: model.clone(),
            model,
            api_key,
        }
    }

    pub fn with_copilot_model(mut self, model: String) -> Self {
        self.copilot_model = model;
        self
    }

    /// Build a client from config, reading the credential from the
    /// configured environment variable.
    pub fn from_config(config: &CompletionConfig) -> Result<Self, CompletionError> {
        let api_key = env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CompletionError::MissingCredential(config.api_key_env.clone()))?;
        Ok(Self::new(
            config.endpoint.clone(),
            config.model_for(PromptTarget::Cursor).to_string(),
            api_key.trim().to_string(),
        )
        .with_copilot_model(config.model_for(PromptTarget::Copilot).to_string()))
    }

    pub fn model_for(&self, target: PromptTarget) -> &str {
        match target {
            PromptTarget::Cursor => &self.model,
            PromptTarget::Copilot => &self.copilot_model,
        }
    }

    fn url(&self, target: PromptTarget) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model_for(target).trim()
        )
    }

    /// Send `prompt` with the model for `target` and return the generated
    /// text verbatim.
    pub async fn generate(
        &self,
        target: PromptTarget,
        prompt: &str,
    ) -> Result<String, CompletionError> {
        info!(
            model = %self.model_for(target),
            target = target.label(),
            prompt_chars = prompt.chars().count(),
            "completion_request"
        );

        let response = self
            .client
            .post(self.url(target))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "completion_http_error");
            return Err(error_from_body(status.as_u16(), body));
        }

        let text = parse_response(&body)?;
        info!(response_chars = text.chars().count(), "completion_response");
        Ok(text)
    }
}

/// Request payload for a single-turn generation.
fn request_body(prompt: &str) -> serde_json::Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }]
    })
}

/// Extract the text of the first candidate from a success body.
fn parse_response(body: &str) -> Result<String, CompletionError> {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return Err(CompletionError::Service {
            status: envelope.error.code,
            message: envelope.error.message,
        });
    }

    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Decode(e.to_string()))?;

    if let Some(usage) = &parsed.usage_metadata {
        debug!(
            input_tokens = ?usage.prompt_token_count,
            output_tokens = ?usage.candidates_token_count,
            "completion_usage"
        );
    }

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(CompletionError::EmptyResponse);
    }
    Ok(text)
}

fn error_from_body(status: u16, body: String) -> CompletionError {
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) if !envelope.error.message.is_empty() => CompletionError::Service {
            status: Some(status),
            message: envelope.error.message,
        },
        _ => CompletionError::Status { status, body },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = request_body("hello");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = CompletionClient::new(
            "https://example.test/".to_string(),
            "gemini-2.5-pro".to_string(),
            "k".to_string(),
        );
        assert_eq!(
            client.url(PromptTarget::Cursor),
            "https://example.test/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }

    #[test]
    fn test_url_uses_model_per_target() {
        let client = CompletionClient::new(
            "https://example.test".to_string(),
            "gemini-2.5-pro".to_string(),
            "k".to_string(),
        );
        assert_eq!(client.model_for(PromptTarget::Copilot), "gemini-2.5-pro");

        let client = client.with_copilot_model("gemini-3-flash-preview".to_string());
        assert_eq!(
            client.url(PromptTarget::Copilot),
            "https://example.test/v1beta/models/gemini-3-flash-preview:generateContent"
        );
        assert_eq!(client.model_for(PromptTarget::Cursor), "gemini-2.5-pro");
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "P0: "}, {"text": "初始化"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 4}
        }"#;
        assert_eq!(parse_response(body).unwrap(), "P0: 初始化");
    }

    #[test]
    fn test_parse_response_no_candidates() {
        let err = parse_response(r#"{"candidates": []}"#).unwrap_err();
        assert!(matches!(err, CompletionError::EmptyResponse));
    }

    #[test]
    fn test_parse_response_invalid_json() {
        let err = parse_response("<html>").unwrap_err();
        assert!(matches!(err, CompletionError::Decode(_)));
    }

    #[test]
    fn test_parse_response_error_payload() {
        let body = r#"{"error": {"code": 429, "message": "Resource exhausted", "status": "RESOURCE_EXHAUSTED"}}"#;
        match parse_response(body).unwrap_err() {
            CompletionError::Service { status, message } => {
                assert_eq!(status, Some(429));
                assert_eq!(message, "Resource exhausted");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_from_body_plain_text() {
        let err = error_from_body(502, "Bad Gateway".to_string());
        assert!(matches!(err, CompletionError::Status { status: 502, .. }));
    }

    #[test]
    fn test_error_from_body_service_payload() {
        let err = error_from_body(
            400,
            r#"{"error": {"code": 400, "message": "API key not valid"}}"#.to_string(),
        );
        assert_eq!(err.to_string(), "API key not valid");
    }

    #[test]
    fn test_user_message() {
        let err = CompletionError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(
            err.user_message(PromptTarget::Cursor),
            "生成 Cursor Prompts 時發生錯誤：HTTP 500: boom"
        );
        assert_eq!(
            CompletionError::EmptyResponse.user_message(PromptTarget::Copilot),
            "生成 Copilot Prompts 時發生未知錯誤。"
        );
    }

    #[test]
    fn test_from_config_missing_credential() {
        let config = CompletionConfig {
            api_key_env: "STORYBOARD_TEST_UNSET_KEY_4F1A".to_string(),
            ..CompletionConfig::default()
        };
        let err = CompletionClient::from_config(&config).unwrap_err();
        assert!(matches!(err, CompletionError::MissingCredential(ref name) if name == "STORYBOARD_TEST_UNSET_KEY_4F1A"));
    }
}
