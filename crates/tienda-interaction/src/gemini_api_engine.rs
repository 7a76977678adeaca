//! GeminiApiEngine - Direct REST API implementation for Gemini.
//!
//! Sends the briefing as `systemInstruction` and the chat history as
//! multi-turn `contents`. The credential travels in the `x-goog-api-key`
//! header, never in the URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use tienda_core::config::GeminiConfig;
use tienda_core::engine::{EngineError, ReasoningEngine};
use tienda_core::session::{ChatMessage, MessageRole};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Reasoning engine backed by the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiEngine {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiApiEngine {
    /// Creates an engine with the provided API key, model and request timeout.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Other(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Builds from stored credentials. The credential's model, when present,
    /// takes precedence over `default_model`.
    pub fn from_config(
        gemini: &GeminiConfig,
        default_model: &str,
        timeout: Duration,
    ) -> Result<Self, EngineError> {
        let model = gemini.model.as_deref().unwrap_or(default_model);
        Self::new(gemini.api_key.clone(), model, timeout)
    }

    /// Points the engine at another endpoint (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String, EngineError> {
        let url = format!(
            "{}/{model}:generateContent",
            self.base_url.trim_end_matches('/'),
            model = self.model
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| EngineError::ProcessError {
                status_code: None,
                message: format!("Gemini API request failed: {err}"),
                is_retryable: err.is_connect() || err.is_timeout(),
                retry_after: None,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| EngineError::Other(format!("Failed to parse Gemini response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl ReasoningEngine for GeminiApiEngine {
    async fn complete(
        &self,
        briefing: &str,
        history: &[ChatMessage],
    ) -> Result<String, EngineError> {
        let request = build_request(briefing, history)?;
        self.send_request(&request).await
    }

    fn describe(&self) -> String {
        format!("gemini:{}", self.model)
    }
}

/// Gemini conversations must open with a user turn, so the synthetic
/// greeting (and any other leading assistant text) is left out.
fn build_request(
    briefing: &str,
    history: &[ChatMessage],
) -> Result<GenerateContentRequest, EngineError> {
    let contents: Vec<Content> = history
        .iter()
        .skip_while(|message| message.role == MessageRole::Assistant)
        .map(|message| Content {
            role: match message.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "model",
            }
            .to_string(),
            parts: vec![Part {
                text: message.content.clone(),
            }],
        })
        .collect();

    if contents.is_empty() {
        return Err(EngineError::ExecutionFailed(
            "Gemini request needs at least one user message".into(),
        ));
    }

    Ok(GenerateContentRequest {
        contents,
        system_instruction: Some(Content {
            role: "system".to_string(),
            parts: vec![Part {
                text: briefing.to_string(),
            }],
        }),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Concatenates the text parts of the first candidate.
fn extract_text_response(response: GenerateContentResponse) -> Result<String, EngineError> {
    let text: String = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(EngineError::ExecutionFailed(
            "Gemini API returned no text in the response candidates".into(),
        ));
    }
    Ok(text)
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> EngineError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    EngineError::ProcessError {
        status_code: Some(status.as_u16()),
        message,
        is_retryable,
        retry_after,
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    // HTTP-date values are not used by Gemini; only delta-seconds is parsed.
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
