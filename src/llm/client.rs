//! Core `ChatClient` trait and `ApiClient` implementation.
//!
//! `ApiClient` calls any OpenAI-compatible `/v1/chat/completions` endpoint —
//! OpenRouter, OpenAI, Groq, vLLM, etc. All connection details come from
//! [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::LlmConfig;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur during a remote language-model call.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status code.
    #[error("LLM error {code}: {body}")]
    Status { code: u16, body: String },

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse LLM response: {0}")]
    Parse(String),

    /// The LLM returned a response with no usable text content.
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ChatRequest
// ---------------------------------------------------------------------------

/// One chat-completions request: model identifier, message pair, token ceiling.
///
/// Every pipeline step builds its own request so the model and `max_tokens`
/// can differ per call (extraction vs. generation vs. refinement).
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Model identifier sent to the endpoint.
    pub model: String,
    /// System message content.
    pub system: String,
    /// User message content (the actual prompt).
    pub user: String,
    /// Token ceiling for this call.
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Default system message used across the pipeline.
    pub const DEFAULT_SYSTEM: &'static str = "You are a helpful AI assistant.";

    /// Build a request with the default system message.
    pub fn new(model: impl Into<String>, user: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            system: Self::DEFAULT_SYSTEM.to_string(),
            user: user.into(),
            max_tokens,
        }
    }

    /// Replace the system message.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }
}

// ---------------------------------------------------------------------------
// ChatClient trait
// ---------------------------------------------------------------------------

/// Async trait for chat-completions backends.
///
/// Implementors must be `Send + Sync` so they can be shared across the
/// pipeline as `Arc<dyn ChatClient>`. One call equals one outbound request;
/// no retries happen at this layer.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send `request` and return the assistant message content.
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError>;
}

// Compile-time assertion: Box<dyn ChatClient> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn ChatClient>) {}
};

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// # No hardcoded URLs
/// All connection details (`base_url`, credential, header values, timeout)
/// come exclusively from the [`LlmConfig`] passed to
/// [`ApiClient::from_config`].
pub struct ApiClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl ApiClient {
    /// Build an `ApiClient` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`, so a hung endpoint surfaces as
    /// [`LlmError::Timeout`] rather than stalling the turn indefinitely.
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatClient for ApiClient {
    /// Send `request` to the configured endpoint.
    ///
    /// The `Authorization: Bearer …` header is attached only when a
    /// credential resolves to a non-empty string; the configured
    /// `HTTP-Referer` and `X-Title` identification headers are always sent.
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": request.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user",   "content": request.user   }
            ],
            "max_tokens": request.max_tokens
        });

        let mut req = self
            .client
            .post(self.endpoint())
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.app_title)
            .json(&body);

        if let Some(key) = self.config.resolved_api_key() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(LlmError::EmptyResponse)?
            .trim()
            .to_string();

        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(content)
    }
}

// ---------------------------------------------------------------------------
// ScriptedClient  (test double)
// ---------------------------------------------------------------------------

/// Test double that replays a scripted list of responses and records every
/// request it receives. Call-count and ordering assertions in the pipeline
/// tests are built on this.
#[cfg(test)]
pub struct ScriptedClient {
    responses: std::sync::Mutex<std::collections::VecDeque<Result<String, LlmError>>>,
    /// Answer used once the script is exhausted; `None` means `EmptyResponse`.
    default: Option<String>,
    calls: std::sync::Mutex<Vec<ChatRequest>>,
}

#[cfg(test)]
impl ScriptedClient {
    /// Create a client that answers with `responses` in order, then
    /// `EmptyResponse` once the script runs out.
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.into()),
            default: None,
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Shorthand: every call succeeds with `text`.
    pub fn always(text: &str) -> Self {
        Self {
            responses: std::sync::Mutex::new(std::collections::VecDeque::new()),
            default: Some(text.to_string()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of all requests received so far.
    pub fn calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[cfg(test)]
#[async_trait]
impl ChatClient for ScriptedClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(request);
        match self.responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => match &self.default {
                Some(text) => Ok(text.clone()),
                None => Err(LlmError::EmptyResponse),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            api_key: api_key.map(|s| s.to_string()),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let config = make_config(None);
        let _client = ApiClient::from_config(&config);
    }

    #[test]
    fn from_config_accepts_real_api_key() {
        let config = make_config(Some("sk-test-1234"));
        let _client = ApiClient::from_config(&config);
    }

    #[test]
    fn endpoint_appends_path_once() {
        let mut config = make_config(None);
        config.base_url = "https://openrouter.ai/api/".into();
        let client = ApiClient::from_config(&config);
        assert_eq!(
            client.endpoint(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    /// Verify that `ApiClient` is object-safe (usable as `dyn ChatClient`).
    #[test]
    fn client_is_object_safe() {
        let config = make_config(None);
        let client: Box<dyn ChatClient> = Box::new(ApiClient::from_config(&config));
        drop(client);
    }

    #[test]
    fn chat_request_defaults_system_message() {
        let req = ChatRequest::new("m", "hello", 100);
        assert_eq!(req.system, ChatRequest::DEFAULT_SYSTEM);
        assert_eq!(req.max_tokens, 100);

        let req = req.with_system("custom");
        assert_eq!(req.system, "custom");
    }

    #[tokio::test]
    async fn scripted_client_replays_in_order() {
        let client = ScriptedClient::new(vec![
            Ok("first".into()),
            Err(LlmError::Timeout),
            Ok("third".into()),
        ]);

        assert_eq!(
            client.complete(ChatRequest::new("m", "a", 10)).await.unwrap(),
            "first"
        );
        assert!(matches!(
            client.complete(ChatRequest::new("m", "b", 10)).await,
            Err(LlmError::Timeout)
        ));
        assert_eq!(
            client.complete(ChatRequest::new("m", "c", 10)).await.unwrap(),
            "third"
        );
        assert_eq!(client.call_count(), 3);
        assert_eq!(client.calls()[1].user, "b");
    }

    #[tokio::test]
    async fn scripted_client_exhausted_script_is_empty_response() {
        let client = ScriptedClient::new(vec![]);
        assert!(matches!(
            client.complete(ChatRequest::new("m", "a", 10)).await,
            Err(LlmError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn always_client_repeats_response() {
        let client = ScriptedClient::always("same");
        for _ in 0..3 {
            assert_eq!(
                client.complete(ChatRequest::new("m", "x", 10)).await.unwrap(),
                "same"
            );
        }
        assert_eq!(client.call_count(), 3);
    }
}
