//! Hosted chat-completions summarizer
//!
//! Sends the document text to an OpenAI-compatible `/chat/completions`
//! endpoint and returns the first choice's message. Every upstream problem
//! (missing key, transport error, timeout, non-2xx status, malformed body)
//! surfaces as `AnalysisError::SummaryUnavailable`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisError, SummaryBackend};
use crate::config::HostedSettings;
use crate::utils::http::{with_retry, RetryConfig};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Failure of a single request, before mapping to `AnalysisError`
#[derive(Debug)]
enum CallError {
    Transport(String),
    Status(u16, String),
    Body(String),
}

impl CallError {
    /// Transport errors, rate limits and server errors are worth retrying
    fn is_retryable(&self) -> bool {
        match self {
            CallError::Transport(_) => true,
            CallError::Status(code, _) => *code == 429 || *code >= 500,
            CallError::Body(_) => false,
        }
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::Transport(msg) => write!(f, "request failed: {}", msg),
            CallError::Status(code, body) => write!(f, "HTTP status {}: {}", code, body),
            CallError::Body(msg) => write!(f, "unexpected response: {}", msg),
        }
    }
}

/// Summarizer backed by a hosted chat-completions API
pub struct HostedBackend {
    /// Build failures are kept and reported on each call
    client: Result<Client, String>,
    settings: HostedSettings,
    api_key: Option<String>,
    retry: RetryConfig,
}

impl HostedBackend {
    /// Build a backend reading the API key from `settings.api_key_env`
    pub fn from_settings(settings: &HostedSettings) -> Self {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            warn!(
                "{} is not set; hosted summaries will fall back",
                settings.api_key_env
            );
        }
        Self::with_api_key(settings, api_key)
    }

    /// Build a backend with an explicit key
    pub fn with_api_key(settings: &HostedSettings, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                warn!("Failed to create HTTP client: {}", e);
                format!("failed to create HTTP client: {}", e)
            });
        Self::with_client(settings, client, api_key)
    }

    fn with_client(
        settings: &HostedSettings,
        client: Result<Client, String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            settings: settings.clone(),
            api_key,
            retry: RetryConfig::with_retries(settings.max_retries),
        }
    }

    fn build_request<'a>(&'a self, text: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.settings.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("{} {}", self.settings.prompt, text),
                },
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }

    async fn send_once(
        &self,
        client: &Client,
        api_key: &str,
        request: &ChatRequest<'_>,
    ) -> Result<String, CallError> {
        let resp = client
            .post(&self.settings.endpoint)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CallError::Status(status.as_u16(), body));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| CallError::Body(e.to_string()))?;

        extract_summary(parsed).ok_or_else(|| CallError::Body("no message content".to_string()))
    }
}

/// First non-empty choice content, trimmed
fn extract_summary(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

#[async_trait]
impl SummaryBackend for HostedBackend {
    fn name(&self) -> &'static str {
        "hosted"
    }

    async fn summarize(&self, text: &str) -> Result<String, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyContent);
        }

        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AnalysisError::SummaryUnavailable(format!("{} is not set", self.settings.api_key_env))
        })?;
        let client = self
            .client
            .as_ref()
            .map_err(|reason| AnalysisError::SummaryUnavailable(reason.clone()))?;

        let request = self.build_request(text);
        debug!(
            "Requesting summary from {} ({} chars)",
            self.settings.model,
            text.len()
        );

        let summary = with_retry(
            &self.retry,
            "hosted summary",
            || self.send_once(client, api_key, &request),
            CallError::is_retryable,
        )
        .await
        .map_err(|e| {
            warn!("Hosted summary failed: {}", e);
            AnalysisError::SummaryUnavailable(e.to_string())
        })?;

        info!("Hosted summary received ({} chars)", summary.len());
        Ok(summary)
    }
}
