//! OpenRouter chat-completion client.
//!
//! Speaks the OpenAI-compatible `/chat/completions` protocol and identifies the
//! calling site through the `HTTP-Referer` and `X-Title` headers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;

use crate::{ChatRequest, CompletionClient, LlmError};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const HTTP_REFERER: HeaderName = HeaderName::from_static("http-referer");
const X_TITLE: HeaderName = HeaderName::from_static("x-title");

#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// Bearer credential. `None` or blank fails every call before any I/O.
    pub api_key: Option<String>,
    pub base_url: String,
    pub site_url: String,
    pub site_name: String,
    pub timeout: Duration,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            site_url: "http://localhost:3000".to_owned(),
            site_name: "NutriPlan".to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|content| !content.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    config: OpenRouterConfig,
}

impl OpenRouterClient {
    pub fn new(config: OpenRouterConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self { http, config })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    fn identity_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(value) = HeaderValue::from_str(&self.config.site_url) {
            headers.insert(HTTP_REFERER, value);
        }

        if let Ok(value) = HeaderValue::from_str(&self.config.site_name) {
            headers.insert(X_TITLE, value);
        }

        headers
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    #[tracing::instrument(skip_all, fields(model = %request.model))]
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let Some(api_key) = self.api_key() else {
            tracing::error!("Completion service API key is not configured");
            return Err(LlmError::Configuration);
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .headers(self.identity_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Completion request failed");
                LlmError::upstream("request failed", e.to_string())
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Completion service returned an error");

            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_owned()
            } else {
                body
            };

            return Err(LlmError::upstream(status.to_string(), message));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Completion response is not valid JSON");
            LlmError::upstream(status.to_string(), "Invalid response from completion service")
        })?;

        let content = body.into_content().ok_or_else(|| {
            tracing::error!("Completion response has no message content");
            LlmError::upstream(status.to_string(), "Invalid response from completion service")
        })?;

        tracing::debug!(length = content.len(), "Received completion");

        Ok(content)
    }
}
