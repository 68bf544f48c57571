//! Anthropic Messages API client
//!
//! One POST per completion, no retries. The reply text is the first text
//! block of the response content.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{AgentError, Config, Message, Result};
use crate::llm::traits::{CompletionProvider, CompletionRequest};

/// Anthropic API client
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    url: String,
    api_key: String,
    api_version: String,
    model: String,
    max_tokens: u32,
}

/// Messages request body
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message],
}

/// Messages response body (only the fields we read)
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Error body returned on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type", default)]
    kind: String,
    message: String,
}

impl AnthropicClient {
    /// Create a client from configuration.
    ///
    /// Fails when the API key is missing or the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();

        let mut builder = Client::builder();
        if let Some(secs) = config.anthropic.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AgentError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.messages_url(),
            api_key,
            api_version: config.anthropic.api_version.clone(),
            model: config.model.name.clone(),
            max_tokens: config.model.max_tokens,
        })
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let mut config = Config::default();
        config.anthropic.base_url = base_url.into();
        config.anthropic.api_key = Some(api_key.into());
        Self::from_config(&config)
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the output token limit
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn first_text(response: MessagesResponse) -> Result<String> {
        match response.content.into_iter().next() {
            Some(ContentBlock {
                kind,
                text: Some(text),
            }) if kind == "text" => Ok(text),
            Some(block) => Err(AgentError::transport(format!(
                "response began with a '{}' block instead of text",
                block.kind
            ))),
            None => Err(AgentError::transport("response contained no text")),
        }
    }
}

#[async_trait]
impl CompletionProvider for AnthropicClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: request.system,
            messages: request.messages,
        };

        tracing::debug!(
            model = %self.model,
            messages = request.messages.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    AgentError::transport(format!("Cannot connect to {}: {}", self.url, e))
                } else {
                    AgentError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<ErrorResponse>(&error_text) {
                Ok(err) => format!("{}: {}", err.error.kind, err.error.message),
                Err(_) => error_text,
            };
            return Err(AgentError::transport(format!(
                "Anthropic API error ({}): {}",
                status, detail
            )));
        }

        let data: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AgentError::transport(format!("Failed to read response: {}", e)))?;

        let text = Self::first_text(data)?;
        tracing::debug!(bytes = text.len(), "received completion");
        Ok(text)
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}
