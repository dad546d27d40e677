//! Chat Completions Gateway
//!
//! Completion gateway for HTTP services that speak the chat-completions
//! format:
//!
//! - request: `POST <endpoint>/chat/completions` with
//!   `{model, temperature, messages: [{role, content}]}`
//! - response: the text at `choices[0].message.content`
//!
//! No retries or backoff: a failure is reported once and absorbed by the
//! inspector.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{CompletionGateway, CompletionRequest, GatewayError};
use crate::config::InspectorConfig;

/// HTTP chat-completions client
#[derive(Clone)]
pub struct ChatCompletionsGateway {
    /// Base URL, without trailing slash
    endpoint: String,
    /// Bearer token (optional for local services)
    api_key: Option<String>,
    /// HTTP client
    http_client: reqwest::Client,
}

impl ChatCompletionsGateway {
    /// Create a gateway for `endpoint` with a request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key,
            http_client,
        })
    }

    /// Create from [`InspectorConfig`]
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &InspectorConfig) -> Result<Self, GatewayError> {
        Self::new(
            config.endpoint.clone(),
            config.api_key.clone(),
            config.request_timeout,
        )
    }

    /// Get completions endpoint URL
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }
}

#[async_trait]
impl CompletionGateway for ChatCompletionsGateway {
    fn name(&self) -> &'static str {
        "chat-completions"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let mut builder = self.http_client.post(self.completions_url()).json(request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(map_transport)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Malformed(e.to_string()))?;

        first_choice_text(&data)
    }
}

/// Extract `choices[0].message.content`
fn first_choice_text(data: &serde_json::Value) -> Result<String, GatewayError> {
    data.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(String::from)
        .ok_or_else(|| GatewayError::Malformed("missing choices[0].message.content".to_string()))
}

fn map_transport(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(e)
    }
}
