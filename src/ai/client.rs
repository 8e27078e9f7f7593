//! Anthropic Messages API client behind the completion boundary.
//!
//! The pipeline treats the endpoint as a synchronous request/response
//! collaborator: one user-role message in, the first text content block out.
//! Exactly one attempt per upload cycle; transport failures and non-success
//! statuses surface as remote-call errors with the cause attached.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::completion_client;
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Request/response boundary to the completion endpoint.
///
/// Implementations must not retry internally; the orchestrator owns the
/// one-attempt-per-cycle policy.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Submit `prompt` as a single user message and return the reply text.
    async fn complete(&self, prompt: &str) -> Result<String, AnalyzerError>;
}

/// Message content block for the API request.
#[derive(Serialize)]
struct MessageContent {
    #[serde(rename = "type")]
    content_type: String,
    text: String,
}

impl MessageContent {
    fn text(text: &str) -> Self {
        Self {
            content_type: "text".to_string(),
            text: text.to_string(),
        }
    }
}

/// Message in the request body.
#[derive(Serialize)]
struct Message {
    role: String,
    content: Vec<MessageContent>,
}

/// API request body.
#[derive(Serialize)]
struct ApiRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

/// Content block in the API response.
#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

/// API response body.
#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

/// API error response.
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Anthropic API client.
pub struct AnthropicClient {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionBackend for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String, AnalyzerError> {
        let request = ApiRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![MessageContent::text(prompt)],
            }],
        };

        tracing::debug!(
            "[Client] Sending {} chars to {}",
            prompt.chars().count(),
            self.model
        );

        let response = completion_client()
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalyzerError::RemoteCall {
                message: "request failed".to_string(),
                source: Some(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(api_error) => format!("API error: {}", api_error.error.message),
                Err(_) => format!("API error ({}): {}", status, error_text),
            };
            return Err(AnalyzerError::RemoteCall {
                message,
                source: None,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| AnalyzerError::RemoteCall {
                message: "unreadable response body".to_string(),
                source: Some(e),
            })?;

        // First text content block carries the reply
        api_response
            .content
            .iter()
            .find(|block| block.content_type == "text")
            .and_then(|block| block.text.clone())
            .ok_or_else(|| AnalyzerError::RemoteCall {
                message: "response contained no text content".to_string(),
                source: None,
            })
    }
}
