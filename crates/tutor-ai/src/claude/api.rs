//! AiClient trait implementation for ClaudeClient.

use async_trait::async_trait;
use tracing::debug;

use crate::{AiClient, AiError, AiResponse, Message, ToolDefinition};

use super::client::{ClaudeClient, ANTHROPIC_API_URL, ANTHROPIC_VERSION};

#[async_trait]
impl AiClient for ClaudeClient {
    async fn send_message(
        &self,
        system: &str,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(system, messages, tools);

        debug!(model = %self.config.model, messages = messages.len(), "Claude API request");

        let response = self
            .http
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(200).collect::<String>();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        self.parse_response(json)
    }
}
