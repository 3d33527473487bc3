//! Claude API client struct, request building, and response parsing.

use crate::{AiError, AiResponse, ContentBlock, Message, TokenUsage, ToolDefinition};

use super::config::ClaudeConfig;

pub(crate) const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub(crate) const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude API client.
pub struct ClaudeClient {
    pub(crate) config: ClaudeConfig,
    pub(crate) http: reqwest::Client,
}

impl ClaudeClient {
    pub fn new(config: ClaudeConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Build the JSON request body for the Messages API.
    ///
    /// `ToolDefinition` and `ContentBlock` serialize to the wire shapes
    /// directly, so both go into the body verbatim.
    pub(crate) fn build_request_body(
        &self,
        system: &str,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": system,
            "messages": messages,
        });

        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            body["tools"] = serde_json::json!(tools);
            // Auto, never forced: the model decides whether to call.
            body["tool_choice"] = serde_json::json!({"type": "auto"});
        }

        body
    }

    /// Parse a Messages API response body.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<AiResponse, AiError> {
        let blocks = json["content"]
            .as_array()
            .ok_or_else(|| AiError::ParseError("response has no content array".into()))?;

        let mut content = Vec::new();
        for block in blocks {
            match block["type"].as_str() {
                Some("text") => content.push(ContentBlock::Text {
                    text: block["text"].as_str().unwrap_or("").to_string(),
                }),
                Some("tool_use") => content.push(ContentBlock::ToolUse {
                    id: block["id"].as_str().unwrap_or("").to_string(),
                    name: block["name"].as_str().unwrap_or("").to_string(),
                    input: block["input"].clone(),
                }),
                // Unknown block types are skipped, not errors.
                _ => {}
            }
        }

        let usage = TokenUsage {
            input_tokens: json["usage"]["input_tokens"].as_u64().unwrap_or(0),
            output_tokens: json["usage"]["output_tokens"].as_u64().unwrap_or(0),
        };

        Ok(AiResponse { content, usage })
    }
}
