//! AI engine for Tutor.
//!
//! Answers questions about course materials by driving a Claude
//! conversation that may call retrieval tools:
//! - Claude Messages API client (tool calling enabled)
//! - Trait-based tool registry with retrieval provenance tracking
//! - Bounded orchestration loop (at most [`MAX_TOOL_ROUNDS`] tool rounds
//!   per query)

pub mod claude;
pub mod orchestrator;
pub mod tools;

use async_trait::async_trait;

pub use claude::{ClaudeClient, ClaudeConfig};
pub use orchestrator::{Orchestrator, MAX_TOOL_ROUNDS};
pub use tools::{Source, Tool, ToolError, ToolRegistry};

#[async_trait]
pub trait AiClient: Send + Sync {
    /// Send one request to the model. `tools` is `None` when tool use is
    /// not available for this conversation.
    async fn send_message(
        &self,
        system: &str,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<AiResponse, AiError>;
}

/// One entry in the conversation transcript. Transcripts are append-only:
/// a run only ever pushes new messages, never edits old ones.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// A user message containing a single text block.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A content block as it appears on the Messages API wire.
///
/// `ToolResult.tool_use_id` must echo the `id` of the `ToolUse` block it
/// answers, verbatim.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
    },
}

/// Machine-readable tool schema, declared to the model verbatim.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct AiResponse {
    pub content: Vec<ContentBlock>,
    pub usage: TokenUsage,
}

impl AiResponse {
    /// Tool-use blocks in this response, in the order the model emitted them.
    pub fn tool_uses(&self) -> impl Iterator<Item = &ContentBlock> {
        self.content
            .iter()
            .filter(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }

    /// True when the response requests no further tool use.
    pub fn is_terminal(&self) -> bool {
        self.tool_uses().next().is_none()
    }

    /// First text block, if any.
    pub fn text(&self) -> Option<&str> {
        self.content.iter().find_map(|b| match b {
            ContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}
