//! Bounded tool-orchestration loop.
//!
//! One query is one run: send the question to the model, execute whatever
//! tools it calls, feed the results back, and repeat for at most
//! [`MAX_TOOL_ROUNDS`] rounds after the initial call. Tool failures are
//! reported to the model as result strings; only transport errors from the
//! model service itself escape to the caller.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{AiClient, AiError, AiResponse, ContentBlock, Message, Role, ToolRegistry};

/// Maximum tool-execution rounds after the initial model call. The model
/// is called at most `MAX_TOOL_ROUNDS + 1` times per query.
pub const MAX_TOOL_ROUNDS: u32 = 2;

/// Returned when the final response carries no text block at all.
const FALLBACK_ANSWER: &str =
    "I wasn't able to complete the request. Please try rephrasing your question.";

/// Static policy text sent as the system prompt on every call.
const SYSTEM_PROMPT: &str = "\
You are an AI assistant specialized in course materials and educational content with access to a comprehensive search tool for course information.

Search Tool Usage:
- Use the search tool **only** for questions about specific course content or detailed educational materials
- You may make up to **2 tool calls** per query when needed (e.g., get an outline then search, or search two different courses)
- Prefer a single tool call when possible; use a second only when the first result is insufficient or the question involves multiple courses/topics
- Synthesize search results into accurate, fact-based responses
- If search yields no results, state this clearly without offering alternatives

Course Outline Tool Usage:
- Use `get_course_outline` when users ask about a course's outline, syllabus, structure, or list of lessons
- It returns the course title, course link, and each lesson's number and title
- Do NOT use the search tool for outline/syllabus questions — use `get_course_outline` instead

Response Protocol:
- **General knowledge questions**: Answer using existing knowledge without searching
- **Course-specific questions**: Search first, then answer
- **No meta-commentary**:
 - Provide direct answers only — no reasoning process, search explanations, or question-type analysis
 - Do not mention \"based on the search results\"


All responses must be:
1. **Brief, Concise and focused** - Get to the point quickly
2. **Educational** - Maintain instructional value
3. **Clear** - Use accessible language
4. **Example-supported** - Include relevant examples when they aid understanding
Provide only the direct answer to what was asked.";

/// Drives one query against the model, with tool-augmented reasoning,
/// terminating within the round budget and always producing an answer
/// string.
pub struct Orchestrator {
    client: Arc<dyn AiClient>,
    max_tool_rounds: u32,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn AiClient>) -> Self {
        Self {
            client,
            max_tool_rounds: MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_max_tool_rounds(mut self, max: u32) -> Self {
        self.max_tool_rounds = max;
        self
    }

    /// Answer one query. `history` is an opaque rendering of the prior
    /// conversation, appended to the system prompt when present; tools are
    /// offered to the model only when a registry is supplied.
    ///
    /// The transcript and round counter live on this call's stack, so
    /// concurrent runs never share state.
    pub async fn generate_response(
        &self,
        query: &str,
        history: Option<&str>,
        registry: Option<&ToolRegistry>,
    ) -> Result<String, AiError> {
        let system = match history {
            Some(h) => format!("{SYSTEM_PROMPT}\n\nPrevious conversation:\n{h}"),
            None => SYSTEM_PROMPT.to_string(),
        };

        let tools = registry.map(|r| r.definitions());
        let mut messages = vec![Message::user_text(query)];

        let mut response = self
            .client
            .send_message(&system, &messages, tools.as_deref())
            .await?;

        let registry = match registry {
            Some(r) if !response.is_terminal() => r,
            _ => return Ok(answer_text(&response)),
        };

        for round in 1..=self.max_tool_rounds {
            debug!(round, "tool round");

            // Execute this response's tool calls, then append the
            // assistant message and one user message pairing every result
            // to its request id. Append-only: prior messages are never
            // touched.
            let results = execute_tool_calls(registry, &response.content);
            messages.push(Message {
                role: Role::Assistant,
                content: response.content,
            });
            messages.push(Message {
                role: Role::User,
                content: results,
            });

            // Tools stay enabled so the model may call again.
            response = self
                .client
                .send_message(&system, &messages, tools.as_deref())
                .await?;

            if response.is_terminal() {
                break;
            }
        }

        // Either the model stopped calling tools, or the round budget ran
        // out with requests still pending. Pending requests are dropped:
        // the budget is a hard ceiling on model calls.
        Ok(answer_text(&response))
    }
}

/// Run every tool-use block in order, producing paired tool results.
/// Failures become result strings for the model; they never escape.
fn execute_tool_calls(registry: &ToolRegistry, blocks: &[ContentBlock]) -> Vec<ContentBlock> {
    let mut results = Vec::new();
    for block in blocks {
        let ContentBlock::ToolUse { id, name, input } = block else {
            continue;
        };
        let content = match registry.execute(name, input) {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = %name, error = %e, "tool execution failed");
                format!("Error executing tool '{name}': {e}")
            }
        };
        results.push(ContentBlock::ToolResult {
            tool_use_id: id.clone(),
            content,
        });
    }
    results
}

fn answer_text(response: &AiResponse) -> String {
    response
        .text()
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_ANSWER.to_string())
}
