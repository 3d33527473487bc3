//! Tool interface and registry.
//!
//! Tools are retrieval capabilities the model can call by name during a
//! query (search course content, fetch a course outline, etc.). The
//! registry owns the registered set, exposes their schemas to the model,
//! and aggregates the provenance they record while executing.

mod registry;

pub use registry::ToolRegistry;

use crate::ToolDefinition;

/// Provenance record: which document a retrieval tool drew on, surfaced
/// to the end user alongside the answer.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Source {
    pub text: String,
    pub link: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("tool '{0}' is already registered")]
    DuplicateName(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Execution(String),
}

/// A capability the model can invoke by name.
///
/// Execution is synchronous and runs on the orchestration task; tools are
/// called sequentially in the order the model requested them, so they need
/// not be safe against concurrent execution within one query.
pub trait Tool: Send + Sync {
    /// Schema declared to the model.
    fn definition(&self) -> ToolDefinition;

    /// Run the tool. Errors are reported back to the model as result
    /// strings by the orchestrator; they never abort the query.
    fn execute(&self, input: &serde_json::Value) -> Result<String, ToolError>;

    /// Provenance accumulated by the most recent execution.
    fn last_sources(&self) -> Vec<Source> {
        Vec::new()
    }

    /// Clear accumulated provenance.
    fn reset_sources(&self) {}
}

// Lets a caller keep a handle to a registered tool (e.g. to read its
// sources directly) while the registry owns the dispatch entry.
impl<T: Tool + ?Sized> Tool for std::sync::Arc<T> {
    fn definition(&self) -> ToolDefinition {
        (**self).definition()
    }

    fn execute(&self, input: &serde_json::Value) -> Result<String, ToolError> {
        (**self).execute(input)
    }

    fn last_sources(&self) -> Vec<Source> {
        (**self).last_sources()
    }

    fn reset_sources(&self) {
        (**self).reset_sources()
    }
}
