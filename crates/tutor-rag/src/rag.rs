//! Top-level facade: one query in, answer plus sources out.

use std::sync::Arc;

use tracing::info;

use tutor_ai::{AiClient, AiError, Orchestrator, Source, ToolError, ToolRegistry};

use crate::search_tools::{CourseOutlineTool, CourseSearchTool};
use crate::session::SessionManager;
use crate::store::VectorStore;

/// Serves course-material questions: owns the orchestrator, the tool
/// registry (search + outline over one shared store), and the sessions.
///
/// The registry's source buffer is shared across queries, so callers
/// serving concurrent sessions through one `RagSystem` must serialize
/// queries per logical session.
pub struct RagSystem {
    orchestrator: Orchestrator,
    registry: ToolRegistry,
    sessions: SessionManager,
}

impl RagSystem {
    pub fn new(
        client: Arc<dyn AiClient>,
        store: Arc<dyn VectorStore>,
    ) -> Result<Self, ToolError> {
        let mut registry = ToolRegistry::new();
        registry.register(CourseSearchTool::new(store.clone()))?;
        registry.register(CourseOutlineTool::new(store))?;

        Ok(Self {
            orchestrator: Orchestrator::new(client),
            registry,
            sessions: SessionManager::default(),
        })
    }

    pub fn session_manager(&self) -> &SessionManager {
        &self.sessions
    }

    /// Answer one question. With a session id, prior exchanges are fed to
    /// the model as context and the new exchange is recorded afterwards.
    ///
    /// Returns the answer together with the sources the retrieval tools
    /// used; the registry's source buffer is drained and reset here, once
    /// per query.
    pub async fn query(
        &self,
        question: &str,
        session_id: Option<&str>,
    ) -> Result<(String, Vec<Source>), AiError> {
        let prompt = format!("Answer this question about course materials: {question}");
        let history =
            session_id.and_then(|id| self.sessions.get_conversation_history(id));

        let answer = self
            .orchestrator
            .generate_response(&prompt, history.as_deref(), Some(&self.registry))
            .await?;

        // Read, then reset: stale provenance must not leak into the next
        // query through the shared registry.
        let sources = self.registry.last_sources();
        self.registry.reset_sources();

        if let Some(id) = session_id {
            self.sessions.add_exchange(id, question, &answer);
        }

        info!(sources = sources.len(), "query answered");
        Ok((answer, sources))
    }
}
