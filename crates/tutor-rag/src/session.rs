//! In-memory conversation sessions.
//!
//! Keeps the last few question/answer exchanges per session and renders
//! them as the history block the orchestrator appends to its system
//! prompt. Nothing is persisted.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

#[derive(Debug, Clone)]
struct Exchange {
    user: String,
    assistant: String,
}

pub struct SessionManager {
    sessions: Mutex<HashMap<String, Vec<Exchange>>>,
    /// Exchanges kept per session; older ones are dropped.
    max_history: usize,
}

impl SessionManager {
    pub fn new(max_history: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_history,
        }
    }

    /// Create a new empty session and return its id.
    pub fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions
            .lock()
            .unwrap()
            .insert(id.clone(), Vec::new());
        id
    }

    /// Record one completed question/answer exchange.
    pub fn add_exchange(&self, session_id: &str, user: &str, assistant: &str) {
        let mut sessions = self.sessions.lock().unwrap();
        let exchanges = sessions.entry(session_id.to_string()).or_default();
        exchanges.push(Exchange {
            user: user.to_string(),
            assistant: assistant.to_string(),
        });
        if exchanges.len() > self.max_history {
            let excess = exchanges.len() - self.max_history;
            exchanges.drain(..excess);
        }
    }

    /// Render the session's history, oldest first. `None` when the session
    /// is unknown or has no exchanges yet.
    pub fn get_conversation_history(&self, session_id: &str) -> Option<String> {
        let sessions = self.sessions.lock().unwrap();
        let exchanges = sessions.get(session_id)?;
        if exchanges.is_empty() {
            return None;
        }
        Some(
            exchanges
                .iter()
                .map(|e| format!("User: {}\nAssistant: {}", e.user, e.assistant))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(2)
    }
}
