//! Retrieval-augmented answering over course materials.
//!
//! Wires the tutor-ai orchestration loop to concrete retrieval tools:
//! - `search_course_content` / `get_course_outline` tools over an abstract
//!   vector-store contract
//! - in-memory conversation sessions
//! - the `RagSystem` facade that serves one query end to end and returns
//!   the answer together with its sources

pub mod rag;
pub mod search_tools;
pub mod session;
pub mod store;

pub use rag::RagSystem;
pub use search_tools::{CourseOutlineTool, CourseSearchTool};
pub use session::SessionManager;
pub use store::{ChunkMetadata, CourseOutline, Lesson, SearchResults, VectorStore};
