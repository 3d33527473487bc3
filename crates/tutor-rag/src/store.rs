//! Vector-store contract consumed by the retrieval tools.
//!
//! Indexing, embedding, and ranking live behind this trait; the tools only
//! need semantic search with optional course/lesson filters and course
//! metadata lookups.

pub trait VectorStore: Send + Sync {
    /// Semantic search over course chunks. Filters narrow the search to a
    /// course (fuzzy-matched by the store) and/or a lesson number.
    fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> SearchResults;

    /// Link for a specific lesson, if the course catalog has one.
    fn get_lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String>;

    /// Full outline of the course best matching `course_name`.
    fn get_course_outline(&self, course_name: &str) -> Option<CourseOutline>;
}

/// Result of one search: parallel documents/metadata vectors, or a
/// store-level error the tool passes through to the model as text.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub documents: Vec<String>,
    pub metadata: Vec<ChunkMetadata>,
    pub error: Option<String>,
}

impl SearchResults {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChunkMetadata {
    pub course_title: String,
    pub lesson_number: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CourseOutline {
    pub title: String,
    pub link: Option<String>,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Lesson {
    pub number: u32,
    pub title: String,
}
