//! Retrieval tools exposed to the model.
//!
//! Both tools execute against the shared [`VectorStore`] and record the
//! sources they drew on; the registry drains those sources once per query
//! so the UI can show them next to the answer.

use std::sync::{Arc, Mutex};

use tracing::debug;

use tutor_ai::{Source, Tool, ToolDefinition, ToolError};

use crate::store::{SearchResults, VectorStore};

fn required_str<'a>(input: &'a serde_json::Value, key: &str) -> Result<&'a str, ToolError> {
    input[key]
        .as_str()
        .ok_or_else(|| ToolError::InvalidArguments(format!("missing required '{key}'")))
}

/// Semantic search over course content (`search_course_content`).
pub struct CourseSearchTool {
    store: Arc<dyn VectorStore>,
    /// Sources from the most recent execution; replaced, not appended,
    /// so a second call within one query does not double-report.
    last_sources: Mutex<Vec<Source>>,
}

impl CourseSearchTool {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self {
            store,
            last_sources: Mutex::new(Vec::new()),
        }
    }

    fn format_results(&self, results: &SearchResults) -> String {
        let mut formatted = Vec::new();
        let mut sources = Vec::new();

        for (document, meta) in results.documents.iter().zip(&results.metadata) {
            let header = match meta.lesson_number {
                Some(n) => format!("{} - Lesson {}", meta.course_title, n),
                None => meta.course_title.clone(),
            };

            let link = meta
                .lesson_number
                .and_then(|n| self.store.get_lesson_link(&meta.course_title, n));
            sources.push(Source {
                text: header.clone(),
                link,
            });

            formatted.push(format!("[{header}]\n{document}"));
        }

        *self.last_sources.lock().unwrap() = sources;
        formatted.join("\n\n")
    }
}

impl Tool for CourseSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "search_course_content".to_string(),
            description: "Search course materials with smart course name matching and lesson filtering".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to search for in the course content",
                    },
                    "course_name": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')",
                    },
                    "lesson_number": {
                        "type": "integer",
                        "description": "Specific lesson number to search within (e.g. 1, 2, 3)",
                    },
                },
                "required": ["query"],
            }),
        }
    }

    fn execute(&self, input: &serde_json::Value) -> Result<String, ToolError> {
        let query = required_str(input, "query")?;
        let course_name = input["course_name"].as_str();
        let lesson_number = input["lesson_number"].as_u64().map(|n| n as u32);

        debug!(query, ?course_name, ?lesson_number, "course content search");

        let results = self.store.search(query, course_name, lesson_number);

        if let Some(error) = results.error {
            return Ok(error);
        }

        if results.is_empty() {
            let mut message = String::from("No relevant content found");
            if let Some(course) = course_name {
                message.push_str(&format!(" in course '{course}'"));
            }
            if let Some(lesson) = lesson_number {
                message.push_str(&format!(" in lesson {lesson}"));
            }
            message.push('.');
            return Ok(message);
        }

        Ok(self.format_results(&results))
    }

    fn last_sources(&self) -> Vec<Source> {
        self.last_sources.lock().unwrap().clone()
    }

    fn reset_sources(&self) {
        self.last_sources.lock().unwrap().clear();
    }
}

/// Course outline lookup (`get_course_outline`): title, link, and the
/// lesson list for the course best matching the given name.
pub struct CourseOutlineTool {
    store: Arc<dyn VectorStore>,
    last_sources: Mutex<Vec<Source>>,
}

impl CourseOutlineTool {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self {
            store,
            last_sources: Mutex::new(Vec::new()),
        }
    }
}

impl Tool for CourseOutlineTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_course_outline".to_string(),
            description: "Get a course's outline: title, course link, and all lesson numbers and titles".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "course_name": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')",
                    },
                },
                "required": ["course_name"],
            }),
        }
    }

    fn execute(&self, input: &serde_json::Value) -> Result<String, ToolError> {
        let course_name = required_str(input, "course_name")?;

        debug!(course_name, "course outline lookup");

        let Some(outline) = self.store.get_course_outline(course_name) else {
            return Ok(format!("No course found matching '{course_name}'"));
        };

        *self.last_sources.lock().unwrap() = vec![Source {
            text: outline.title.clone(),
            link: outline.link.clone(),
        }];

        let mut out = format!("Course: {}", outline.title);
        if let Some(link) = &outline.link {
            out.push_str(&format!("\nCourse Link: {link}"));
        }
        out.push_str("\n\nLessons:");
        for lesson in &outline.lessons {
            out.push_str(&format!("\nLesson {}: {}", lesson.number, lesson.title));
        }
        Ok(out)
    }

    fn last_sources(&self) -> Vec<Source> {
        self.last_sources.lock().unwrap().clone()
    }

    fn reset_sources(&self) {
        self.last_sources.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ChunkMetadata, CourseOutline, Lesson};

    /// VectorStore with canned returns, recording search calls.
    struct MockStore {
        results: SearchResults,
        lesson_link: Option<String>,
        outline: Option<CourseOutline>,
        searches: Mutex<Vec<(String, Option<String>, Option<u32>)>>,
    }

    impl MockStore {
        fn empty() -> Self {
            Self {
                results: SearchResults::default(),
                lesson_link: None,
                outline: None,
                searches: Mutex::new(Vec::new()),
            }
        }

        fn with_sample_results() -> Self {
            Self {
                results: SearchResults {
                    documents: vec![
                        "Doc 1 content about APIs".to_string(),
                        "Doc 2 content about MCP".to_string(),
                    ],
                    metadata: vec![
                        ChunkMetadata {
                            course_title: "Intro to APIs".to_string(),
                            lesson_number: Some(1),
                        },
                        ChunkMetadata {
                            course_title: "MCP Course".to_string(),
                            lesson_number: Some(3),
                        },
                    ],
                    error: None,
                },
                ..Self::empty()
            }
        }
    }

    impl VectorStore for MockStore {
        fn search(
            &self,
            query: &str,
            course_name: Option<&str>,
            lesson_number: Option<u32>,
        ) -> SearchResults {
            self.searches.lock().unwrap().push((
                query.to_string(),
                course_name.map(String::from),
                lesson_number,
            ));
            self.results.clone()
        }

        fn get_lesson_link(&self, _course_title: &str, _lesson_number: u32) -> Option<String> {
            self.lesson_link.clone()
        }

        fn get_course_outline(&self, _course_name: &str) -> Option<CourseOutline> {
            self.outline.clone()
        }
    }

    #[test]
    fn search_formats_hits_with_headers() {
        let tool = CourseSearchTool::new(Arc::new(MockStore::with_sample_results()));

        let result = tool
            .execute(&serde_json::json!({"query": "APIs"}))
            .unwrap();

        assert!(result.contains("[Intro to APIs - Lesson 1]"));
        assert!(result.contains("Doc 1 content about APIs"));
        assert!(result.contains("[MCP Course - Lesson 3]"));
        assert!(result.contains("Doc 2 content about MCP"));
    }

    #[test]
    fn search_empty_results_message() {
        let tool = CourseSearchTool::new(Arc::new(MockStore::empty()));

        let result = tool
            .execute(&serde_json::json!({"query": "nonexistent topic"}))
            .unwrap();

        assert!(result.contains("No relevant content found"));
    }

    #[test]
    fn search_empty_results_echo_filters() {
        let tool = CourseSearchTool::new(Arc::new(MockStore::empty()));

        let result = tool
            .execute(&serde_json::json!({
                "query": "test", "course_name": "MCP", "lesson_number": 5
            }))
            .unwrap();

        assert!(result.contains("No relevant content found"));
        assert!(result.contains("course 'MCP'"));
        assert!(result.contains("lesson 5"));
    }

    #[test]
    fn search_store_error_passed_through() {
        let store = MockStore {
            results: SearchResults::error("Search error: connection failed"),
            ..MockStore::empty()
        };
        let tool = CourseSearchTool::new(Arc::new(store));

        let result = tool.execute(&serde_json::json!({"query": "test"})).unwrap();

        assert_eq!(result, "Search error: connection failed");
    }

    #[test]
    fn search_forwards_filters_to_store() {
        let store = Arc::new(MockStore::empty());
        let tool = CourseSearchTool::new(store.clone());

        tool.execute(&serde_json::json!({
            "query": "test", "course_name": "MCP", "lesson_number": 3
        }))
        .unwrap();

        let searches = store.searches.lock().unwrap();
        assert_eq!(
            searches[0],
            ("test".to_string(), Some("MCP".to_string()), Some(3))
        );
    }

    #[test]
    fn search_missing_query_is_invalid() {
        let tool = CourseSearchTool::new(Arc::new(MockStore::empty()));

        let err = tool.execute(&serde_json::json!({})).unwrap_err();

        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn search_tracks_sources() {
        let tool = CourseSearchTool::new(Arc::new(MockStore::with_sample_results()));

        tool.execute(&serde_json::json!({"query": "APIs"})).unwrap();

        let sources = tool.last_sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].text, "Intro to APIs - Lesson 1");
        assert_eq!(sources[0].link, None);
    }

    #[test]
    fn search_sources_include_lesson_links() {
        let store = MockStore {
            lesson_link: Some("https://example.com/lesson1".to_string()),
            ..MockStore::with_sample_results()
        };
        let tool = CourseSearchTool::new(Arc::new(store));

        tool.execute(&serde_json::json!({"query": "APIs"})).unwrap();

        assert_eq!(
            tool.last_sources()[0].link.as_deref(),
            Some("https://example.com/lesson1")
        );
    }

    #[test]
    fn search_reset_clears_sources() {
        let tool = CourseSearchTool::new(Arc::new(MockStore::with_sample_results()));
        tool.execute(&serde_json::json!({"query": "APIs"})).unwrap();

        tool.reset_sources();

        assert!(tool.last_sources().is_empty());
    }

    #[test]
    fn search_definition_schema() {
        let tool = CourseSearchTool::new(Arc::new(MockStore::empty()));

        let def = tool.definition();

        assert_eq!(def.name, "search_course_content");
        assert!(def.input_schema["properties"].get("query").is_some());
        assert_eq!(def.input_schema["required"][0], "query");
    }

    #[test]
    fn outline_formats_course() {
        let store = MockStore {
            outline: Some(CourseOutline {
                title: "MCP Course".to_string(),
                link: Some("https://example.com/mcp".to_string()),
                lessons: vec![
                    Lesson {
                        number: 1,
                        title: "Introduction".to_string(),
                    },
                    Lesson {
                        number: 2,
                        title: "Servers".to_string(),
                    },
                ],
            }),
            ..MockStore::empty()
        };
        let tool = CourseOutlineTool::new(Arc::new(store));

        let result = tool
            .execute(&serde_json::json!({"course_name": "MCP"}))
            .unwrap();

        assert!(result.contains("Course: MCP Course"));
        assert!(result.contains("Course Link: https://example.com/mcp"));
        assert!(result.contains("Lesson 1: Introduction"));
        assert!(result.contains("Lesson 2: Servers"));

        let sources = tool.last_sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].text, "MCP Course");
    }

    #[test]
    fn outline_unknown_course() {
        let tool = CourseOutlineTool::new(Arc::new(MockStore::empty()));

        let result = tool
            .execute(&serde_json::json!({"course_name": "Ghost"}))
            .unwrap();

        assert_eq!(result, "No course found matching 'Ghost'");
        assert!(tool.last_sources().is_empty());
    }
}
