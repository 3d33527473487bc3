//! Name-indexed catalog of executable tools.

use tracing::debug;

use crate::ToolDefinition;

use super::{Source, Tool, ToolError};

/// Registry of tools available to the model for one serving context.
///
/// Construct one per serving context and pass it explicitly; the source
/// buffer it aggregates is shared mutable state, so callers serving
/// concurrent sessions through a single registry must serialize the
/// read-then-reset sequence per session.
pub struct ToolRegistry {
    /// Registered tools with their cached names, in registration order.
    tools: Vec<(String, Box<dyn Tool>)>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool under its declared name. Duplicate names are
    /// rejected so a miswired registry fails at startup instead of
    /// silently shadowing a tool.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), ToolError> {
        let name = tool.definition().name;
        if self.tools.iter().any(|(n, _)| n == &name) {
            return Err(ToolError::DuplicateName(name));
        }
        debug!(tool = %name, "registered tool");
        self.tools.push((name, Box::new(tool)));
        Ok(())
    }

    /// Schemas of all registered tools, in registration order. Passed to
    /// the model verbatim as its available-tools declaration.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|(_, t)| t.definition()).collect()
    }

    /// Execute a tool by name.
    ///
    /// An unknown name is not an error: the model may hallucinate tool
    /// names, and the loop must keep running, so it yields a "not found"
    /// result string instead.
    pub fn execute(&self, name: &str, input: &serde_json::Value) -> Result<String, ToolError> {
        match self.tools.iter().find(|(n, _)| n == name) {
            Some((_, tool)) => {
                debug!(tool = %name, "executing tool");
                tool.execute(input)
            }
            None => Ok(format!("Tool '{name}' not found")),
        }
    }

    /// Provenance recorded by every registered tool, flattened in
    /// registration order.
    pub fn last_sources(&self) -> Vec<Source> {
        self.tools
            .iter()
            .flat_map(|(_, t)| t.last_sources())
            .collect()
    }

    /// Clear provenance on every registered tool. Call once per completed
    /// query, after reading the sources, so they cannot leak into the
    /// next query.
    pub fn reset_sources(&self) {
        for (_, tool) in &self.tools {
            tool.reset_sources();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
