//! MCP tool implementations.
//!
//! # Module Structure
//!
//! - [`definitions`]: Tool schema definitions (JSON Schema for input validation)
//! - [`handlers`]: Tool execution logic

mod definitions;
mod handlers;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::DeckConfig;
use crate::services::PromptCatalog;
use crate::{Error, Result};

/// Shared state every tool handler works against.
pub struct ToolContext {
    /// The prompt catalog.
    pub catalog: Arc<PromptCatalog>,
    /// Public base URL for deep-link URLs.
    pub public_url: String,
    /// Importer endpoint, if configured.
    pub sheet_url: Option<String>,
    /// Importer shared secret, if configured.
    pub shared_secret: Option<String>,
}

impl ToolContext {
    /// Builds a context from a catalog and the relevant config values.
    #[must_use]
    pub fn new(catalog: Arc<PromptCatalog>, config: &DeckConfig) -> Self {
        Self {
            catalog,
            public_url: config.public_url.clone(),
            sheet_url: config.sheet_url.clone(),
            shared_secret: config.shared_secret.clone(),
        }
    }
}

/// Registry of MCP tools.
pub struct ToolRegistry {
    /// Available tools.
    tools: HashMap<String, ToolDefinition>,
    /// Handler context.
    ctx: ToolContext,
}

impl ToolRegistry {
    /// Creates a registry with all promptdeck tools.
    #[must_use]
    pub fn new(ctx: ToolContext) -> Self {
        let mut tools = HashMap::new();

        tools.insert("ping".to_string(), definitions::ping_tool());
        tools.insert("list_prompts".to_string(), definitions::list_prompts_tool());
        tools.insert("find_prompts".to_string(), definitions::find_prompts_tool());
        tools.insert(
            "append_prompt".to_string(),
            definitions::append_prompt_tool(),
        );
        tools.insert(
            "update_last_used".to_string(),
            definitions::update_last_used_tool(),
        );
        tools.insert(
            "import_from_sheet".to_string(),
            definitions::import_from_sheet_tool(),
        );
        tools.insert("search".to_string(), definitions::search_tool());
        tools.insert("fetch".to_string(), definitions::fetch_tool());

        Self { tools, ctx }
    }

    /// Returns all tool definitions.
    #[must_use]
    pub fn list_tools(&self) -> Vec<&ToolDefinition> {
        self.tools.values().collect()
    }

    /// Gets a tool definition by name.
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Executes a tool with the given arguments.
    ///
    /// Logical failures (validation, not-found) come back as a
    /// [`ToolResult`] with `is_error` set; `Err` is reserved for unknown
    /// tools, argument shape violations, and substrate failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool is unknown or execution fails.
    pub fn execute(&self, name: &str, arguments: Value) -> Result<ToolResult> {
        match name {
            "ping" => handlers::execute_ping(&self.ctx, arguments),
            "list_prompts" => handlers::execute_list_prompts(&self.ctx, arguments),
            "find_prompts" => handlers::execute_find_prompts(&self.ctx, arguments),
            "append_prompt" => handlers::execute_append_prompt(&self.ctx, arguments),
            "update_last_used" => handlers::execute_update_last_used(&self.ctx, arguments),
            "import_from_sheet" => handlers::execute_import_from_sheet(&self.ctx, arguments),
            "search" => handlers::execute_search(&self.ctx, arguments),
            "fetch" => handlers::execute_fetch(&self.ctx, arguments),
            _ => Err(Error::InvalidInput(format!("Unknown tool: {name}"))),
        }
    }
}

/// Definition of an MCP tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// JSON Schema for input validation.
    pub input_schema: Value,
}

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the result represents an error.
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    /// A successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// A soft-failure text result.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// Returns the first text payload, if any. Handy in tests.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|c| match c {
            ToolContent::Text { text } => Some(text.as_str()),
        })
    }
}

/// Content types that can be returned by tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;

    fn registry() -> ToolRegistry {
        let catalog = Arc::new(PromptCatalog::new(Arc::new(MemoryKvStore::new())));
        ToolRegistry::new(ToolContext::new(catalog, &DeckConfig::default()))
    }

    #[test]
    fn test_registry_contains_all_tools() {
        let registry = registry();
        for name in [
            "ping",
            "list_prompts",
            "find_prompts",
            "append_prompt",
            "update_last_used",
            "import_from_sheet",
            "search",
            "fetch",
        ] {
            assert!(registry.get_tool(name).is_some(), "missing tool {name}");
        }
        assert_eq!(registry.list_tools().len(), 8);
    }

    #[test]
    fn test_definitions_have_required_fields() {
        let registry = registry();
        for tool in registry.list_tools() {
            assert!(!tool.name.is_empty());
            assert!(!tool.description.is_empty());
            assert_eq!(tool.input_schema["type"], "object");
        }
    }

    #[test]
    fn test_unknown_tool() {
        let registry = registry();
        let err = registry.execute("no_such_tool", serde_json::json!({}));
        assert!(err.is_err());
    }
}
