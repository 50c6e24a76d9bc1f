//! Tool definitions for MCP tools.
//!
//! Contains the JSON Schema definitions for all promptdeck tools.

use super::ToolDefinition;

/// Defines the ping tool.
pub fn ping_tool() -> ToolDefinition {
    ToolDefinition {
        name: "ping".to_string(),
        description: "Health check".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        }),
    }
}

/// Defines the `list_prompts` tool.
pub fn list_prompts_tool() -> ToolDefinition {
    ToolDefinition {
        name: "list_prompts".to_string(),
        description: "List every prompt in the catalog as full records".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        }),
    }
}

/// Defines the `find_prompts` tool.
pub fn find_prompts_tool() -> ToolDefinition {
    ToolDefinition {
        name: "find_prompts".to_string(),
        description: "Filter prompts by substring over name/template/tags".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "q": {
                    "type": "string",
                    "description": "Case-insensitive substring to match"
                }
            },
            "required": ["q"]
        }),
    }
}

/// Defines the `append_prompt` tool.
pub fn append_prompt_tool() -> ToolDefinition {
    ToolDefinition {
        name: "append_prompt".to_string(),
        description: "Insert or update a prompt record".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Display name" },
                "objective": { "type": "string", "description": "What the prompt is for" },
                "template": { "type": "string", "description": "Template body" },
                "tags": { "type": "string", "description": "Comma-separated tags" },
                "author": { "type": "string", "description": "Author identifier" },
                "notes": { "type": "string", "description": "Free-form notes" }
            },
            "required": ["name", "template"]
        }),
    }
}

/// Defines the `update_last_used` tool.
pub fn update_last_used_tool() -> ToolDefinition {
    ToolDefinition {
        name: "update_last_used".to_string(),
        description: "Stamp a prompt's last-used date, addressed by id or name".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "id": { "type": "string", "description": "Record id" },
                "name": { "type": "string", "description": "Display name (resolved via the name index)" }
            },
            "required": []
        }),
    }
}

/// Defines the `import_from_sheet` tool.
pub fn import_from_sheet_tool() -> ToolDefinition {
    ToolDefinition {
        name: "import_from_sheet".to_string(),
        description: "One-shot import of prompt rows from the configured sheet endpoint"
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        }),
    }
}

/// Defines the Connectors search tool.
pub fn search_tool() -> ToolDefinition {
    ToolDefinition {
        name: "search".to_string(),
        description: "Search prompts (Connectors shape: {results: [{id, title, url}]})"
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Case-insensitive substring to match"
                }
            },
            "required": ["query"]
        }),
    }
}

/// Defines the Connectors fetch tool.
pub fn fetch_tool() -> ToolDefinition {
    ToolDefinition {
        name: "fetch".to_string(),
        description: "Fetch one prompt by id (Connectors shape: {id, title, text, url, metadata})"
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "id": { "type": "string", "description": "Record id" }
            },
            "required": ["id"]
        }),
    }
}
