//! MCP tool-surface end-to-end tests.
//!
//! Exercises the tool registry the way an MCP client would, focusing on:
//! - Tool registration and discovery
//! - Full catalog workflows (append → find → stamp → fetch)
//! - Soft-failure envelopes for validation and not-found outcomes
//! - Connectors `search`/`fetch` payload shapes

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;

use serde_json::{Value, json};

use promptdeck::config::DeckConfig;
use promptdeck::mcp::{ToolContext, ToolRegistry, ToolResult};
use promptdeck::services::PromptCatalog;
use promptdeck::storage::MemoryKvStore;

fn registry() -> ToolRegistry {
    registry_with_config(&DeckConfig::default())
}

fn registry_with_config(config: &DeckConfig) -> ToolRegistry {
    let catalog = Arc::new(PromptCatalog::new(Arc::new(MemoryKvStore::new())));
    ToolRegistry::new(ToolContext::new(catalog, config))
}

fn text_of(result: &ToolResult) -> &str {
    result.first_text().expect("tool returned no text content")
}

// ============================================================================
// Tool Registry Tests
// ============================================================================

mod tool_registry {
    use super::*;

    #[test]
    fn test_registry_contains_all_tools() {
        let registry = registry();

        assert!(registry.get_tool("ping").is_some());
        assert!(registry.get_tool("list_prompts").is_some());
        assert!(registry.get_tool("find_prompts").is_some());
        assert!(registry.get_tool("append_prompt").is_some());
        assert!(registry.get_tool("update_last_used").is_some());
        assert!(registry.get_tool("import_from_sheet").is_some());
        assert!(registry.get_tool("search").is_some());
        assert!(registry.get_tool("fetch").is_some());

        assert_eq!(registry.list_tools().len(), 8);
    }

    #[test]
    fn test_tool_definitions_have_object_schemas() {
        let registry = registry();

        for tool in registry.list_tools() {
            assert!(!tool.name.is_empty());
            assert!(!tool.description.is_empty());
            assert_eq!(
                tool.input_schema["type"], "object",
                "schema for {} is not an object",
                tool.name
            );
            assert!(tool.input_schema["required"].is_array());
        }
    }

    #[test]
    fn test_required_fields_match_handlers() {
        let registry = registry();

        let append = registry.get_tool("append_prompt").unwrap();
        let required: Vec<&str> = append.input_schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(required, vec!["name", "template"]);

        let update = registry.get_tool("update_last_used").unwrap();
        assert!(
            update.input_schema["required"].as_array().unwrap().is_empty(),
            "id and name are alternatives, neither is required"
        );
    }
}

// ============================================================================
// Catalog Workflow Tests
// ============================================================================

mod workflows {
    use super::*;

    #[test]
    fn test_append_find_stamp_fetch_roundtrip() {
        let registry = registry();

        // Append a record.
        let appended = registry
            .execute(
                "append_prompt",
                json!({
                    "name": "Greeting",
                    "objective": "Say hello",
                    "template": "Hello {name}, welcome to {place}",
                    "tags": "daily,social"
                }),
            )
            .unwrap();
        assert!(!appended.is_error);
        let id = text_of(&appended)
            .strip_prefix("OK - id ")
            .expect("append payload shape")
            .to_string();

        // It shows up in a substring search.
        let found = registry
            .execute("find_prompts", json!({"q": "welcome"}))
            .unwrap();
        let hits: Vec<Value> = serde_json::from_str(text_of(&found)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["id"], id.as_str());

        // Stamp it by normalized name.
        let stamped = registry
            .execute("update_last_used", json!({"name": "  greeting "}))
            .unwrap();
        assert!(!stamped.is_error);
        assert_eq!(text_of(&stamped), "OK");

        // Fetch reflects the stamp.
        let fetched = registry.execute("fetch", json!({"id": id})).unwrap();
        let payload: Value = serde_json::from_str(text_of(&fetched)).unwrap();
        assert_eq!(payload["title"], "Greeting");
        assert_ne!(payload["metadata"]["last_used_at"], "");
    }

    #[test]
    fn test_append_twice_same_name_keeps_one_index_entry() {
        let registry = registry();

        registry
            .execute(
                "append_prompt",
                json!({"name": "Greeting", "template": "v1"}),
            )
            .unwrap();
        let second = registry
            .execute(
                "append_prompt",
                json!({"name": "Greeting", "template": "v2"}),
            )
            .unwrap();
        let id2 = text_of(&second).strip_prefix("OK - id ").unwrap();

        // Two records exist; the name resolves to the latest writer.
        let listed = registry.execute("list_prompts", json!({})).unwrap();
        let records: Vec<Value> = serde_json::from_str(text_of(&listed)).unwrap();
        assert_eq!(records.len(), 2);

        let stamped = registry
            .execute("update_last_used", json!({"name": "greeting"}))
            .unwrap();
        assert!(!stamped.is_error);

        let fetched = registry.execute("fetch", json!({"id": id2})).unwrap();
        let payload: Value = serde_json::from_str(text_of(&fetched)).unwrap();
        assert_ne!(payload["metadata"]["last_used_at"], "");
    }

    #[test]
    fn test_list_is_sorted_case_insensitively() {
        let registry = registry();
        for name in ["banana", "Apple", "cherry"] {
            registry
                .execute("append_prompt", json!({"name": name, "template": "t"}))
                .unwrap();
        }

        let listed = registry.execute("list_prompts", json!({})).unwrap();
        let records: Vec<Value> = serde_json::from_str(text_of(&listed)).unwrap();
        let names: Vec<&str> = records.iter().filter_map(|r| r["name"].as_str()).collect();
        assert_eq!(names, vec!["Apple", "banana", "cherry"]);
    }
}

// ============================================================================
// Soft-Failure Envelope Tests
// ============================================================================

mod soft_failures {
    use super::*;

    #[test]
    fn test_append_missing_fields() {
        let registry = registry();
        let result = registry
            .execute("append_prompt", json!({"objective": "x"}))
            .unwrap();

        assert!(result.is_error);
        assert!(text_of(&result).starts_with("Error: missing required field"));
    }

    #[test]
    fn test_update_last_used_unknown_id() {
        let registry = registry();
        let result = registry
            .execute("update_last_used", json!({"id": "does-not-exist"}))
            .unwrap();

        assert!(result.is_error);
        assert_eq!(text_of(&result), "Error: not found");
    }

    #[test]
    fn test_update_last_used_no_selector() {
        let registry = registry();
        let result = registry.execute("update_last_used", json!({})).unwrap();

        assert!(result.is_error);
        assert_eq!(text_of(&result), "Error: missing id or name");
    }

    #[test]
    fn test_import_unconfigured() {
        let registry = registry();
        let result = registry.execute("import_from_sheet", json!({})).unwrap();

        assert!(result.is_error);
        assert!(text_of(&result).contains("not configured"));
    }

    #[test]
    fn test_unknown_tool_is_hard_error() {
        let registry = registry();
        assert!(registry.execute("no_such_tool", json!({})).is_err());
    }
}

// ============================================================================
// Connectors Shape Tests
// ============================================================================

mod connectors {
    use super::*;

    #[test]
    fn test_search_uses_public_url_for_deep_links() {
        let config = DeckConfig {
            public_url: "https://prompts.example.com/".to_string(),
            ..DeckConfig::default()
        };
        let registry = registry_with_config(&config);

        let appended = registry
            .execute(
                "append_prompt",
                json!({"name": "Greeting", "template": "hi"}),
            )
            .unwrap();
        let id = text_of(&appended).strip_prefix("OK - id ").unwrap();

        let result = registry
            .execute("search", json!({"query": "greeting"}))
            .unwrap();
        let payload: Value = serde_json::from_str(text_of(&result)).unwrap();
        let results = payload["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0]["url"],
            format!("https://prompts.example.com/#prompt-{id}")
        );
    }

    #[test]
    fn test_search_no_match_returns_empty_results() {
        let registry = registry();
        let result = registry
            .execute("search", json!({"query": "zzz"}))
            .unwrap();
        let payload: Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(payload, json!({"results": []}));
    }

    #[test]
    fn test_fetch_unknown_id_returns_error_payload() {
        let registry = registry();
        let result = registry.execute("fetch", json!({"id": "ghost"})).unwrap();

        assert!(!result.is_error, "not-found fetch is a normal payload");
        let payload: Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(payload, json!({"error": "not found", "id": "ghost"}));
    }

    #[test]
    fn test_fetch_metadata_fields() {
        let registry = registry();
        let appended = registry
            .execute(
                "append_prompt",
                json!({
                    "name": "review",
                    "objective": "review code",
                    "template": "Look at {diff}",
                    "tags": "code",
                    "author": "sam",
                    "notes": "weekly"
                }),
            )
            .unwrap();
        let id = text_of(&appended).strip_prefix("OK - id ").unwrap();

        let result = registry.execute("fetch", json!({"id": id})).unwrap();
        let payload: Value = serde_json::from_str(text_of(&result)).unwrap();

        assert_eq!(payload["text"], "Look at {diff}");
        let metadata = &payload["metadata"];
        assert_eq!(metadata["objective"], "review code");
        assert_eq!(metadata["tags"], "code");
        assert_eq!(metadata["author"], "sam");
        assert_eq!(metadata["notes"], "weekly");
        assert_ne!(metadata["created_at"], "");
        assert_eq!(metadata["last_used_at"], "");
    }
}
