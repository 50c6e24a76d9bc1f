//! Tool execution handlers.
//!
//! Every handler returns a textual payload inside a normal result
//! envelope; validation and not-found outcomes set `is_error` rather than
//! surfacing as protocol errors, so a calling agent always gets something
//! parseable back.

use serde::Deserialize;
use serde_json::Value;

use crate::models::PromptDraft;
use crate::services::{AppsScriptClient, SheetImporter};
use crate::{Error, Result};

use super::{ToolContext, ToolResult};

/// Maximum number of Connectors search results.
const SEARCH_RESULT_LIMIT: usize = 25;

/// Title shown for records with an empty name.
const UNNAMED_TITLE: &str = "(unnamed)";

/// Arguments for the `find_prompts` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FindPromptsArgs {
    /// Substring to match.
    q: String,
}

/// Arguments for the `append_prompt` tool.
///
/// Required fields are modeled as options so missing ones produce the
/// documented `Error: ...` payload instead of a deserialization error.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AppendPromptArgs {
    name: Option<String>,
    objective: Option<String>,
    template: Option<String>,
    tags: Option<String>,
    author: Option<String>,
    notes: Option<String>,
}

/// Arguments for the `update_last_used` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateLastUsedArgs {
    id: Option<String>,
    name: Option<String>,
}

/// Arguments for the Connectors search tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchArgs {
    query: String,
}

/// Arguments for the Connectors fetch tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FetchArgs {
    id: String,
}

/// Builds the deep-link URL for a record id.
fn deep_link(ctx: &ToolContext, id: &str) -> String {
    format!("{}/#prompt-{id}", ctx.public_url.trim_end_matches('/'))
}

/// Display title for a record name.
fn title_for(name: &str) -> String {
    if name.is_empty() {
        UNNAMED_TITLE.to_string()
    } else {
        name.to_string()
    }
}

/// Executes the ping tool.
pub fn execute_ping(_ctx: &ToolContext, _arguments: Value) -> Result<ToolResult> {
    Ok(ToolResult::text("pong"))
}

/// Executes the `list_prompts` tool.
pub fn execute_list_prompts(ctx: &ToolContext, _arguments: Value) -> Result<ToolResult> {
    let records = ctx.catalog.list()?;
    let json =
        serde_json::to_string_pretty(&records).map_err(|e| Error::OperationFailed {
            operation: "serialize_records".to_string(),
            cause: e.to_string(),
        })?;
    Ok(ToolResult::text(json))
}

/// Executes the `find_prompts` tool.
pub fn execute_find_prompts(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: FindPromptsArgs =
        serde_json::from_value(arguments).map_err(|e| Error::InvalidInput(e.to_string()))?;

    let projections: Vec<Value> = ctx
        .catalog
        .search(&args.q)?
        .into_iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id,
                "name": r.name,
                "objective": r.objective,
                "tags": r.tags,
            })
        })
        .collect();

    let json = serde_json::to_string_pretty(&projections).map_err(|e| {
        Error::OperationFailed {
            operation: "serialize_projections".to_string(),
            cause: e.to_string(),
        }
    })?;
    Ok(ToolResult::text(json))
}

/// Executes the `append_prompt` tool.
pub fn execute_append_prompt(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: AppendPromptArgs =
        serde_json::from_value(arguments).map_err(|e| Error::InvalidInput(e.to_string()))?;

    let mut missing = Vec::new();
    if args.name.as_deref().is_none_or(str::is_empty) {
        missing.push("name");
    }
    if args.template.as_deref().is_none_or(str::is_empty) {
        missing.push("template");
    }
    if !missing.is_empty() {
        return Ok(ToolResult::error(format!(
            "Error: missing required field(s): {}",
            missing.join(", ")
        )));
    }

    let id = ctx.catalog.put(PromptDraft {
        name: args.name,
        objective: args.objective,
        template: args.template,
        tags: args.tags,
        author: args.author,
        notes: args.notes,
        ..Default::default()
    })?;

    Ok(ToolResult::text(format!("OK - id {id}")))
}

/// Executes the `update_last_used` tool.
pub fn execute_update_last_used(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: UpdateLastUsedArgs =
        serde_json::from_value(arguments).map_err(|e| Error::InvalidInput(e.to_string()))?;

    let mut id = args.id.filter(|id| !id.is_empty());
    if id.is_none()
        && let Some(name) = args.name.as_deref()
    {
        id = ctx.catalog.id_by_name(name)?;
    }
    let Some(id) = id else {
        return Ok(ToolResult::error("Error: missing id or name"));
    };

    match ctx.catalog.mark_used(&id)? {
        Some(_) => Ok(ToolResult::text("OK")),
        None => Ok(ToolResult::error("Error: not found")),
    }
}

/// Executes the `import_from_sheet` tool.
pub fn execute_import_from_sheet(ctx: &ToolContext, _arguments: Value) -> Result<ToolResult> {
    let (Some(url), Some(secret)) = (ctx.sheet_url.as_deref(), ctx.shared_secret.as_deref())
    else {
        return Ok(ToolResult::error(
            "Error: sheet_url / shared_secret not configured",
        ));
    };

    let client = AppsScriptClient::new(url, secret);
    let count = SheetImporter::new(&ctx.catalog).run(&client)?;
    Ok(ToolResult::text(format!(
        "Imported {count} items from sheet"
    )))
}

/// Executes the Connectors search tool.
pub fn execute_search(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: SearchArgs =
        serde_json::from_value(arguments).map_err(|e| Error::InvalidInput(e.to_string()))?;

    let results: Vec<Value> = ctx
        .catalog
        .search(&args.query)?
        .into_iter()
        .take(SEARCH_RESULT_LIMIT)
        .map(|r| {
            serde_json::json!({
                "id": r.id,
                "title": title_for(&r.name),
                "url": deep_link(ctx, &r.id),
            })
        })
        .collect();

    let json = serde_json::to_string(&serde_json::json!({ "results": results })).map_err(|e| {
        Error::OperationFailed {
            operation: "serialize_search_results".to_string(),
            cause: e.to_string(),
        }
    })?;
    Ok(ToolResult::text(json))
}

/// Executes the Connectors fetch tool.
pub fn execute_fetch(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: FetchArgs =
        serde_json::from_value(arguments).map_err(|e| Error::InvalidInput(e.to_string()))?;

    let payload = match ctx.catalog.get_by_id(&args.id)? {
        Some(record) => serde_json::json!({
            "id": record.id,
            "title": title_for(&record.name),
            "text": record.template,
            "url": deep_link(ctx, &record.id),
            "metadata": {
                "objective": record.objective,
                "tags": record.tags,
                "author": record.author,
                "created_at": record.created_at,
                "last_used_at": record.last_used_at,
                "notes": record.notes,
            }
        }),
        None => serde_json::json!({ "error": "not found", "id": args.id }),
    };

    let json = serde_json::to_string(&payload).map_err(|e| Error::OperationFailed {
        operation: "serialize_fetch_payload".to_string(),
        cause: e.to_string(),
    })?;
    Ok(ToolResult::text(json))
}
