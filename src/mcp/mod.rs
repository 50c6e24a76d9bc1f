//! MCP server implementation.
//!
//! Exposes the prompt catalog over the Model Context Protocol.
//!
//! ## Tools
//!
//! `ping`, `list_prompts`, `find_prompts`, `append_prompt`,
//! `update_last_used`, `import_from_sheet`, plus the Connectors pair
//! `search` / `fetch`.
//!
//! ## Usage
//!
//! ### Stdio transport (Claude Desktop)
//!
//! ```bash
//! promptdeck serve
//! ```
//!
//! ### HTTP transport
//!
//! ```bash
//! promptdeck serve --transport http --port 3000
//! ```

mod dispatch;
mod server;
mod tools;

pub use server::{McpServer, Transport};
pub use tools::{ToolContent, ToolContext, ToolDefinition, ToolRegistry, ToolResult};
