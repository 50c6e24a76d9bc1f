//! # Promptdeck
//!
//! A small catalog of reusable prompt templates served over the Model
//! Context Protocol, backed by a pluggable key-value store.
//!
//! Promptdeck keeps prompt records (name, objective, template body, tags,
//! author, dates, notes) addressable by id or by human name, and exposes
//! them to AI agents as MCP tools: list, substring search, upsert,
//! last-used stamping, and Connectors-style `search`/`fetch`.
//!
//! ## Features
//!
//! - Single-binary distribution with stdio and HTTP transports
//! - Pluggable key-value backends (filesystem, in-memory, Redis)
//! - Name-to-id secondary index with normalized lookup
//! - Optional one-shot import from a spreadsheet-backed web endpoint
//!
//! ## Example
//!
//! ```rust
//! use promptdeck::models::PromptDraft;
//! use promptdeck::services::PromptCatalog;
//! use promptdeck::storage::MemoryKvStore;
//! use std::sync::Arc;
//!
//! let catalog = PromptCatalog::new(Arc::new(MemoryKvStore::new()));
//! let id = catalog
//!     .put(PromptDraft {
//!         name: Some("greeting".to_string()),
//!         template: Some("Hello {name}".to_string()),
//!         ..Default::default()
//!     })
//!     .unwrap();
//! assert!(catalog.get_by_id(&id).unwrap().is_some());
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod mcp;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::DeckConfig;
pub use models::{PromptDraft, PromptRecord};
pub use services::{PromptCatalog, SheetImporter, SheetSource};
pub use storage::KvStore;

/// Error type for promptdeck operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - Required tool arguments are missing or malformed
    /// - JSON deserialization fails in tool handlers
    /// - An unknown tool or method is requested
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - The key-value substrate cannot be read or written
    /// - A stored record cannot be parsed
    /// - The sheet endpoint cannot be reached
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Feature not enabled (requires a cargo feature flag).
    #[error("feature not enabled: {0} (compile with --features {0})")]
    FeatureNotEnabled(String),
}

/// Result type alias for promptdeck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current UTC date as an ISO `YYYY-MM-DD` string.
///
/// Record dates carry day precision only; this is the single source for
/// both `created_at` defaults and `last_used_at` stamping.
#[must_use]
pub fn today_stamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
