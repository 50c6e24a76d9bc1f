//! Prompt record models.
//!
//! A [`PromptRecord`] is the sole entity in the catalog. Callers supply a
//! [`PromptDraft`] (every field optional); the catalog merges it onto
//! documented defaults at upsert time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::today_stamp;

/// A fully-materialized prompt record as stored in the substrate.
///
/// All free-text fields default to the empty string so that records
/// written by older clients (or imported sheet rows) deserialize cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    /// Opaque unique identifier, immutable once assigned.
    pub id: String,
    /// Display name; also the source of the secondary lookup key.
    #[serde(default)]
    pub name: String,
    /// What the prompt is for.
    #[serde(default)]
    pub objective: String,
    /// The template body.
    #[serde(default)]
    pub template: String,
    /// Free-form comma-separated tags.
    #[serde(default)]
    pub tags: String,
    /// Author identifier.
    #[serde(default)]
    pub author: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Creation date, ISO day precision.
    #[serde(default)]
    pub created_at: String,
    /// Last-used date, ISO day precision, or empty if never used.
    #[serde(default)]
    pub last_used_at: String,
}

/// A partially-specified prompt record accepted by the upsert path.
///
/// Unknown fields are tolerated on purpose: imported sheet rows carry
/// extra columns that the catalog ignores.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptDraft {
    /// Explicit id; reuses/overwrites that record when present.
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// What the prompt is for.
    pub objective: Option<String>,
    /// The template body.
    pub template: Option<String>,
    /// Free-form comma-separated tags.
    pub tags: Option<String>,
    /// Author identifier.
    pub author: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation date override.
    pub created_at: Option<String>,
    /// Last-used date override.
    pub last_used_at: Option<String>,
}

impl PromptDraft {
    /// Materializes the draft into a full record under the given id.
    ///
    /// Missing fields take their documented defaults: free text becomes
    /// the empty string and `created_at` becomes today's date.
    #[must_use]
    pub fn into_record(self, id: String) -> PromptRecord {
        PromptRecord {
            id,
            name: self.name.unwrap_or_default(),
            objective: self.objective.unwrap_or_default(),
            template: self.template.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
            created_at: self
                .created_at
                .filter(|d| !d.is_empty())
                .unwrap_or_else(today_stamp),
            last_used_at: self.last_used_at.unwrap_or_default(),
        }
    }
}

/// Normalizes a display name into its index key: trimmed and lowercased.
///
/// Write and read paths must use this identically or the name index
/// silently diverges. An empty or whitespace-only name normalizes to the
/// empty string, which is never indexed.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Mints a fresh record identifier.
///
/// Random UUIDv4; `getrandom` cannot fail at this layer, so there is no
/// weaker fallback scheme.
#[must_use]
pub fn mint_id() -> String {
    Uuid::new_v4().to_string()
}
