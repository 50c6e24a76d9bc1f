//! One-shot bulk import from a spreadsheet-backed web endpoint.
//!
//! The external source is an Apps Script web app that answers a single
//! authenticated POST `{action: "list", secret: ...}` with
//! `{items: [...]}`. Each item is fed through the catalog's upsert path.
//! A failing individual upsert aborts the remaining import; only a
//! malformed or absent JSON body is tolerated (treated as zero items).

use std::time::Duration;

use serde_json::Value;

use crate::models::PromptDraft;
use crate::services::PromptCatalog;
use crate::{Error, Result};

/// Request timeout for the sheet endpoint.
const SHEET_TIMEOUT: Duration = Duration::from_secs(30);

/// A source of raw prompt records to import.
pub trait SheetSource {
    /// Fetches every record the source currently holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached.
    fn list_records(&self) -> Result<Vec<PromptDraft>>;
}

/// HTTP client for an Apps Script web app endpoint.
pub struct AppsScriptClient {
    /// Web app URL.
    url: String,
    /// Shared secret sent with every request.
    secret: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl AppsScriptClient {
    /// Creates a client for the given endpoint and shared secret.
    pub fn new(url: impl Into<String>, secret: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(SHEET_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            url: url.into(),
            secret: secret.into(),
            client,
        }
    }
}

impl SheetSource for AppsScriptClient {
    fn list_records(&self) -> Result<Vec<PromptDraft>> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({
                "action": "list",
                "secret": self.secret,
            }))
            .send()
            .map_err(|e| Error::OperationFailed {
                operation: "sheet_list".to_string(),
                cause: e.to_string(),
            })?;

        // Apps Script deployments answer with text/html content types and
        // occasionally with redirect pages; a body that is not the
        // expected JSON counts as an empty item list.
        let body: Value = response.json().unwrap_or(Value::Null);
        let items = match body.get("items") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };

        Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect())
    }
}

/// Feeds records from a [`SheetSource`] through the catalog's upsert path.
pub struct SheetImporter<'a> {
    /// The destination catalog.
    catalog: &'a PromptCatalog,
}

impl<'a> SheetImporter<'a> {
    /// Creates an importer writing into `catalog`.
    #[must_use]
    pub fn new(catalog: &'a PromptCatalog) -> Self {
        Self { catalog }
    }

    /// Imports every record from `source`, returning the count stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached or any individual
    /// upsert fails; there is no per-item retry or skip.
    pub fn run(&self, source: &dyn SheetSource) -> Result<usize> {
        let mut count = 0;
        for draft in source.list_records()? {
            self.catalog.put(draft)?;
            count += 1;
        }
        tracing::info!(count, "imported prompt records from sheet");
        Ok(count)
    }
}
