//! The prompt catalog: record storage plus the name index.
//!
//! Records live under the `prompt:` key namespace as JSON; a secondary
//! index under `name:` maps each normalized display name to one record id.
//! The two writes in [`PromptCatalog::put`] are independent per-key
//! operations with no atomicity between them; a crash in between can leave
//! the index pointing at a stale record. Accepted risk for this substrate.

use std::sync::Arc;

use crate::models::{PromptDraft, PromptRecord, mint_id, normalize_name};
use crate::storage::KvStore;
use crate::{Error, Result, today_stamp};

/// Key prefix for records keyed by id.
const RECORD_PREFIX: &str = "prompt:";

/// Key prefix for the name-to-id index.
const NAME_PREFIX: &str = "name:";

/// Durable mapping from id to prompt record, with name-based lookup.
pub struct PromptCatalog {
    /// The key-value substrate.
    kv: Arc<dyn KvStore>,
}

impl PromptCatalog {
    /// Creates a catalog over the given substrate.
    #[must_use]
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Upserts a record, returning its resolved id.
    ///
    /// A draft with an explicit non-empty id reuses (and fully replaces)
    /// that record; otherwise a fresh id is minted. Missing fields take
    /// their documented defaults. When the normalized name is non-empty,
    /// the name index entry is overwritten to point at this id (last
    /// writer wins; no uniqueness conflict).
    ///
    /// # Errors
    ///
    /// Returns an error only if the substrate cannot be written.
    pub fn put(&self, draft: PromptDraft) -> Result<String> {
        let id = draft
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(mint_id);
        let record = draft.into_record(id.clone());
        let norm = normalize_name(&record.name);

        let json = serde_json::to_string(&record).map_err(|e| Error::OperationFailed {
            operation: "serialize_record".to_string(),
            cause: e.to_string(),
        })?;
        self.kv.put(&format!("{RECORD_PREFIX}{id}"), &json)?;

        if !norm.is_empty() {
            self.kv.put(&format!("{NAME_PREFIX}{norm}"), &id)?;
        }

        tracing::debug!(id = %id, name = %record.name, "stored prompt record");
        Ok(id)
    }

    /// Fetches a record by id. Absent is a valid, non-error outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot be read or the stored
    /// JSON cannot be parsed.
    pub fn get_by_id(&self, id: &str) -> Result<Option<PromptRecord>> {
        match self.kv.get(&format!("{RECORD_PREFIX}{id}"))? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| Error::OperationFailed {
                    operation: "parse_record".to_string(),
                    cause: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Resolves a display name to a record id through the name index.
    ///
    /// The query is normalized exactly like the write path, so case and
    /// surrounding whitespace do not matter. An empty name never resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot be read.
    pub fn id_by_name(&self, name: &str) -> Result<Option<String>> {
        let norm = normalize_name(name);
        if norm.is_empty() {
            return Ok(None);
        }
        self.kv.get(&format!("{NAME_PREFIX}{norm}"))
    }

    /// Returns every record, sorted ascending by name.
    ///
    /// This is the canonical read-everything primitive; search filters its
    /// output since the substrate has no native text index. Entries whose
    /// value disappeared between enumeration and fetch are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot be enumerated or read, or
    /// if a stored record cannot be parsed.
    pub fn list(&self) -> Result<Vec<PromptRecord>> {
        let mut records = Vec::new();

        for key in self.kv.keys(RECORD_PREFIX)? {
            let Some(raw) = self.kv.get(&key)? else {
                continue;
            };
            let record: PromptRecord =
                serde_json::from_str(&raw).map_err(|e| Error::OperationFailed {
                    operation: "parse_record".to_string(),
                    cause: e.to_string(),
                })?;
            records.push(record);
        }

        // Case-insensitive ascending by name; equal names keep whatever
        // relative order the enumeration produced.
        records.sort_by_key(|r| r.name.to_lowercase());
        Ok(records)
    }

    /// Case-insensitive substring search over name, template, and tags.
    ///
    /// OR across the three fields; an empty query matches everything.
    /// Preserves the name-sorted order of [`PromptCatalog::list`].
    ///
    /// # Errors
    ///
    /// Propagates any [`PromptCatalog::list`] failure.
    pub fn search(&self, query: &str) -> Result<Vec<PromptRecord>> {
        let q = query.to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&q)
                    || r.template.to_lowercase().contains(&q)
                    || r.tags.to_lowercase().contains(&q)
            })
            .collect())
    }

    /// Stamps `last_used_at` with today's date on the record with this id.
    ///
    /// Returns the updated record, or `None` if the id is unknown (the
    /// store is left untouched in that case). Only the record key is
    /// rewritten; the name index is not revisited.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot be read or written.
    pub fn mark_used(&self, id: &str) -> Result<Option<PromptRecord>> {
        let Some(mut record) = self.get_by_id(id)? else {
            return Ok(None);
        };

        record.last_used_at = today_stamp();

        let json = serde_json::to_string(&record).map_err(|e| Error::OperationFailed {
            operation: "serialize_record".to_string(),
            cause: e.to_string(),
        })?;
        self.kv.put(&format!("{RECORD_PREFIX}{id}"), &json)?;

        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;

    fn catalog() -> PromptCatalog {
        PromptCatalog::new(Arc::new(MemoryKvStore::new()))
    }

    fn draft(name: &str, template: &str) -> PromptDraft {
        PromptDraft {
            name: Some(name.to_string()),
            template: Some(template.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_put_then_get_merges_defaults() {
        let catalog = catalog();
        let id = catalog.put(draft("Greeting", "Hello {name}")).unwrap();

        let record = catalog.get_by_id(&id).unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.name, "Greeting");
        assert_eq!(record.template, "Hello {name}");
        assert_eq!(record.objective, "");
        assert_eq!(record.created_at, today_stamp());
        assert_eq!(record.last_used_at, "");
    }

    #[test]
    fn test_name_index_normalization_invariance() {
        let catalog = catalog();
        let id = catalog.put(draft("Greeting", "Hello {name}")).unwrap();

        assert_eq!(catalog.id_by_name("greeting").unwrap(), Some(id.clone()));
        assert_eq!(catalog.id_by_name("  GREETING ").unwrap(), Some(id.clone()));
        assert_eq!(catalog.id_by_name("GrEeTiNg").unwrap(), Some(id));
        assert_eq!(catalog.id_by_name("other").unwrap(), None);
        assert_eq!(catalog.id_by_name("   ").unwrap(), None);
    }

    #[test]
    fn test_nameless_record_is_not_indexed() {
        let catalog = catalog();
        let id = catalog
            .put(PromptDraft {
                template: Some("body".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert!(catalog.get_by_id(&id).unwrap().is_some());
        assert_eq!(catalog.id_by_name("").unwrap(), None);
    }

    #[test]
    fn test_last_writer_wins_on_name() {
        let catalog = catalog();
        let first = catalog.put(draft("dup", "one")).unwrap();
        let second = catalog.put(draft(" DUP ", "two")).unwrap();

        assert_ne!(first, second);
        assert_eq!(catalog.id_by_name("dup").unwrap(), Some(second));
        // The first record itself is still retrievable by id.
        assert_eq!(catalog.get_by_id(&first).unwrap().unwrap().template, "one");
    }

    #[test]
    fn test_upsert_idempotence() {
        let catalog = catalog();
        let mut d = draft("stable", "body");
        d.id = Some("fixed-id".to_string());
        d.created_at = Some("2024-01-01".to_string());

        let first = catalog.put(d.clone()).unwrap();
        let snapshot = catalog.get_by_id("fixed-id").unwrap();
        let second = catalog.put(d).unwrap();

        assert_eq!(first, "fixed-id");
        assert_eq!(second, "fixed-id");
        assert_eq!(catalog.get_by_id("fixed-id").unwrap(), snapshot);
        assert_eq!(catalog.list().unwrap().len(), 1);
    }

    #[test]
    fn test_explicit_id_replaces_record() {
        let catalog = catalog();
        let id = catalog.put(draft("v1", "old")).unwrap();

        let mut update = draft("v1", "new");
        update.id = Some(id.clone());
        catalog.put(update).unwrap();

        let record = catalog.get_by_id(&id).unwrap().unwrap();
        assert_eq!(record.template, "new");
        assert_eq!(catalog.list().unwrap().len(), 1);
    }

    #[test]
    fn test_list_empty_and_sorted() {
        let catalog = catalog();
        assert!(catalog.list().unwrap().is_empty());

        catalog.put(draft("banana", "b")).unwrap();
        catalog.put(draft("Apple", "a")).unwrap();
        catalog.put(draft("cherry", "c")).unwrap();

        let names: Vec<String> = catalog.list().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_search_is_filtered_list() {
        let catalog = catalog();
        catalog.put(draft("alpha", "uses WIDGET heavily")).unwrap();
        let mut tagged = draft("beta", "plain");
        tagged.tags = Some("widget,daily".to_string());
        catalog.put(tagged).unwrap();
        catalog.put(draft("Widget helper", "plain")).unwrap();
        catalog.put(draft("unrelated", "nothing")).unwrap();

        let hits: Vec<String> = catalog
            .search("widget")
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        // Name, template, and tags all match; order follows list().
        assert_eq!(hits, vec!["alpha", "beta", "Widget helper"]);

        assert!(catalog.search("zzz-no-match").unwrap().is_empty());
        assert_eq!(catalog.search("").unwrap().len(), 4);
    }

    #[test]
    fn test_mark_used_unknown_id() {
        let catalog = catalog();
        catalog.put(draft("only", "body")).unwrap();

        let before = catalog.list().unwrap();
        assert!(catalog.mark_used("no-such-id").unwrap().is_none());
        assert_eq!(catalog.list().unwrap(), before);
    }

    #[test]
    fn test_mark_used_touches_only_last_used_at() {
        let catalog = catalog();
        let mut d = draft("used", "body");
        d.created_at = Some("2020-05-05".to_string());
        let id = catalog.put(d).unwrap();
        let before = catalog.get_by_id(&id).unwrap().unwrap();

        let updated = catalog.mark_used(&id).unwrap().unwrap();
        assert_eq!(updated.last_used_at, today_stamp());
        assert_eq!(
            PromptRecord {
                last_used_at: String::new(),
                ..updated.clone()
            },
            before
        );
        // Persisted too, not just returned.
        assert_eq!(catalog.get_by_id(&id).unwrap().unwrap(), updated);
    }
}
