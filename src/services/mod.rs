//! Catalog and import services.

mod catalog;
mod import;

pub use catalog::PromptCatalog;
pub use import::{AppsScriptClient, SheetImporter, SheetSource};
