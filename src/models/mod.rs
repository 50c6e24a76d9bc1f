//! Domain models.

mod prompt;

pub use prompt::{PromptDraft, PromptRecord, mint_id, normalize_name};
