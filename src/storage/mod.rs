//! Storage backends.
//!
//! The catalog sits on a deliberately small key-value substrate: atomic
//! per-key put/get plus prefix enumeration, and nothing else. There is no
//! cross-key transaction; callers that write related keys accept the gap.

pub mod kv;

pub use kv::{FilesystemKvStore, KvStore, MemoryKvStore, RedisKvStore};
