//! Key-value substrate trait and backends.

mod filesystem;
mod memory;
mod redis;

pub use filesystem::FilesystemKvStore;
pub use memory::MemoryKvStore;
pub use redis::RedisKvStore;

use crate::Result;

/// Trait for key-value storage backends.
///
/// Keys are flat strings; logical namespaces are carried as key prefixes
/// (`prompt:{id}`, `name:{normalized}`). Each operation is atomic per key;
/// nothing coordinates across keys.
pub trait KvStore: Send + Sync {
    /// Stores `value` under `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot be written.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Fetches the value stored under `key`.
    ///
    /// An absent key is a valid, non-error outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Enumerates every key starting with `prefix`.
    ///
    /// No ordering is guaranteed; callers impose their own.
    ///
    /// # Errors
    ///
    /// Returns an error if the substrate cannot be enumerated.
    fn keys(&self, prefix: &str) -> Result<Vec<String>>;
}
