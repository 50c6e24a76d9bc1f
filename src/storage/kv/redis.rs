//! Redis key-value backend.
//!
//! Plain string keys, `SET`/`GET`/`SCAN`; no server-side search features
//! are required, so any Redis works.

#[cfg(feature = "redis")]
mod implementation {
    use redis::{Client, Commands, Connection};

    use crate::storage::kv::KvStore;
    use crate::{Error, Result};

    /// Redis-backed key-value store.
    pub struct RedisKvStore {
        /// Redis client.
        client: Client,
    }

    impl RedisKvStore {
        /// Creates a new Redis store.
        ///
        /// # Errors
        ///
        /// Returns an error if the connection URL is invalid.
        pub fn new(connection_url: &str) -> Result<Self> {
            let client = Client::open(connection_url).map_err(|e| Error::OperationFailed {
                operation: "redis_connect".to_string(),
                cause: e.to_string(),
            })?;

            Ok(Self { client })
        }

        /// Creates a store with default settings.
        ///
        /// # Errors
        ///
        /// Returns an error if the connection URL is invalid.
        pub fn with_defaults() -> Result<Self> {
            Self::new("redis://localhost:6379")
        }

        /// Gets a connection from the client.
        fn get_connection(&self) -> Result<Connection> {
            self.client
                .get_connection()
                .map_err(|e| Error::OperationFailed {
                    operation: "redis_get_connection".to_string(),
                    cause: e.to_string(),
                })
        }
    }

    impl KvStore for RedisKvStore {
        fn put(&self, key: &str, value: &str) -> Result<()> {
            let mut conn = self.get_connection()?;
            let _: () = conn.set(key, value).map_err(|e| Error::OperationFailed {
                operation: "redis_put".to_string(),
                cause: e.to_string(),
            })?;
            Ok(())
        }

        fn get(&self, key: &str) -> Result<Option<String>> {
            let mut conn = self.get_connection()?;
            conn.get(key).map_err(|e| Error::OperationFailed {
                operation: "redis_get".to_string(),
                cause: e.to_string(),
            })
        }

        fn keys(&self, prefix: &str) -> Result<Vec<String>> {
            let mut conn = self.get_connection()?;
            let pattern = format!("{}*", prefix.replace('*', "\\*"));
            let mut keys = Vec::new();

            let iter: redis::Iter<'_, String> = redis::cmd("SCAN")
                .cursor_arg(0)
                .arg("MATCH")
                .arg(&pattern)
                .clone()
                .iter(&mut conn)
                .map_err(|e| Error::OperationFailed {
                    operation: "redis_keys".to_string(),
                    cause: e.to_string(),
                })?;
            for key in iter {
                keys.push(key);
            }

            Ok(keys)
        }
    }
}

#[cfg(feature = "redis")]
pub use implementation::RedisKvStore;

#[cfg(not(feature = "redis"))]
mod stub {
    use crate::storage::kv::KvStore;
    use crate::{Error, Result};

    /// Stub Redis store when the feature is not enabled.
    pub struct RedisKvStore;

    impl RedisKvStore {
        /// Creates a new Redis store (stub).
        ///
        /// # Errors
        ///
        /// Always returns an error because the feature is not enabled.
        pub fn new(_connection_url: &str) -> Result<Self> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }

        /// Creates a store with default settings (stub).
        ///
        /// # Errors
        ///
        /// Always returns an error because the feature is not enabled.
        pub fn with_defaults() -> Result<Self> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }
    }

    impl KvStore for RedisKvStore {
        fn put(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }

        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }

        fn keys(&self, _prefix: &str) -> Result<Vec<String>> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }
    }
}

#[cfg(not(feature = "redis"))]
pub use stub::RedisKvStore;
