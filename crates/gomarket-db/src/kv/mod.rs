//! # Durable Key-Value Store
//!
//! The one storage seam the cart depends on.
//!
//! ## Contract
//! - Keys and values are plain strings
//! - A value is readable by `get` once `set` has returned `Ok`
//! - No partial writes: `set` replaces the whole value or fails
//!
//! ## Backends
//! - [`sqlite::SqliteKv`] - `kv_store` table in the app database
//! - [`memory::MemoryKv`] - `HashMap` with switchable failures (tests, dev)

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::DbResult;

/// Asynchronous, string-keyed, string-valued persistent store.
#[async_trait]
pub trait DurableKv: Send + Sync + std::fmt::Debug {
    /// Reads the value under `key`, `None` if absent.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> DbResult<()>;

    /// Deletes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> DbResult<()>;
}
