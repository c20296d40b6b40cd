//! Key-value persistence layer.
//!
//! The domain store persists whole collections as JSON strings under fixed
//! keys. The backend contract is deliberately minimal: `get`/`set` over string
//! values, no transactions, no atomicity across keys.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

/// Storage backend errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String key-value store.
pub trait KvStore {
    /// Read the value under `key`, `None` when the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}
