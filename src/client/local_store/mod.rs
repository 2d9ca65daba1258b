//! # Local Key-Value Store
//!
//! Durable string key/value storage shared by every screen of the client.
//! The change ledger and the session token both live here.
//!
//! ## Key Components
//!
//! - `KeyValueStore`: async trait every backend implements
//! - `sqlite.rs`: SQLite-backed store that survives process restarts
//! - `memory.rs`: in-process store for tests and ephemeral sessions
//!
//! ## Semantics
//!
//! - `get` returns `None` for a key that was never written (or was removed)
//! - `set` replaces the whole value
//! - `remove` on a missing key is not an error
//!
//! ## Usage
//!
//! ```rust,no_run
//! use libras::client::local_store::{KeyValueStore, SqliteStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::open("/tmp/libras/local.db").await?;
//! store.set("greeting", "hello").await?;
//! assert_eq!(store.get("greeting").await?.as_deref(), Some("hello"));
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

/// Result type for local store operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors raised by a key-value backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Persisted string key-value store.
///
/// Writes are whole-value replacements; there is no transaction spanning a
/// read and a subsequent write.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`
    async fn remove(&self, key: &str) -> Result<()>;
}
