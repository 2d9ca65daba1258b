//! # Change Ledger
//!
//! Durable set of book ids whose user state was changed by one screen and
//! that other screens must treat as stale.
//!
//! ## Features
//!
//! - **Persisted**: stored under a single key of the local store, so marks
//!   survive a process restart until they are consumed
//! - **Idempotent marks**: an id appears at most once
//! - **Drain semantics**: `consume_changes` returns the whole set and clears it
//! - **Best effort**: storage failures are logged, never propagated
//!
//! ## Precondition
//!
//! The ledger does a read-modify-write without a lock. It relies on the
//! navigation stack keeping at most one screen focused at a time; two
//! writers racing on the same store can lose each other's marks.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use libras::client::local_store::MemoryStore;
//! use libras::client::offline::ChangeLedger;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let ledger = ChangeLedger::new(Arc::new(MemoryStore::new()));
//! ledger.mark_changed(42).await;
//!
//! let changed = ledger.consume_changes().await;
//! assert!(changed.contains(&42));
//! assert!(ledger.consume_changes().await.is_empty());
//! # }
//! ```

use crate::client::local_store::{KeyValueStore, StorageError};
use crate::shared::book::BookId;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Store key holding the serialized id array
pub const LIBRARY_CHANGES_KEY: &str = "library_changed_book_ids";

/// Set of changed book ids
pub type ChangeSet = BTreeSet<BookId>;

/// Persisted set of stale book ids
#[derive(Debug, Clone)]
pub struct ChangeLedger {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl ChangeLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, LIBRARY_CHANGES_KEY)
    }

    /// Ledger persisted under a custom key
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    /// Record that `id` changed.
    ///
    /// A storage failure loses the mark; it is logged and otherwise ignored.
    pub async fn mark_changed(&self, id: BookId) {
        if let Err(e) = self.try_mark_changed(id).await {
            tracing::error!("[LEDGER] Failed to mark book {} as changed: {}", id, e);
        }
    }

    /// Fallible variant of [`mark_changed`](Self::mark_changed)
    pub async fn try_mark_changed(&self, id: BookId) -> Result<(), StorageError> {
        let mut ids = match self.store.get(&self.key).await? {
            Some(raw) => parse_ids(&raw)?,
            None => Vec::new(),
        };

        if ids.contains(&id) {
            return Ok(());
        }
        ids.push(id);

        let raw = serde_json::to_string(&ids)?;
        self.store.set(&self.key, &raw).await?;
        tracing::debug!("[LEDGER] Marked book {} as changed ({} pending)", id, ids.len());
        Ok(())
    }

    /// Return every pending id and clear the ledger.
    ///
    /// Returns an empty set when nothing is pending or the store failed.
    pub async fn consume_changes(&self) -> ChangeSet {
        match self.try_consume_changes().await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("[LEDGER] Failed to consume library changes: {}", e);
                ChangeSet::new()
            }
        }
    }

    /// Fallible variant of [`consume_changes`](Self::consume_changes).
    ///
    /// The key is deleted before the value is decoded, so an unreadable
    /// value is cleared and reported as an error.
    pub async fn try_consume_changes(&self) -> Result<ChangeSet, StorageError> {
        let raw = match self.store.get(&self.key).await? {
            Some(raw) => raw,
            None => return Ok(ChangeSet::new()),
        };
        self.store.remove(&self.key).await?;

        let ids = parse_ids(&raw).inspect_err(|_| {
            tracing::warn!("[LEDGER] Discarded unreadable ledger contents: {:?}", raw);
        })?;
        let set: ChangeSet = ids.into_iter().collect();
        if !set.is_empty() {
            tracing::debug!("[LEDGER] Consumed {} changed book(s)", set.len());
        }
        Ok(set)
    }

    /// Return every pending id without clearing the ledger
    pub async fn peek_changes(&self) -> ChangeSet {
        match self.try_peek_changes().await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("[LEDGER] Failed to read library changes: {}", e);
                ChangeSet::new()
            }
        }
    }

    pub async fn try_peek_changes(&self) -> Result<ChangeSet, StorageError> {
        match self.store.get(&self.key).await? {
            Some(raw) => Ok(parse_ids(&raw)?.into_iter().collect()),
            None => Ok(ChangeSet::new()),
        }
    }
}

fn parse_ids(raw: &str) -> Result<Vec<BookId>, serde_json::Error> {
    serde_json::from_str(raw)
}
