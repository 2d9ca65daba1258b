//! # Library Sync
//!
//! Lets screens learn that a book's user state changed somewhere else, and
//! lets the book details screen show edits before the server confirms them.
//!
//! ## Architecture
//!
//! - **Change Ledger**: persisted set of changed book ids, drained by
//!   whichever screen regains focus next
//! - **Optimistic Edits**: per-screen draft of one book's user fields,
//!   committed once when the screen is left
//! - **Reconciliation**: focus-time decision whether cached data is stale
//!
//! ## Key Components
//!
//! - `ledger.rs`: durable changed-id set
//! - `optimistic.rs`: edit buffer and detached commit
//! - `reconciliation.rs`: refetch policy
//!
//! ## Usage
//!
//! ```rust,no_run
//! use libras::client::local_store::MemoryStore;
//! use libras::client::offline::{ChangeLedger, ReconciliationPolicy};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let ledger = ChangeLedger::new(Arc::new(MemoryStore::new()));
//! let policy = ReconciliationPolicy::new(ledger.clone());
//!
//! // Book details screen toggled book 42 in the library
//! ledger.mark_changed(42).await;
//!
//! // Discover screen regains focus with data already cached
//! assert!(policy.on_focus(true).await.should_refetch());
//! # }
//! ```

pub mod ledger;
pub mod optimistic;
pub mod reconciliation;

// Re-export main types
pub use ledger::{ChangeLedger, ChangeSet, LIBRARY_CHANGES_KEY};
pub use optimistic::{
    spawn_detached_commit, CommitOutcome, EditBuffer, EditError, EditField, EditState, FieldEdit,
    OptimisticEdit, PendingCommit,
};
pub use reconciliation::{FocusDecision, RefetchReason, ReconciliationPolicy};
