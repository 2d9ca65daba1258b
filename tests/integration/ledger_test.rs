//! Change ledger against real storage backends

use crate::common::FailingStore;
use libras::client::local_store::{KeyValueStore, SqliteStore};
use libras::client::offline::{ChangeLedger, ChangeSet, ReconciliationPolicy, RefetchReason, FocusDecision};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[tokio::test]
async fn test_marks_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local.db");

    {
        let store = Arc::new(SqliteStore::open(&path).await.unwrap());
        let ledger = ChangeLedger::new(store.clone());
        ledger.mark_changed(5).await;
        ledger.mark_changed(7).await;
        store.close().await;
    }

    let store = Arc::new(SqliteStore::open(&path).await.unwrap());
    let ledger = ChangeLedger::new(store);
    assert_eq!(ledger.peek_changes().await, ChangeSet::from([5, 7]));
    assert_eq!(ledger.consume_changes().await, ChangeSet::from([5, 7]));
    assert!(ledger.consume_changes().await.is_empty());
}

#[tokio::test]
async fn test_sqlite_ledger_is_stored_as_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteStore::open(dir.path().join("local.db")).await.unwrap());
    let ledger = ChangeLedger::new(store.clone());

    for id in [5, 7, 5, 9] {
        ledger.mark_changed(id).await;
    }

    let raw = store.get(libras::client::offline::LIBRARY_CHANGES_KEY).await.unwrap();
    assert_eq!(raw.as_deref(), Some("[5,7,9]"));
}

#[tokio::test]
async fn test_storage_failures_are_swallowed() {
    let ledger = ChangeLedger::new(Arc::new(FailingStore));

    ledger.mark_changed(1).await;
    assert!(ledger.consume_changes().await.is_empty());
    assert!(ledger.peek_changes().await.is_empty());
    assert!(ledger.try_consume_changes().await.is_err());
}

#[tokio::test]
async fn test_policy_refetches_when_storage_fails() {
    let policy = ReconciliationPolicy::new(ChangeLedger::new(Arc::new(FailingStore)));
    assert_eq!(
        policy.on_focus(true).await,
        FocusDecision::Refetch(RefetchReason::LedgerUnavailable)
    );
    assert_eq!(
        policy.on_focus(false).await,
        FocusDecision::Refetch(RefetchReason::ColdStart)
    );
}
