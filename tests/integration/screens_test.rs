//! Book details and feed screens sharing one change ledger

use crate::common::{catalog_book, reading_book, FakeBookApi};
use assert_matches::assert_matches;
use async_trait::async_trait;
use libras::client::api::ApiError;
use libras::client::local_store::MemoryStore;
use libras::client::offline::{
    ChangeLedger, ChangeSet, CommitOutcome, EditState, FieldEdit, ReconciliationPolicy, RefetchReason,
};
use libras::client::screens::{BookDetailsScreen, DetailsError, FeedScreen, FeedSource, FocusOutcome, RecentBooksFeed};
use libras::shared::book::BookStatus;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

fn shared_ledger() -> ChangeLedger {
    ChangeLedger::new(Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn test_leave_commits_only_the_edited_field() {
    let api = Arc::new(FakeBookApi::with_books([reading_book(1)]));
    let ledger = shared_ledger();
    let mut details = BookDetailsScreen::new(api.clone(), ledger.clone(), "jwt");

    details.open(1).await.unwrap();
    details.apply_edit(FieldEdit::Rating(7)).unwrap();
    assert_eq!(details.edit_state(), EditState::Dirty);
    assert_eq!(details.displayed().unwrap().user_rating, Some(7));

    let pending = details.leave().await.expect("a commit should be dispatched");
    assert_eq!(pending.wait().await, CommitOutcome::Submitted);

    let submitted = api.submitted();
    assert_eq!(submitted.len(), 1);
    let mut expected = reading_book(1);
    expected.user_rating = Some(7);
    assert_eq!(submitted[0], expected);
    assert_eq!(ledger.peek_changes().await, ChangeSet::from([1]));
    assert_eq!(details.edit_state(), EditState::NoEntity);
}

#[tokio::test]
async fn test_clean_leave_sends_nothing() {
    let api = Arc::new(FakeBookApi::with_books([reading_book(2)]));
    let ledger = shared_ledger();
    let mut details = BookDetailsScreen::new(api.clone(), ledger.clone(), "jwt");

    details.open(2).await.unwrap();
    details.apply_edit(FieldEdit::Status(BookStatus::Completed)).unwrap();
    details.apply_edit(FieldEdit::Status(BookStatus::Reading)).unwrap();
    assert_eq!(details.edit_state(), EditState::Clean);

    assert!(details.leave().await.is_none());
    assert!(api.submitted().is_empty());
    assert!(ledger.peek_changes().await.is_empty());
}

#[tokio::test]
async fn test_toggle_library_marks_the_book() {
    let api = Arc::new(FakeBookApi::with_books([catalog_book(3)]));
    let ledger = shared_ledger();
    let mut details = BookDetailsScreen::new(api.clone(), ledger.clone(), "jwt");

    details.open(3).await.unwrap();
    assert!(!details.in_library());

    assert!(details.toggle_library().await.unwrap());
    assert!(details.in_library());
    assert_eq!(api.toggled(), vec![3]);
    assert_eq!(ledger.consume_changes().await, ChangeSet::from([3]));

    assert!(!details.toggle_library().await.unwrap());
    assert_eq!(api.toggled(), vec![3, 3]);
}

#[tokio::test]
async fn test_toggle_without_book_fails() {
    let api = Arc::new(FakeBookApi::default());
    let mut details = BookDetailsScreen::new(api, shared_ledger(), "jwt");
    assert_matches!(details.toggle_library().await, Err(DetailsError::NotLoaded));
    assert_matches!(details.open(99).await, Err(DetailsError::Api(ApiError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_invalid_volume_is_rejected() {
    let api = Arc::new(FakeBookApi::with_books([reading_book(4)]));
    let mut details = BookDetailsScreen::new(api, shared_ledger(), "jwt");
    details.open(4).await.unwrap();

    assert_matches!(details.apply_edit(FieldEdit::CurrentVolume(13)), Err(DetailsError::Edit(_)));
    assert_eq!(details.edit_state(), EditState::Clean);
    assert!(details.apply_edit(FieldEdit::CurrentVolume(12)).is_ok());
}

#[tokio::test]
async fn test_feed_refetches_after_details_edit() {
    let api = Arc::new(FakeBookApi::with_books([reading_book(1), catalog_book(2)]));
    let ledger = shared_ledger();
    let feed = FeedScreen::new(
        RecentBooksFeed::new(api.clone(), "jwt"),
        ReconciliationPolicy::new(ledger.clone()),
    );
    let mut details = BookDetailsScreen::new(api.clone(), ledger.clone(), "jwt");

    assert_eq!(feed.on_focus().await, FocusOutcome::Refetched(RefetchReason::ColdStart));
    assert_eq!(api.recent_calls(), 1);

    feed.on_blur();
    assert_eq!(feed.on_focus().await, FocusOutcome::KeptCache);
    assert_eq!(api.recent_calls(), 1);

    feed.on_blur();
    details.open(1).await.unwrap();
    details.apply_edit(FieldEdit::Rating(9)).unwrap();
    let pending = details.leave().await.unwrap();
    assert_eq!(pending.wait().await, CommitOutcome::Submitted);

    assert_eq!(
        feed.on_focus().await,
        FocusOutcome::Refetched(RefetchReason::LedgerChanged(ChangeSet::from([1])))
    );
    assert_eq!(api.recent_calls(), 2);
    let books = feed.data().await.unwrap();
    assert_eq!(books[0].user_rating, Some(9));

    feed.on_blur();
    assert_eq!(feed.on_focus().await, FocusOutcome::KeptCache);
    assert_eq!(api.recent_calls(), 2);
}

#[tokio::test]
async fn test_failed_commit_is_reported_not_raised() {
    let api = Arc::new(FakeBookApi::with_books([reading_book(5)]));
    api.fail_updates(true);
    let ledger = shared_ledger();
    let mut details = BookDetailsScreen::new(api.clone(), ledger.clone(), "jwt");

    details.open(5).await.unwrap();
    details.apply_edit(FieldEdit::CurrentVolume(4)).unwrap();
    let pending = details.leave().await.unwrap();

    assert_matches!(pending.wait().await, CommitOutcome::Failed(_));
    assert_eq!(api.submitted().len(), 1);
    assert_eq!(ledger.peek_changes().await, ChangeSet::from([5]));
}

/// Handles a test uses to drive a [`GatedSource`]
struct Gate {
    enabled: Arc<AtomicBool>,
    started: Arc<Notify>,
    release: Arc<Notify>,
}

/// Source that blocks until the test releases it while the gate is
/// enabled. Returns the index of the fetch.
struct GatedSource {
    calls: AtomicUsize,
    enabled: Arc<AtomicBool>,
    started: Arc<Notify>,
    release: Arc<Notify>,
}

impl GatedSource {
    fn new(enabled: bool) -> (Self, Gate) {
        let gate = Gate {
            enabled: Arc::new(AtomicBool::new(enabled)),
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        };
        let source = Self {
            calls: AtomicUsize::new(0),
            enabled: gate.enabled.clone(),
            started: gate.started.clone(),
            release: gate.release.clone(),
        };
        (source, gate)
    }
}

#[async_trait]
impl FeedSource for GatedSource {
    type Data = usize;

    fn name(&self) -> &str {
        "gated"
    }

    async fn fetch(&self) -> Result<usize, ApiError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.enabled.load(Ordering::SeqCst) {
            self.started.notify_one();
            self.release.notified().await;
        }
        Ok(call)
    }
}

#[tokio::test]
async fn test_change_seen_while_blurred_mid_fetch_is_not_lost() {
    let (source, gate) = GatedSource::new(false);
    let ledger = shared_ledger();
    let feed = FeedScreen::new(source, ReconciliationPolicy::new(ledger.clone()));

    assert_eq!(feed.on_focus().await, FocusOutcome::Refetched(RefetchReason::ColdStart));
    assert_eq!(feed.data().await, Some(0));
    feed.on_blur();

    ledger.mark_changed(42).await;
    gate.enabled.store(true, Ordering::SeqCst);

    let focused = feed.clone();
    let task = tokio::spawn(async move { focused.on_focus().await });
    gate.started.notified().await;
    feed.on_blur();
    gate.release.notify_one();

    assert_eq!(
        task.await.unwrap(),
        FocusOutcome::Refetched(RefetchReason::LedgerChanged(ChangeSet::from([42])))
    );
    assert_eq!(feed.data().await, Some(1));
    assert!(!feed.is_loading().await);

    gate.enabled.store(false, Ordering::SeqCst);
    assert_eq!(feed.on_focus().await, FocusOutcome::KeptCache);
    assert_eq!(feed.data().await, Some(1));
}

#[tokio::test]
async fn test_unmount_during_fetch_discards_response() {
    let (source, gate) = GatedSource::new(true);
    let feed = FeedScreen::new(source, ReconciliationPolicy::new(shared_ledger()));

    let refreshing = feed.clone();
    let task = tokio::spawn(async move { refreshing.refresh().await });

    gate.started.notified().await;
    feed.unmount();
    gate.release.notify_one();

    assert_eq!(task.await.unwrap(), FocusOutcome::Discarded);
    assert!(feed.data().await.is_none());
    assert!(!feed.is_loading().await);
    assert!(!feed.lifecycle().is_mounted());
}

#[tokio::test]
async fn test_leave_returns_before_the_commit_finishes() {
    let api = Arc::new(FakeBookApi::with_books([reading_book(6)]));
    let release = api.hold_updates();
    let ledger = shared_ledger();
    let mut details = BookDetailsScreen::new(api.clone(), ledger.clone(), "jwt");

    details.open(6).await.unwrap();
    details.apply_edit(FieldEdit::Rating(2)).unwrap();

    let pending = details.leave().await.expect("a commit should be dispatched");
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert!(!pending.is_finished());
    assert_eq!(ledger.peek_changes().await, ChangeSet::from([6]));

    release.notify_one();
    assert_eq!(pending.wait().await, CommitOutcome::Submitted);
    assert_eq!(api.submitted().len(), 1);
}
