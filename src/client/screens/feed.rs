//! # Feed Screens
//!
//! Headless controller for list screens (discover page, recent books,
//! books by tag). Each focus runs the reconciliation policy and refetches
//! through the screen's [`FeedSource`] when the cache is stale.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use libras::client::api::ApiClient;
//! use libras::client::config::Config;
//! use libras::client::local_store::MemoryStore;
//! use libras::client::offline::{ChangeLedger, ReconciliationPolicy};
//! use libras::client::screens::{FeedScreen, RecentBooksFeed};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Arc::new(ApiClient::new(Config::from_env()?)?);
//! let policy = ReconciliationPolicy::new(ChangeLedger::new(Arc::new(MemoryStore::new())));
//! let screen = FeedScreen::new(RecentBooksFeed::new(api, "jwt"), policy);
//!
//! screen.on_focus().await;
//! let books = screen.data().await;
//! # Ok(())
//! # }
//! ```

use crate::client::api::{ApiError, BookApi, DiscoverPage};
use crate::client::offline::{FocusDecision, RefetchReason, ReconciliationPolicy};
use crate::client::screens::lifecycle::ScreenLifecycle;
use crate::shared::book::Book;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Where a feed screen gets its data from
#[async_trait]
pub trait FeedSource: Send + Sync + 'static {
    type Data: Clone + Send + Sync + 'static;

    /// Short name used in logs
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<Self::Data, ApiError>;
}

/// `GET /books/discover`
pub struct DiscoverFeed {
    api: Arc<dyn BookApi>,
    token: String,
}

impl DiscoverFeed {
    pub fn new(api: Arc<dyn BookApi>, token: impl Into<String>) -> Self {
        Self { api, token: token.into() }
    }
}

#[async_trait]
impl FeedSource for DiscoverFeed {
    type Data = DiscoverPage;

    fn name(&self) -> &str {
        "discover"
    }

    async fn fetch(&self) -> Result<DiscoverPage, ApiError> {
        self.api.get_discover_page(&self.token).await
    }
}

/// `GET /books/recent`
pub struct RecentBooksFeed {
    api: Arc<dyn BookApi>,
    token: String,
}

impl RecentBooksFeed {
    pub fn new(api: Arc<dyn BookApi>, token: impl Into<String>) -> Self {
        Self { api, token: token.into() }
    }
}

#[async_trait]
impl FeedSource for RecentBooksFeed {
    type Data = Vec<Book>;

    fn name(&self) -> &str {
        "recent"
    }

    async fn fetch(&self) -> Result<Vec<Book>, ApiError> {
        self.api.get_recent_books(&self.token).await
    }
}

/// Books carrying every selected tag
pub struct TagFeed {
    api: Arc<dyn BookApi>,
    token: String,
    tags: Vec<String>,
}

impl TagFeed {
    pub fn new(api: Arc<dyn BookApi>, token: impl Into<String>, tags: Vec<String>) -> Self {
        Self { api, token: token.into(), tags }
    }
}

#[async_trait]
impl FeedSource for TagFeed {
    type Data = Vec<Book>;

    fn name(&self) -> &str {
        "by-tag"
    }

    async fn fetch(&self) -> Result<Vec<Book>, ApiError> {
        self.api.get_books_by_tags(&self.token, &self.tags).await
    }
}

/// What a focus (or manual refresh) did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusOutcome {
    /// The focus policy found the cache stale and fresh data was stored
    Refetched(RefetchReason),
    /// A manual refresh stored fresh data
    Refreshed,
    /// The cache was still valid
    KeptCache,
    /// The screen was unmounted before the response arrived
    Discarded,
    /// The fetch failed; the previous cache is kept
    Failed(String),
}

#[derive(Debug)]
struct FeedState<T> {
    data: Option<T>,
    loading: bool,
    error: Option<String>,
}

/// Cached list screen driven by focus events
pub struct FeedScreen<S: FeedSource> {
    source: Arc<S>,
    policy: ReconciliationPolicy,
    lifecycle: ScreenLifecycle,
    state: Arc<RwLock<FeedState<S::Data>>>,
}

impl<S: FeedSource> Clone for FeedScreen<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            policy: self.policy.clone(),
            lifecycle: self.lifecycle.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: FeedSource> FeedScreen<S> {
    pub fn new(source: S, policy: ReconciliationPolicy) -> Self {
        Self {
            source: Arc::new(source),
            policy,
            lifecycle: ScreenLifecycle::new(),
            state: Arc::new(RwLock::new(FeedState {
                data: None,
                loading: false,
                error: None,
            })),
        }
    }

    /// Run the reconciliation policy and refetch if the cache is stale
    pub async fn on_focus(&self) -> FocusOutcome {
        if !self.lifecycle.focus() {
            return FocusOutcome::Discarded;
        }
        let has_data = self.state.read().await.data.is_some();

        match self.policy.on_focus(has_data).await {
            FocusDecision::KeepCache => FocusOutcome::KeptCache,
            FocusDecision::Refetch(reason) => {
                tracing::debug!("[FOCUS] Refetching {} ({:?})", self.source.name(), reason);
                self.refetch(FocusOutcome::Refetched(reason)).await
            }
        }
    }

    /// Refetch unconditionally (pull to refresh)
    pub async fn refresh(&self) -> FocusOutcome {
        if !self.lifecycle.is_mounted() {
            return FocusOutcome::Discarded;
        }
        self.refetch(FocusOutcome::Refreshed).await
    }

    /// Fetch and store the result unless the screen was unmounted meanwhile.
    ///
    /// A response that arrives after a blur is still stored: the ledger
    /// marks behind it were drained on focus and will not be seen again.
    async fn refetch(&self, on_success: FocusOutcome) -> FocusOutcome {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let result = self.source.fetch().await;

        let mut state = self.state.write().await;
        state.loading = false;

        if !self.lifecycle.is_mounted() {
            tracing::debug!("[FOCUS] Dropping {} response for unmounted screen", self.source.name());
            return FocusOutcome::Discarded;
        }

        match result {
            Ok(data) => {
                state.data = Some(data);
                if !self.lifecycle.is_focused() {
                    tracing::debug!("[FOCUS] Stored {} response while blurred", self.source.name());
                }
                on_success
            }
            Err(e) => {
                tracing::error!("[FOCUS] Failed to load {}: {}", self.source.name(), e);
                let message = e.to_string();
                state.error = Some(message.clone());
                FocusOutcome::Failed(message)
            }
        }
    }

    pub fn on_blur(&self) {
        self.lifecycle.blur();
    }

    pub fn unmount(&self) {
        self.lifecycle.unmount();
    }

    pub fn lifecycle(&self) -> &ScreenLifecycle {
        &self.lifecycle
    }

    /// Cached data, if any was loaded
    pub async fn data(&self) -> Option<S::Data> {
        self.state.read().await.data.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }
}
