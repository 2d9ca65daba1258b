//! # Screen Reconciliation
//!
//! Decides, each time a screen regains focus, whether its cached data is
//! stale. The change ledger is the staleness oracle.
//!
//! ## Rules
//!
//! 1. No cached data: refetch (cold start)
//! 2. Ledger drained non-empty: refetch everything, never patch entries
//! 3. Ledger unreadable: refetch, preferring freshness
//! 4. Otherwise keep the cache
//!
//! The ledger is drained on every focus, including cold starts, so a mark
//! that was already covered by a cold-start fetch does not cause a second
//! refetch on the next focus.

use crate::client::offline::ledger::{ChangeLedger, ChangeSet};

/// Why a screen must refetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefetchReason {
    /// The screen holds no data yet
    ColdStart,
    /// Books changed elsewhere; the ids are informational only
    LedgerChanged(ChangeSet),
    /// The ledger could not be read
    LedgerUnavailable,
}

/// Result of the focus-time decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusDecision {
    Refetch(RefetchReason),
    KeepCache,
}

impl FocusDecision {
    pub fn should_refetch(&self) -> bool {
        matches!(self, FocusDecision::Refetch(_))
    }
}

/// Staleness check run on every "screen gained focus" event
#[derive(Debug, Clone)]
pub struct ReconciliationPolicy {
    ledger: ChangeLedger,
}

impl ReconciliationPolicy {
    pub fn new(ledger: ChangeLedger) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &ChangeLedger {
        &self.ledger
    }

    /// Drain the ledger and decide whether the caller must refetch
    pub async fn on_focus(&self, has_cached_data: bool) -> FocusDecision {
        let drained = self.ledger.try_consume_changes().await;

        if !has_cached_data {
            return FocusDecision::Refetch(RefetchReason::ColdStart);
        }

        match drained {
            Ok(changed) if changed.is_empty() => FocusDecision::KeepCache,
            Ok(changed) => {
                tracing::debug!("[FOCUS] {} book(s) changed elsewhere, refetching", changed.len());
                FocusDecision::Refetch(RefetchReason::LedgerChanged(changed))
            }
            Err(e) => {
                tracing::warn!("[FOCUS] Change ledger unavailable, refetching: {}", e);
                FocusDecision::Refetch(RefetchReason::LedgerUnavailable)
            }
        }
    }
}
