//! Screen lifecycle tracking.
//!
//! A screen instance is mounted until it is torn down, and focused while it
//! is the foreground screen. Responses arriving after unmount are dropped;
//! responses arriving while the screen is merely blurred are kept, since the
//! ledger marks that triggered them have already been consumed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct LifecycleInner {
    mounted: AtomicBool,
    focused: AtomicBool,
}

/// Mounted/focused state of one screen instance
#[derive(Debug, Clone)]
pub struct ScreenLifecycle {
    inner: Arc<LifecycleInner>,
}

impl Default for ScreenLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenLifecycle {
    /// A freshly mounted, not yet focused screen
    pub fn new() -> Self {
        Self {
            inner: Arc::new(LifecycleInner {
                mounted: AtomicBool::new(true),
                focused: AtomicBool::new(false),
            }),
        }
    }

    /// The screen came to the foreground. Returns `false` once unmounted.
    pub fn focus(&self) -> bool {
        let mounted = self.is_mounted();
        self.inner.focused.store(mounted, Ordering::SeqCst);
        mounted
    }

    pub fn blur(&self) {
        self.inner.focused.store(false, Ordering::SeqCst);
    }

    /// The screen was torn down; it can never be focused again
    pub fn unmount(&self) {
        self.inner.mounted.store(false, Ordering::SeqCst);
        self.inner.focused.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.load(Ordering::SeqCst)
    }

    pub fn is_focused(&self) -> bool {
        self.inner.focused.load(Ordering::SeqCst)
    }
}
