//! # Book Details Screen
//!
//! Headless controller for the book details screen: loads one book, lets
//! the user toggle library membership and edit rating, status and current
//! volume, and commits the edits when the screen is left.
//!
//! Every change of user state is recorded in the change ledger so the feed
//! screens refetch when they regain focus.

use crate::client::api::{ApiError, BookApi};
use crate::client::offline::{ChangeLedger, EditBuffer, EditError, EditState, FieldEdit, PendingCommit};
use crate::shared::book::{Book, BookId};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetailsError {
    #[error("no book is loaded")]
    NotLoaded,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Edit(#[from] EditError),
}

/// Book details screen state
pub struct BookDetailsScreen {
    api: Arc<dyn BookApi>,
    ledger: ChangeLedger,
    token: String,
    book: Option<Book>,
    in_library: bool,
    buffer: EditBuffer,
}

impl BookDetailsScreen {
    pub fn new(api: Arc<dyn BookApi>, ledger: ChangeLedger, token: impl Into<String>) -> Self {
        Self {
            api,
            ledger,
            token: token.into(),
            book: None,
            in_library: false,
            buffer: EditBuffer::new(),
        }
    }

    /// Fetch `id` and show it.
    ///
    /// The edit buffer is re-armed only when a different book is loaded;
    /// refreshing the same book keeps the draft.
    pub async fn open(&mut self, id: BookId) -> Result<&Book, DetailsError> {
        let book = self.api.get_book_details(id, &self.token).await.inspect_err(|e| {
            tracing::error!("[DETAILS] Failed to load book {}: {}", id, e);
        })?;

        self.in_library = book.in_library();
        if self.buffer.load(&book) {
            tracing::debug!("[DETAILS] Editing book {} ({})", book.id, book.title());
        }
        let book = self.book.insert(book);
        Ok(&*book)
    }

    /// Book as the user should see it, including unsaved edits
    pub fn displayed(&self) -> Option<&Book> {
        self.buffer.draft().or(self.book.as_ref())
    }

    pub fn in_library(&self) -> bool {
        self.in_library
    }

    pub fn edit_state(&self) -> EditState {
        self.buffer.state()
    }

    /// Add the book to the library or remove it, then mark it changed.
    ///
    /// Returns the new membership.
    pub async fn toggle_library(&mut self) -> Result<bool, DetailsError> {
        let id = self.book.as_ref().ok_or(DetailsError::NotLoaded)?.id;
        self.api.switch_in_user_library(id, &self.token).await?;
        self.in_library = !self.in_library;
        self.ledger.mark_changed(id).await;
        tracing::info!(
            "[DETAILS] Book {} {} library",
            id,
            if self.in_library { "added to" } else { "removed from" }
        );
        Ok(self.in_library)
    }

    /// Apply an edit confirmed in a modal
    pub fn apply_edit(&mut self, edit: FieldEdit) -> Result<&Book, DetailsError> {
        Ok(self.buffer.apply_field_edit(edit)?)
    }

    /// Leave the screen.
    ///
    /// Dispatches the commit if the draft changed and marks the book in the
    /// ledger; never waits for the network.
    pub async fn leave(&mut self) -> Option<PendingCommit> {
        let pending = self.buffer.commit_if_changed(Arc::clone(&self.api), &self.token);
        if let Some(commit) = &pending {
            self.ledger.mark_changed(commit.book_id()).await;
        }
        self.book = None;
        self.in_library = false;
        pending
    }
}
