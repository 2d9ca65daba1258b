//! # Optimistic Edit Buffer
//!
//! Holds a tentative copy of one book's user fields while the user edits
//! them through modals, and submits the result at most once when the
//! screen is left.
//!
//! ## Features
//!
//! - **Immediate UI Updates**: every confirmed edit produces a new draft the
//!   screen renders right away
//! - **Net-Zero Detection**: editing a field back to its original value
//!   leaves nothing to commit
//! - **Detached Commit**: the submission runs as a spawned task; leaving the
//!   screen never waits on the network
//!
//! ## States
//!
//! ```text
//! [NoEntity] --begin_editing--> [Clean] --apply_field_edit--> [Dirty]
//! [Clean|Dirty] --begin_editing(new id)--> [Clean]
//! [Clean|Dirty] --commit_if_changed--> [NoEntity]
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use libras::client::offline::{EditBuffer, FieldEdit};
//! use libras::shared::book::Book;
//!
//! let mut buffer = EditBuffer::new();
//! buffer.begin_editing(&Book::new(42, "Blame!", 10));
//! buffer.apply_field_edit(FieldEdit::Rating(7)).unwrap();
//! assert!(buffer.has_changes());
//! ```

use crate::client::api::{ApiError, BookApi};
use crate::shared::book::{Book, BookId, BookStatus, MAX_USER_RATING};
use crate::shared::error::SharedError;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

/// User-editable field of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EditField {
    Rating,
    Status,
    CurrentVolume,
}

/// A confirmed modal edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEdit {
    /// Rating between 0 and [`MAX_USER_RATING`]
    Rating(u8),
    Status(BookStatus),
    /// Volume between 0 and the book's volume count
    CurrentVolume(u32),
}

impl FieldEdit {
    pub fn field(&self) -> EditField {
        match self {
            FieldEdit::Rating(_) => EditField::Rating,
            FieldEdit::Status(_) => EditField::Status,
            FieldEdit::CurrentVolume(_) => EditField::CurrentVolume,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("no book is loaded for editing")]
    NoEntity,
    #[error(transparent)]
    Invalid(#[from] SharedError),
}

/// Lifecycle state of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    NoEntity,
    Clean,
    Dirty,
}

/// Tentative, unconfirmed mutation of one book
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticEdit {
    baseline: Book,
    draft: Book,
    fields_touched: BTreeSet<EditField>,
}

impl OptimisticEdit {
    pub fn new(book: &Book) -> Self {
        Self {
            baseline: book.clone(),
            draft: book.clone(),
            fields_touched: BTreeSet::new(),
        }
    }

    pub fn baseline(&self) -> &Book {
        &self.baseline
    }

    pub fn draft(&self) -> &Book {
        &self.draft
    }

    /// Fields edited at least once, including ones edited back
    pub fn fields_touched(&self) -> &BTreeSet<EditField> {
        &self.fields_touched
    }

    /// Whether any user field differs from the baseline
    pub fn has_changes(&self) -> bool {
        self.draft.user_fields_differ(&self.baseline)
    }

    fn apply(&mut self, edit: FieldEdit) -> Result<(), EditError> {
        validate(&self.draft, edit)?;
        match edit {
            FieldEdit::Rating(value) => self.draft.user_rating = Some(value),
            FieldEdit::Status(value) => self.draft.user_status = Some(value),
            FieldEdit::CurrentVolume(value) => self.draft.user_current_volume = Some(value),
        }
        self.fields_touched.insert(edit.field());
        Ok(())
    }
}

fn validate(book: &Book, edit: FieldEdit) -> Result<(), SharedError> {
    match edit {
        FieldEdit::Rating(value) if value > MAX_USER_RATING => {
            Err(SharedError::out_of_range("rating", value, MAX_USER_RATING))
        }
        FieldEdit::CurrentVolume(value) if value > book.nb_volume => {
            Err(SharedError::out_of_range("current_volume", value, book.nb_volume))
        }
        _ => Ok(()),
    }
}

/// Outcome of a detached submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Submitted,
    Failed(String),
    /// The task panicked or was aborted before finishing
    Lost,
}

/// Handle on a submission running in the background.
///
/// Dropping the handle does not cancel the submission.
#[derive(Debug)]
pub struct PendingCommit {
    book_id: BookId,
    handle: JoinHandle<CommitOutcome>,
}

impl PendingCommit {
    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the submission to finish
    pub async fn wait(self) -> CommitOutcome {
        self.handle.await.unwrap_or(CommitOutcome::Lost)
    }
}

/// Spawn the submission of `book` as a detached task.
///
/// Failures are logged; there is no retry and no rollback of the local
/// state. Must be called from within a tokio runtime.
pub fn spawn_detached_commit(api: Arc<dyn BookApi>, book: Book, token: String) -> PendingCommit {
    let book_id = book.id;
    let handle = tokio::spawn(async move {
        match api.update_user_book(&book, &token).await {
            Ok(()) => {
                tracing::info!("[EDIT] Committed user state for book {}", book.id);
                CommitOutcome::Submitted
            }
            Err(e) => {
                log_commit_failure(book.id, &e);
                CommitOutcome::Failed(e.to_string())
            }
        }
    });
    PendingCommit { book_id, handle }
}

fn log_commit_failure(id: BookId, error: &ApiError) {
    tracing::error!("[EDIT] Failed to commit user state for book {}: {}", id, error);
}

/// Per-screen staging area for one book's edits
#[derive(Debug, Default)]
pub struct EditBuffer {
    edit: Option<OptimisticEdit>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing `book`, discarding any previous draft
    pub fn begin_editing(&mut self, book: &Book) {
        if let Some(previous) = &self.edit {
            if previous.has_changes() {
                tracing::debug!(
                    "[EDIT] Discarding uncommitted draft for book {}",
                    previous.baseline.id
                );
            }
        }
        self.edit = Some(OptimisticEdit::new(book));
    }

    /// Re-arm the buffer only if `book` is a different entity than the one
    /// being edited. Returns whether the buffer was re-armed.
    pub fn load(&mut self, book: &Book) -> bool {
        match &self.edit {
            Some(edit) if edit.baseline.id == book.id => false,
            _ => {
                self.begin_editing(book);
                true
            }
        }
    }

    /// Apply one confirmed edit to the draft. Purely local.
    pub fn apply_field_edit(&mut self, edit: FieldEdit) -> Result<&Book, EditError> {
        let current = self.edit.as_mut().ok_or(EditError::NoEntity)?;
        current.apply(edit)?;
        Ok(&current.draft)
    }

    pub fn state(&self) -> EditState {
        match &self.edit {
            None => EditState::NoEntity,
            Some(edit) if edit.has_changes() => EditState::Dirty,
            Some(_) => EditState::Clean,
        }
    }

    pub fn has_changes(&self) -> bool {
        self.state() == EditState::Dirty
    }

    pub fn edit(&self) -> Option<&OptimisticEdit> {
        self.edit.as_ref()
    }

    pub fn draft(&self) -> Option<&Book> {
        self.edit.as_ref().map(|e| &e.draft)
    }

    pub fn book_id(&self) -> Option<BookId> {
        self.edit.as_ref().map(|e| e.baseline.id)
    }

    /// Take the draft out of the buffer if it differs from the baseline.
    ///
    /// The buffer is left empty either way, so a second call in the same
    /// visit never yields anything.
    pub fn take_changes(&mut self) -> Option<Book> {
        let edit = self.edit.take()?;
        if edit.has_changes() {
            Some(edit.draft)
        } else {
            None
        }
    }

    /// Submit the draft if it changed, without waiting for the result.
    ///
    /// Returns `None` (and performs no I/O) when nothing changed.
    pub fn commit_if_changed(&mut self, api: Arc<dyn BookApi>, token: &str) -> Option<PendingCommit> {
        let book = self.take_changes()?;
        tracing::debug!("[EDIT] Dispatching commit for book {}", book.id);
        Some(spawn_detached_commit(api, book, token.to_string()))
    }
}
