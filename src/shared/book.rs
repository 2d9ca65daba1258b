/**
 * Book Data Structure
 *
 * This module defines the Book entity exchanged with the LibraS API and the
 * user-specific fields (status, rating, current volume) the client edits.
 *
 * Catalog fields (titles, authors, synopsis, tags) are read-only for the
 * client; only the `user_*` fields are ever changed locally.
 */
use serde::{Deserialize, Serialize};

/// Identifier of a catalog book, assigned by the server.
pub type BookId = u64;

/// Highest rating a user can give a book (ratings run from 0 to 10).
pub const MAX_USER_RATING: u8 = 10;

/// Reading status of a book in the user's library
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookStatus {
    /// Planned, not started
    ToRead,
    /// Currently being read
    Reading,
    /// Finished
    Completed,
}

impl BookStatus {
    /// All statuses in the order they are offered to the user
    pub const ALL: [BookStatus; 3] = [BookStatus::ToRead, BookStatus::Reading, BookStatus::Completed];

    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::ToRead => "TO_READ",
            BookStatus::Reading => "READING",
            BookStatus::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Author credited on a book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
}

/// Catalog tag (genre, theme, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// A comic book / manga series as returned by the API.
///
/// Only the `user_*` fields and `is_in_user_library` are user state; every
/// other field is catalog data and is carried through unchanged when the
/// book is submitted back to the server.
///
/// # Example
/// ```rust
/// use libras::shared::book::{Book, BookStatus};
///
/// let mut book = Book::new(42, "Blame!", 10);
/// assert!(!book.in_library());
///
/// book.user_status = Some(BookStatus::Reading);
/// assert!(book.in_library());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    /// Titles, the first one is the display title
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub img_url: String,
    /// Number of published volumes
    #[serde(default)]
    pub nb_volume: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    /// Global community rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_status: Option<BookStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_current_volume: Option<u32>,
    /// Match percentage computed by the recommendation engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_match: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_in_user_library: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_books: Vec<Book>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub same_author_books: Vec<Book>,
}

impl Book {
    /// Create a bare book with a single title and no user state
    pub fn new(id: BookId, title: impl Into<String>, nb_volume: u32) -> Self {
        Self {
            id,
            names: vec![title.into()],
            img_url: String::new(),
            nb_volume,
            completed: None,
            authors: Vec::new(),
            synopsis: None,
            note: None,
            date_start: None,
            date_end: None,
            tags: Vec::new(),
            user_status: None,
            user_rating: None,
            user_current_volume: None,
            user_match: None,
            is_in_user_library: None,
            created_at: None,
            modified_at: None,
            related_books: Vec::new(),
            same_author_books: Vec::new(),
        }
    }

    /// Display title, falling back to "Untitled"
    pub fn title(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("Untitled")
    }

    /// Whether the book belongs to the user's library.
    ///
    /// A book with a reading status or a non-zero current volume is in the
    /// library even when the server did not send the explicit flag.
    pub fn in_library(&self) -> bool {
        self.is_in_user_library.unwrap_or(false)
            || self.user_status.is_some()
            || self.user_current_volume.unwrap_or(0) > 0
    }

    /// Whether the user-specific fields of two snapshots differ
    pub fn user_fields_differ(&self, other: &Book) -> bool {
        self.user_rating != other.user_rating
            || self.user_status != other.user_status
            || self.user_current_volume != other.user_current_volume
    }
}
