//! Shared Error Types
//!
//! Failures tied to book data itself rather than to the transport or the
//! storage that carried it.
//!
//! # Error Categories
//!
//! - `OutOfRange` - a user edit outside the allowed bounds for the book
//!
//! # Usage
//!
//! ```rust
//! use libras::shared::error::SharedError;
//!
//! let error = SharedError::out_of_range("rating", 11u8, 10u8);
//! assert_eq!(error.to_string(), "rating must be at most 10, got 11");
//! ```
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// A user field was set past its upper bound
    #[error("{field} must be at most {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },
}

impl SharedError {
    pub fn out_of_range(field: &'static str, value: impl Into<u32>, max: impl Into<u32>) -> Self {
        Self::OutOfRange {
            field,
            value: value.into(),
            max: max.into(),
        }
    }
}
