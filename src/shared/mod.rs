//! Shared Module
//!
//! Types shared by every part of the client: the book entity as the API
//! serves it, the shared error type and the application configuration.
//!
//! # Overview
//!
//! Nothing in here performs I/O. These types are serialized to and from
//! JSON when talking to the LibraS API.

/// Book entity and user reading state
pub mod book;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use book::{Author, Book, BookId, BookStatus, Tag, MAX_USER_RATING};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
