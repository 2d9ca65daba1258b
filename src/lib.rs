//! LibraS - Client Library Core
//!
//! Client-side core of the LibraS comic book / manga library tracker. The
//! mobile UI sits on top of this crate; everything below rendering lives
//! here.
//!
//! # Overview
//!
//! This library provides:
//! - A typed client for the LibraS REST API
//! - A persisted session (JWT with expiry)
//! - A durable change ledger telling screens which books changed elsewhere
//! - Optimistic editing of a book's rating, status and current volume,
//!   committed in the background when the user leaves the screen
//! - Focus-time reconciliation deciding when a screen must refetch
//!
//! # Module Structure
//!
//! - **`shared`** - Book entity, shared errors, configuration types
//! - **`client`** - API client, local storage, library sync, screens
//!
//! # Usage
//!
//! ```rust,no_run
//! use libras::client::{ApiClient, ChangeLedger, Config, SqliteStore};
//! use libras::client::screens::BookDetailsScreen;
//! use libras::client::offline::FieldEdit;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let store = Arc::new(SqliteStore::open(config.database_path()).await?);
//! let api = Arc::new(ApiClient::new(config)?);
//!
//! let mut details = BookDetailsScreen::new(api, ChangeLedger::new(store), "jwt");
//! details.open(42).await?;
//! details.apply_edit(FieldEdit::Rating(8))?;
//! details.leave().await; // commit runs in the background
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! The screens assume the host navigation stack keeps at most one screen
//! focused at a time. The change ledger is shared through the store without
//! a lock and relies on that.
//!
//! # Error Handling
//!
//! - `Result<T, E>` with `thiserror` enums per concern
//! - The change ledger and the optimistic commit never surface errors;
//!   failures are logged through `tracing`

/// Shared types and data structures
pub mod shared;

/// Client core
pub mod client;
