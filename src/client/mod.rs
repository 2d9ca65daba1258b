//! Client Module
//!
//! Everything the mobile client needs below the UI layer: configuration,
//! the LibraS API client, the persisted session, local key-value storage,
//! library sync and the headless screen controllers.
//!
//! # Architecture
//!
//! - **`config`** - Configuration management (API URL, API key, token)
//! - **`api`** - HTTP client and the `BookApi` seam
//! - **`auth`** - Persisted JWT session
//! - **`local_store`** - Durable key-value storage (SQLite or in-memory)
//! - **`offline`** - Change ledger, optimistic edits, reconciliation
//! - **`screens`** - Feed and book details controllers
//! - **`logging`** - Tracing subscriber setup
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs          - Module exports and documentation
//! ├── config.rs       - Configuration management
//! ├── api.rs          - LibraS API client
//! ├── auth.rs         - Session store
//! ├── logging.rs      - Tracing setup
//! ├── local_store/    - Key-value backends
//! ├── offline/        - Library sync core
//! └── screens/        - Screen controllers
//! ```

pub mod config;
pub mod api;
pub mod auth;
pub mod local_store;
pub mod offline;
pub mod screens;
pub mod logging;

// Re-export commonly used types
pub use config::Config;
pub use api::{ApiClient, ApiError, BookApi};
pub use auth::SessionStore;
pub use local_store::{KeyValueStore, MemoryStore, SqliteStore};
pub use offline::{ChangeLedger, EditBuffer, FieldEdit, ReconciliationPolicy};
