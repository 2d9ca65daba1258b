//! Headless screen controllers.
//!
//! The UI layer renders whatever these controllers hold and forwards
//! focus, blur and user events to them.

pub mod book_details;
pub mod feed;
pub mod lifecycle;

pub use book_details::{BookDetailsScreen, DetailsError};
pub use feed::{DiscoverFeed, FeedScreen, FeedSource, FocusOutcome, RecentBooksFeed, TagFeed};
pub use lifecycle::ScreenLifecycle;
