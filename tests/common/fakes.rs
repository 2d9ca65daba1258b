//! Fake collaborators for integration tests
//!
//! `FakeBookApi` records every mutating call so tests can assert on the
//! exact submissions; `FailingStore` simulates a broken storage layer.

use async_trait::async_trait;
use libras::client::api::{ApiError, BookApi, DiscoverPage};
use libras::client::local_store::{KeyValueStore, StorageError};
use libras::shared::book::{Book, BookId, Tag};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// In-memory stand-in for the LibraS API
#[derive(Default)]
pub struct FakeBookApi {
    books: Mutex<HashMap<BookId, Book>>,
    submitted: Mutex<Vec<Book>>,
    toggled: Mutex<Vec<BookId>>,
    recent_calls: AtomicUsize,
    fail_updates: AtomicBool,
    update_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeBookApi {
    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        let api = Self::default();
        {
            let mut map = api.books.lock().unwrap();
            for book in books {
                map.insert(book.id, book);
            }
        }
        api
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Make every `update_user_book` wait until the returned gate is notified
    pub fn hold_updates(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.update_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn submitted(&self) -> Vec<Book> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn toggled(&self) -> Vec<BookId> {
        self.toggled.lock().unwrap().clone()
    }

    pub fn recent_calls(&self) -> usize {
        self.recent_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BookApi for FakeBookApi {
    async fn get_book_details(&self, id: BookId, _token: &str) -> Result<Book, ApiError> {
        self.books
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(ApiError::Status { status: 404, body: format!("book {} not found", id) })
    }

    async fn update_user_book(&self, book: &Book, _token: &str) -> Result<(), ApiError> {
        let gate = self.update_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.submitted.lock().unwrap().push(book.clone());
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(ApiError::Status { status: 500, body: "update failed".to_string() });
        }
        self.books.lock().unwrap().insert(book.id, book.clone());
        Ok(())
    }

    async fn switch_in_user_library(&self, id: BookId, _token: &str) -> Result<(), ApiError> {
        self.toggled.lock().unwrap().push(id);
        Ok(())
    }

    async fn get_discover_page(&self, _token: &str) -> Result<DiscoverPage, ApiError> {
        Ok(DiscoverPage(serde_json::json!({ "forYou": [] })))
    }

    async fn get_recent_books(&self, _token: &str) -> Result<Vec<Book>, ApiError> {
        self.recent_calls.fetch_add(1, Ordering::SeqCst);
        let mut books: Vec<Book> = self.books.lock().unwrap().values().cloned().collect();
        books.sort_by_key(|b| b.id);
        Ok(books)
    }

    async fn get_tags(&self, _token: &str) -> Result<Vec<Tag>, ApiError> {
        Ok(Vec::new())
    }

    async fn get_books_by_tags(&self, _token: &str, tags: &[String]) -> Result<Vec<Book>, ApiError> {
        let books = self.books.lock().unwrap();
        Ok(books
            .values()
            .filter(|b| tags.iter().all(|t| b.tags.iter().any(|bt| &bt.name == t)))
            .cloned()
            .collect())
    }
}

/// Store whose every operation fails
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("disk gone".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disk gone".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disk gone".to_string()))
    }
}
