//! LibraS API Client
//!
//! Async HTTP client for the LibraS REST API. Every request carries the
//! `API-KEY` header; authenticated endpoints also send the user's JWT as a
//! bearer token.
//!
//! The [`BookApi`] trait is the seam the offline core and the screens use,
//! so they can be exercised against fakes without a server.

use crate::client::config::Config;
use crate::shared::book::{Book, BookId, Tag};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by API calls
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("not authenticated")]
    NotAuthenticated,
}

impl ApiError {
    /// HTTP status of the failed response, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub displayname: String,
}

/// Token issued by `/auth/login` and `/auth/signup`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in milliseconds
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize)]
struct BooksByTagsRequest<'a> {
    tags: &'a [String],
}

/// Discover page payload.
///
/// The sections are rendered as-is by the UI, so the client keeps the raw
/// document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DiscoverPage(pub serde_json::Value);

/// Book-related API operations used by the client core
#[async_trait]
pub trait BookApi: Send + Sync {
    /// Fetch one book with the user's state for it
    async fn get_book_details(&self, id: BookId, token: &str) -> Result<Book, ApiError>;

    /// Submit the full updated book (user rating, status, current volume)
    async fn update_user_book(&self, book: &Book, token: &str) -> Result<(), ApiError>;

    /// Add the book to the user's library, or remove it if already there
    async fn switch_in_user_library(&self, id: BookId, token: &str) -> Result<(), ApiError>;

    async fn get_discover_page(&self, token: &str) -> Result<DiscoverPage, ApiError>;

    async fn get_recent_books(&self, token: &str) -> Result<Vec<Book>, ApiError>;

    async fn get_tags(&self, token: &str) -> Result<Vec<Tag>, ApiError>;

    async fn get_books_by_tags(&self, token: &str, tags: &[String]) -> Result<Vec<Book>, ApiError>;
}

/// HTTP implementation of [`BookApi`]
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Config,
    client: Client,
}

impl ApiClient {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = self.config.api_url(endpoint);
        tracing::debug!("[API] {} {}", method, url);
        self.client
            .request(method, url)
            .header("Content-Type", "application/json")
            .header("API-KEY", self.config.api_key())
    }

    fn authenticated(&self, method: Method, endpoint: &str, token: &str) -> Result<RequestBuilder, ApiError> {
        if token.is_empty() {
            return Err(ApiError::NotAuthenticated);
        }
        Ok(self
            .request(method, endpoint)
            .header("Authorization", format!("Bearer {}", token)))
    }

    /// Send the request and fail on non-success status codes
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| status.to_string());
            tracing::error!("[API] Request failed: {} - {}", status, body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Exchange credentials for a JWT
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let request = self.request(Method::POST, "/auth/login").json(credentials);
        self.send_json(request).await
    }

    /// Create an account and return its JWT
    pub async fn signup(&self, user: &SignupRequest) -> Result<LoginResponse, ApiError> {
        let request = self.request(Method::POST, "/auth/signup").json(user);
        self.send_json(request).await
    }
}

#[async_trait]
impl BookApi for ApiClient {
    async fn get_book_details(&self, id: BookId, token: &str) -> Result<Book, ApiError> {
        let request = self.authenticated(Method::GET, &format!("/books/{}", id), token)?;
        self.send_json(request).await
    }

    async fn update_user_book(&self, book: &Book, token: &str) -> Result<(), ApiError> {
        let request = self
            .authenticated(Method::PUT, &format!("/books/{}/user", book.id), token)?
            .json(book);
        self.send(request).await?;
        Ok(())
    }

    async fn switch_in_user_library(&self, id: BookId, token: &str) -> Result<(), ApiError> {
        let request = self.authenticated(Method::POST, &format!("/books/{}/library", id), token)?;
        self.send(request).await?;
        Ok(())
    }

    async fn get_discover_page(&self, token: &str) -> Result<DiscoverPage, ApiError> {
        let request = self.authenticated(Method::GET, "/books/discover", token)?;
        self.send_json(request).await
    }

    async fn get_recent_books(&self, token: &str) -> Result<Vec<Book>, ApiError> {
        let request = self.authenticated(Method::GET, "/books/recent", token)?;
        self.send_json(request).await
    }

    async fn get_tags(&self, token: &str) -> Result<Vec<Tag>, ApiError> {
        let request = self.authenticated(Method::GET, "/tags", token)?;
        self.send_json(request).await
    }

    async fn get_books_by_tags(&self, token: &str, tags: &[String]) -> Result<Vec<Book>, ApiError> {
        let request = self
            .authenticated(Method::POST, "/books/by-tags", token)?
            .json(&BooksByTagsRequest { tags });
        self.send_json(request).await
    }
}
