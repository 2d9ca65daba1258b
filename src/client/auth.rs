/**
 * Session Module
 *
 * Keeps the user's API token in the local key-value store together with
 * its absolute expiry, and drives login/signup/logout against the API.
 */
use crate::client::api::{ApiClient, ApiError, LoginRequest, LoginResponse, SignupRequest};
use crate::client::local_store::{KeyValueStore, StorageError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Store key holding the JWT
pub const JWT_TOKEN_KEY: &str = "@libras_jwt_token";
/// Store key holding the expiry, in milliseconds since the Unix epoch
pub const JWT_EXPIRES_KEY: &str = "@libras_jwt_expires";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Persisted authentication session
#[derive(Debug, Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist a token valid for `expires_in_ms` milliseconds from `now`
    pub async fn store_token_at(
        &self,
        token: &str,
        expires_in_ms: i64,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let expires_at = now.timestamp_millis().saturating_add(expires_in_ms);
        self.store.set(JWT_TOKEN_KEY, token).await?;
        self.store.set(JWT_EXPIRES_KEY, &expires_at.to_string()).await?;
        Ok(())
    }

    pub async fn store_token(&self, token: &str, expires_in_ms: i64) -> Result<(), StorageError> {
        self.store_token_at(token, expires_in_ms, Utc::now()).await
    }

    /// Current token as of `now`, clearing it if it has expired.
    ///
    /// Storage failures and unreadable expiry values yield `None`.
    pub async fn token_at(&self, now: DateTime<Utc>) -> Option<String> {
        let token = match self.store.get(JWT_TOKEN_KEY).await {
            Ok(token) => token?,
            Err(e) => {
                tracing::error!("[SESSION] Failed to read token: {}", e);
                return None;
            }
        };
        let expires_at = match self.store.get(JWT_EXPIRES_KEY).await {
            Ok(Some(raw)) => raw.parse::<i64>().ok()?,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!("[SESSION] Failed to read token expiry: {}", e);
                return None;
            }
        };

        if now.timestamp_millis() >= expires_at {
            tracing::info!("[SESSION] Token expired, clearing session");
            if let Err(e) = self.clear().await {
                tracing::error!("[SESSION] Failed to clear expired token: {}", e);
            }
            return None;
        }

        Some(token)
    }

    pub async fn token(&self) -> Option<String> {
        self.token_at(Utc::now()).await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token().await.is_some()
    }

    /// Remove the stored token
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(JWT_TOKEN_KEY).await?;
        self.store.remove(JWT_EXPIRES_KEY).await?;
        Ok(())
    }

    /// Log in and persist the returned token
    pub async fn login(
        &self,
        api: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, SessionError> {
        let response = api
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        self.store_token(&response.token, response.expires_in).await?;
        tracing::info!("[SESSION] Logged in as {}", email);
        Ok(response)
    }

    /// Create an account and persist the returned token
    pub async fn signup(
        &self,
        api: &ApiClient,
        email: &str,
        password: &str,
        displayname: &str,
    ) -> Result<LoginResponse, SessionError> {
        let response = api
            .signup(&SignupRequest {
                email: email.to_string(),
                password: password.to_string(),
                displayname: displayname.to_string(),
            })
            .await?;
        self.store_token(&response.token, response.expires_in).await?;
        tracing::info!("[SESSION] Registered {}", email);
        Ok(response)
    }

    pub async fn logout(&self) -> Result<(), StorageError> {
        self.clear().await?;
        tracing::info!("[SESSION] Logged out");
        Ok(())
    }
}
