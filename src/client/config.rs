use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use std::path::{Path, PathBuf};

/// Default API base URL
const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Environment variables read by [`Config::from_env`]
pub const ENV_API_BASE_URL: &str = "LIBRAS_API_BASE_URL";
pub const ENV_API_KEY: &str = "LIBRAS_API_KEY";
pub const ENV_DB_PATH: &str = "LIBRAS_DB_PATH";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "LIBRAS_REQUEST_TIMEOUT_SECS";

/// Client configuration wrapper.
#[derive(Debug, Clone, Default)]
pub struct Config {
    app: AppConfig,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.build()?;
        Ok(Self { app })
    }

    /// Build the configuration from `LIBRAS_*` environment variables.
    ///
    /// A `.env` file in the working directory is loaded first when present;
    /// variables already set in the process environment take precedence.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_env_file(dotenv::dotenv().map(|_| ()));
        Self::from_process_env()
    }

    /// Like [`from_env`](Self::from_env), loading `path` instead of `./.env`
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_env_file(dotenv::from_path(path.as_ref()));
        Self::from_process_env()
    }

    fn from_process_env() -> Result<Self, ConfigError> {
        let mut builder = AppConfig::builder();
        if let Ok(url) = std::env::var(ENV_API_BASE_URL) {
            builder = builder.api_base_url(url);
        }
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            builder = builder.api_key(key);
        }
        if let Ok(path) = std::env::var(ENV_DB_PATH) {
            builder = builder.database_path(path);
        }
        if let Ok(raw) = std::env::var(ENV_REQUEST_TIMEOUT_SECS) {
            let secs = raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                field: "request_timeout_secs",
                message: e.to_string(),
            })?;
            builder = builder.request_timeout_secs(secs);
        }
        Self::with_builder(builder)
    }

    /// Load the configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let mut app: AppConfig = toml::from_str(&raw)?;
        if let Some(url) = app.api_base_url.take() {
            app.api_base_url = Some(url.trim_end_matches('/').to_string());
        }
        app.validate()?;
        Ok(Self { app })
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url(), path)
    }

    pub fn api_base_url(&self) -> &str {
        self.app.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// API key, empty when not configured
    pub fn api_key(&self) -> &str {
        self.app.api_key.as_deref().unwrap_or("")
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.app.request_timeout_secs())
    }

    /// Path of the local store, defaulting to the platform data directory
    pub fn database_path(&self) -> PathBuf {
        match &self.app.database_path {
            Some(path) => path.clone(),
            None => {
                let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
                path.push("libras");
                path.push("local.db");
                path
            }
        }
    }
}

/// Apply a `.env` load result. A missing file is normal; anything else is
/// logged and the process environment is used as is.
fn load_env_file(result: dotenv::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) if e.not_found() => false,
        Err(e) => {
            tracing::warn!("[CONFIG] Ignoring unreadable env file: {}", e);
            false
        }
    }
}
