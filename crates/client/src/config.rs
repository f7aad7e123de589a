//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BAKELINE_API_BASE_URL` - Base URL of the ordering backend (e.g., <https://api.bakeline.dev>)
//!
//! ## Optional
//! - `BAKELINE_TIMEOUT_SECS` - Overall per-request timeout (default: 30)
//! - `BAKELINE_SESSION_FILE` - Session token persistence path (default: .bakeline/session.json)
//! - `BAKELINE_CART_FILE` - Guest cart persistence path (default: .bakeline/cart.json)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the ordering backend.
    pub base_url: Url,
    /// Overall timeout applied to every request. There is no retry layer; a
    /// timeout surfaces to the caller as a connection error.
    pub timeout: Duration,
    /// Where the session token is persisted between runs.
    pub session_file: PathBuf,
    /// Where the guest cart is persisted between runs.
    pub cart_file: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("BAKELINE_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BAKELINE_API_BASE_URL".to_string(), e.to_string())
            })?;
        let timeout_secs = get_env_or_default("BAKELINE_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BAKELINE_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        let session_file =
            PathBuf::from(get_env_or_default("BAKELINE_SESSION_FILE", ".bakeline/session.json"));
        let cart_file =
            PathBuf::from(get_env_or_default("BAKELINE_CART_FILE", ".bakeline/cart.json"));

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            session_file,
            cart_file,
        })
    }

    /// Build a configuration directly, for tests and embedding.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(30),
            session_file: PathBuf::from(".bakeline/session.json"),
            cart_file: PathBuf::from(".bakeline/cart.json"),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
