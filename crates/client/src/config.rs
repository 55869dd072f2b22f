//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ITORG_API_BASE` - Base URL of the portal API (default: `http://127.0.0.1:8000`)
//! - `ITORG_SESSION_FILE` - Where the session token is persisted
//!   (default: `$HOME/.itorg/session.json`, or `.itorg-session.json` when
//!   `HOME` is unset)
//! - `ITORG_API_TIMEOUT_SECS` - Per-request deadline in seconds (default: none)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// API endpoint used when `ITORG_API_BASE` is not set.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

const SESSION_DIR: &str = ".itorg";
const SESSION_FILE_NAME: &str = "session.json";
const FALLBACK_SESSION_FILE: &str = ".itorg-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Portal client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every API path is appended to
    pub api_base: Url,
    /// JSON file holding the persisted session
    pub session_file: PathBuf,
    /// Deadline for a single request; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_base = parse_api_base(&get("ITORG_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()))?;

        let session_file = get("ITORG_SESSION_FILE").map_or_else(
            || default_session_file(get("HOME")),
            PathBuf::from,
        );

        let request_timeout = get("ITORG_API_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| {
                        ConfigError::InvalidEnvVar("ITORG_API_TIMEOUT_SECS".to_string(), e.to_string())
                    })
                    .and_then(|secs| {
                        if secs == 0 {
                            Err(ConfigError::InvalidEnvVar(
                                "ITORG_API_TIMEOUT_SECS".to_string(),
                                "must be greater than zero".to_string(),
                            ))
                        } else {
                            Ok(Duration::from_secs(secs))
                        }
                    })
            })
            .transpose()?;

        Ok(Self {
            api_base,
            session_file,
            request_timeout,
        })
    }

    /// Configuration pointing at `api_base` with no deadline.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `api_base` is not an absolute http(s) URL.
    pub fn for_endpoint(api_base: &str, session_file: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: parse_api_base(api_base)?,
            session_file: session_file.into(),
            request_timeout: None,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and check the API base URL.
fn parse_api_base(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("ITORG_API_BASE".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "ITORG_API_BASE".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidEnvVar(
            "ITORG_API_BASE".to_string(),
            "must not contain a query or fragment".to_string(),
        ));
    }

    Ok(url)
}

fn default_session_file(home: Option<String>) -> PathBuf {
    home.map_or_else(
        || PathBuf::from(FALLBACK_SESSION_FILE),
        |home| PathBuf::from(home).join(SESSION_DIR).join(SESSION_FILE_NAME),
    )
}
