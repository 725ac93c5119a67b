//! Client configuration.

use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Where the remote service lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Sent as the `API-KEY` header when present.
    pub api_key: Option<String>,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: None,
        }
    }

    /// Reads `TODOLIST_API_URL`, `TODOLIST_API_KEY` and
    /// `TODOLIST_API_TIMEOUT_MS`. Unset or unparsable values fall back to the
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("TODOLIST_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key: env::var("TODOLIST_API_KEY").ok().filter(|key| !key.is_empty()),
            timeout: env::var("TODOLIST_API_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
