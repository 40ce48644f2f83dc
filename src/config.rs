//! Client configuration.
//!
//! The backend base URL and request timeout are resolved once at startup and
//! passed explicitly into the API client at construction. Precedence:
//! command-line flag, then environment variable, then built-in default.

use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "TODO_API_URL";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything the API client needs to know about the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Resolve the config from optional flag values and the environment.
    pub fn resolve(api_url_flag: Option<String>, timeout_secs_flag: Option<u64>) -> Self {
        let base_url = api_url_flag
            .or_else(|| env::var(API_URL_ENV).ok().filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = match timeout_secs_flag {
            Some(0) => {
                tracing::warn!("--timeout-secs 0 is not usable, falling back to default");
                DEFAULT_TIMEOUT_SECS
            }
            Some(secs) => secs,
            None => DEFAULT_TIMEOUT_SECS,
        };

        ClientConfig {
            base_url: normalize_base_url(&base_url),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Trim trailing slashes so endpoint paths can be appended directly.
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
