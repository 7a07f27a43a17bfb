//! Top-level configuration.
//!
//! Everything has a sensible default so `DevscoutConfig::default()` talks to
//! the public rmtDev API out of the box. The base URL can be overridden via
//! the `DEVSCOUT_API_URL` environment variable, which takes precedence over
//! the configured value.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DevscoutError, Result};

/// Default job API endpoint.
pub const DEFAULT_API_URL: &str = "https://bytegrad.com/course-assets/projects/rmtdev/api/data";

/// Delay between the last keystroke and the debounced search commit.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Age after which a cached fetch result is eligible for background refresh.
pub const STALE_AFTER: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevscoutConfig {
    /// Base URL of the job API.
    pub api_base_url: String,

    /// Debounce delay for search text, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Override for the key/value storage directory. `None` uses the
    /// platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

fn default_debounce_ms() -> u64 {
    SEARCH_DEBOUNCE.as_millis() as u64
}

impl Default for DevscoutConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            debounce_ms: default_debounce_ms(),
            storage_dir: None,
        }
    }
}

impl DevscoutConfig {
    /// Resolve the effective API base URL.
    ///
    /// The `DEVSCOUT_API_URL` environment variable wins over the configured
    /// value. Returns `Config` errors for URLs that don't parse.
    pub fn api_url(&self) -> Result<Url> {
        let raw = match env::var("DEVSCOUT_API_URL") {
            Ok(v) if !v.is_empty() => v,
            _ => self.api_base_url.clone(),
        };
        Url::parse(&raw)
            .map_err(|e| DevscoutError::Config(format!("invalid API base URL '{raw}': {e}")))
    }

    /// Debounce delay as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
