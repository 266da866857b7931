//! Configuration
//!
//! Layered configuration for the repository filesystem: built-in defaults, the
//! global config file, an explicit config file, then `NEXUSFS__*` environment
//! variables (highest precedence).

mod facade;
mod merge;
pub mod paths;
mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::remote::retry::RetryPolicy;
use crate::remote::source::{DEFAULT_DETAIL_CONCURRENCY, DEFAULT_MAX_PAGES};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NexusConfig {
    /// Base URL of the repository manager, e.g. `https://nexus.host`
    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub username: String,

    #[serde(default, skip_serializing)]
    pub password: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub listing: ListingConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Asset listing behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Upper bound on pages fetched in one pass
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Fetch asset detail and size for every listed asset
    #[serde(default = "default_true")]
    pub fetch_details: bool,

    /// Detail lookups in flight at once
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,
}

/// Retry behaviour for transport calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

fn default_detail_concurrency() -> usize {
    DEFAULT_DETAIL_CONCURRENCY
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> usize {
    3
}

fn default_delay_ms() -> u64 {
    500
}

impl Default for NexusConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            username: String::new(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
            listing: ListingConfig::default(),
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            fetch_details: default_true(),
            detail_concurrency: default_detail_concurrency(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

impl NexusConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn endpoint_url_is_valid(endpoint: &str) -> bool {
        let Some(rest) = endpoint
            .strip_prefix("https://")
            .or_else(|| endpoint.strip_prefix("http://"))
        else {
            return false;
        };

        if rest.is_empty() || rest.chars().any(char::is_whitespace) {
            return false;
        }

        let authority = rest.split('/').next().unwrap_or_default();
        let host_port = authority.rsplit('@').next().unwrap_or(authority);
        let host = if host_port.starts_with('[') {
            let Some(end_bracket) = host_port.find(']') else {
                return false;
            };
            &host_port[1..end_bracket]
        } else {
            host_port.split(':').next().unwrap_or_default()
        };

        !host.is_empty()
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("Endpoint is required (set endpoint or NEXUSFS__ENDPOINT)".to_string());
        }
        if !Self::endpoint_url_is_valid(self.endpoint.trim()) {
            return Err(format!("Invalid endpoint URL: {}", self.endpoint));
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be positive".to_string());
        }
        if self.listing.max_pages == 0 {
            return Err("listing.max_pages must be positive".to_string());
        }
        if self.listing.detail_concurrency == 0 {
            return Err("listing.detail_concurrency must be positive".to_string());
        }
        if self.retry.max_attempts == 0 {
            return Err("retry.max_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}
