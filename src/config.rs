//! Application configuration and environment variable parsing.
//!
//! This module handles loading configuration settings from the environment (e.g., .env file).
//! It defines the `AppConfig` struct which governs the upstream API location, response
//! cache behaviour, and the defaults used when building pull request queries.

use serde::Deserialize;
use std::time::Duration as StdDuration;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Base URL of the upstream insights API (e.g. "https://api.example.com/v1").
    pub api_base_url: String,

    /// Time to live for cached upstream responses in seconds.
    pub cache_ttl_seconds: u64,

    /// Maximum number of endpoint responses to keep in the cache.
    pub cache_max_capacity: u64,

    /// Page size used by the pull request pager when the caller does not supply one.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Trailing window (in days) used for contributor activity when no range is given.
    #[serde(default = "default_range_days")]
    pub contribution_range_days: u32,

    /// Timeout applied to every upstream request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_limit() -> u32 {
    1000
}

fn default_range_days() -> u32 {
    30
}

fn default_request_timeout() -> u64 {
    30
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn cache_ttl(&self) -> StdDuration {
        StdDuration::from_secs(self.cache_ttl_seconds)
    }

    pub fn request_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.request_timeout_seconds)
    }
}
