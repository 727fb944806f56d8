//! School API configuration.
//!
//! Rosters and term calendars are read from, and finished attendance sessions
//! are posted to, the school's main API.
//!
//! - `SCHOOL_API_URL`: base URL (default: `http://localhost:8000/api`)
//! - `SCHOOL_API_TOKEN`: optional bearer token
//! - `SCHOOL_API_TIMEOUT_SECS`: per-request timeout (default: 15)

use std::env;
use std::time::Duration;

use crate::parse_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl UpstreamConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("SCHOOL_API_URL")
            .unwrap_or_else(|| "http://localhost:8000/api".to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            base_url,
            api_token: lookup("SCHOOL_API_TOKEN").filter(|t| !t.trim().is_empty()),
            timeout_secs: parse_or(lookup("SCHOOL_API_TIMEOUT_SECS"), 15),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
