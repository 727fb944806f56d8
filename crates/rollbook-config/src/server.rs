//! HTTP server configuration.
//!
//! - `APP_HOST`: interface to bind (default: `0.0.0.0`)
//! - `APP_PORT`: port to bind (default: `3000`)
//! - `ALLOWED_ORIGINS`: comma-separated CORS origins
//!   (default: `http://localhost:3000,http://localhost:5173`)
//! - `LOG_DIR`: directory for rolling log files (default: `storage/logs`)

use std::env;

use crate::parse_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub log_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(lookup("APP_PORT"), 3000),
            allowed_origins,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "storage/logs".to_string()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.allowed_origins.len(), 2);
        assert_eq!(config.log_dir, "storage/logs");
    }

    #[test]
    fn test_origins_are_trimmed_and_filtered() {
        let config = ServerConfig::from_lookup(|key| match key {
            "ALLOWED_ORIGINS" => Some(" https://a.school , ,https://b.school".to_string()),
            "APP_PORT" => Some("8080".to_string()),
            _ => None,
        });
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.school", "https://b.school"]
        );
        assert_eq!(config.port, 8080);
    }
}
