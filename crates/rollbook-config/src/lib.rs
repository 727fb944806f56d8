//! # Rollbook Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`server`]: bind address and CORS origins
//! - [`upstream`]: the school API that supplies rosters and receives attendance
//! - [`wizard`]: limits and overrides for attendance wizards
//!
//! # Example
//!
//! ```ignore
//! use rollbook_config::{ServerConfig, UpstreamConfig, WizardConfig};
//!
//! let server = ServerConfig::from_env();
//! let upstream = UpstreamConfig::from_env();
//! let wizard = WizardConfig::from_env();
//! ```

pub mod server;
pub mod upstream;
pub mod wizard;

pub use server::ServerConfig;
pub use upstream::UpstreamConfig;
pub use wizard::WizardConfig;

/// Parse an optional raw value, falling back to `default` when it is absent or malformed.
pub(crate) fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::parse_or;

    #[test]
    fn test_parse_or_uses_default_on_missing_or_garbage() {
        assert_eq!(parse_or::<u16>(None, 3000), 3000);
        assert_eq!(parse_or::<u16>(Some("abc".into()), 3000), 3000);
        assert_eq!(parse_or::<u16>(Some(" 8080 ".into()), 3000), 8080);
    }
}
