//! Attendance wizard configuration.
//!
//! - `WIZARD_MAX_OPEN`: how many wizards may be open at once (default: 256)
//! - `WIZARD_IDLE_TIMEOUT_SECS`: an open wizard untouched this long is evicted
//!   (default: 1800)
//! - `ATTENDANCE_REFERENCE_DATE`: pins "today" to a fixed `YYYY-MM-DD` date,
//!   for demos and reproducible staging data. Unset means the local date.

use std::env;
use std::time::Duration;

use chrono::NaiveDate;

use crate::parse_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WizardConfig {
    pub max_open_wizards: usize,
    pub idle_timeout: Duration,
    pub reference_date: Option<NaiveDate>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl WizardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let reference_date = lookup("ATTENDANCE_REFERENCE_DATE")
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok());

        Self {
            max_open_wizards: parse_or(lookup("WIZARD_MAX_OPEN"), 256).max(1),
            idle_timeout: Duration::from_secs(
                parse_or(lookup("WIZARD_IDLE_TIMEOUT_SECS"), 1800).max(1),
            ),
            reference_date,
        }
    }
}
