use std::fmt::Debug;

use chrono::{Local, NaiveDate};

/// Source of the reference date used by range presets.
pub trait Clock: Debug + Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The host's local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
