use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::business_days::filter_business_days;

/// Inclusive date bounds plus the school days they contain.
///
/// `valid_days` is always derived from `from`/`to` at construction, so the
/// displayed bounds and the school-day count cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
    valid_days: Vec<NaiveDate>,
}

impl DateRange {
    /// Returns `None` when `from` is after `to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        if from > to {
            return None;
        }

        Some(Self {
            from,
            to,
            valid_days: filter_business_days(from, to),
        })
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Weekdays in `[from, to]`, ascending.
    pub fn valid_days(&self) -> &[NaiveDate] {
        &self.valid_days
    }

    /// True when the range holds no school day at all.
    pub fn is_empty(&self) -> bool {
        self.valid_days.is_empty()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}
