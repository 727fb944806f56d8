//! Weekend filtering.
//!
//! A business day is any calendar day that is not a Saturday or Sunday. Public
//! holidays are not modelled.

use chrono::{Datelike, NaiveDate, Weekday};

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Every weekday in `[from, to]`, ascending.
///
/// An interval made only of weekend days yields an empty vector, as does an
/// inverted interval (`from > to`).
pub fn filter_business_days(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    from.iter_days()
        .take_while(|day| *day <= to)
        .filter(|day| is_business_day(*day))
        .collect()
}

/// The `n`-th business day counting from `start` inclusive, so
/// `nth_business_day(monday, 1) == Some(monday)`.
///
/// Returns `None` for `n == 0` or when the count runs off the end of the
/// supported date range.
pub fn nth_business_day(start: NaiveDate, n: usize) -> Option<NaiveDate> {
    let index = n.checked_sub(1)?;
    start
        .iter_days()
        .filter(|day| is_business_day(*day))
        .nth(index)
}
