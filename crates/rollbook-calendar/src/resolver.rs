//! Frequency preset → [`DateRange`] resolution.
//!
//! Weeks start on Monday. Every rule produces inclusive `[from, to]` bounds
//! which are then reduced to business days by [`DateRange::new`].

use chrono::{Datelike, Days, Months, NaiveDate};
use rollbook_models::{Frequency, Term, TermDates};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::business_days::nth_business_day;
use crate::date_range::DateRange;
use crate::term_calendar::{LookupError, TermCalendar};

/// Explicit bounds picked on a calendar widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomPick {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Selection state a preset may need beyond "today".
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveContext<'a> {
    pub session: Option<&'a str>,
    pub term: Option<Term>,
    pub custom: Option<CustomPick>,
}

impl<'a> ResolveContext<'a> {
    pub fn for_term(session: &'a str, term: Term) -> Self {
        Self {
            session: Some(session),
            term: Some(term),
            custom: None,
        }
    }

    pub fn for_session(session: &'a str) -> Self {
        Self {
            session: Some(session),
            ..Self::default()
        }
    }

    pub fn custom(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            custom: Some(CustomPick { from, to }),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no term calendar is loaded")]
    NoCalendar,
    #[error("an academic session must be selected for `{0}` ranges")]
    MissingSession(Frequency),
    #[error("a term must be selected for `{0}` ranges")]
    MissingTerm(Frequency),
    #[error("a custom range needs both a start and an end date")]
    MissingCustomPick,
    #[error("range starts on {from} after it ends on {to}")]
    InvertedRange { from: NaiveDate, to: NaiveDate },
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("`{0}` range falls outside the supported calendar")]
    OutOfRange(Frequency),
}

impl ResolveError {
    /// Lookup misses mean "no default range", not a broken request.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, ResolveError::Lookup(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RangeResolver<'a> {
    calendar: Option<&'a TermCalendar>,
}

impl<'a> RangeResolver<'a> {
    pub fn new(calendar: &'a TermCalendar) -> Self {
        Self {
            calendar: Some(calendar),
        }
    }

    /// A resolver for presets that never touch the term calendar.
    pub fn without_calendar() -> Self {
        Self { calendar: None }
    }

    pub fn resolve(
        &self,
        frequency: Frequency,
        today: NaiveDate,
        ctx: ResolveContext<'_>,
    ) -> Result<DateRange, ResolveError> {
        let (from, to) = self.bounds(frequency, today, &ctx)?;
        let range = DateRange::new(from, to).ok_or(ResolveError::InvertedRange { from, to })?;

        tracing::debug!(
            frequency = %frequency,
            %from,
            %to,
            school_days = range.valid_days().len(),
            "Resolved attendance range"
        );

        Ok(range)
    }

    fn bounds(
        &self,
        frequency: Frequency,
        today: NaiveDate,
        ctx: &ResolveContext<'_>,
    ) -> Result<(NaiveDate, NaiveDate), ResolveError> {
        let out_of_range = || ResolveError::OutOfRange(frequency);

        match frequency {
            Frequency::Week => {
                let days_left = 6 - today.weekday().num_days_from_monday();
                let sunday = today
                    .checked_add_days(Days::new(days_left.into()))
                    .ok_or_else(out_of_range)?;
                Ok((today, sunday))
            }
            Frequency::BusinessWeek => rolling(today, 5).ok_or_else(out_of_range),
            Frequency::Month => {
                let last = today
                    .with_day(1)
                    .and_then(|first| first.checked_add_months(Months::new(1)))
                    .and_then(|next_first| next_first.pred_opt())
                    .ok_or_else(out_of_range)?;
                Ok((today, last))
            }
            Frequency::Rolling7 => rolling(today, 7).ok_or_else(out_of_range),
            Frequency::NextWeek => {
                let until_monday = 7 - today.weekday().num_days_from_monday();
                let monday = today
                    .checked_add_days(Days::new(until_monday.into()))
                    .ok_or_else(out_of_range)?;
                let friday = monday
                    .checked_add_days(Days::new(4))
                    .ok_or_else(out_of_range)?;
                Ok((monday, friday))
            }
            Frequency::Rolling30 => rolling(today, 30).ok_or_else(out_of_range),
            Frequency::Term => {
                let dates = self.term_dates(frequency, ctx)?;
                // Mid-term, the range starts today rather than at term start.
                let from = if dates.contains(today) {
                    today
                } else {
                    dates.start
                };
                Ok((from, dates.end))
            }
            Frequency::HalfTerm => {
                let dates = self.term_dates(frequency, ctx)?;
                let half = u64::try_from(dates.num_days() / 2).map_err(|_| out_of_range())?;
                let midpoint = dates
                    .start
                    .checked_add_days(Days::new(half))
                    .ok_or_else(out_of_range)?;
                Ok((dates.start, midpoint))
            }
            Frequency::Session => {
                let session = ctx.session.ok_or(ResolveError::MissingSession(frequency))?;
                let span = self.calendar()?.session_span(session)?;
                Ok((span.start, span.end))
            }
            Frequency::Custom => {
                let pick = ctx.custom.ok_or(ResolveError::MissingCustomPick)?;
                if pick.from > pick.to {
                    return Err(ResolveError::InvertedRange {
                        from: pick.from,
                        to: pick.to,
                    });
                }
                Ok((pick.from, pick.to))
            }
        }
    }

    fn calendar(&self) -> Result<&'a TermCalendar, ResolveError> {
        self.calendar.ok_or(ResolveError::NoCalendar)
    }

    fn term_dates(
        &self,
        frequency: Frequency,
        ctx: &ResolveContext<'_>,
    ) -> Result<TermDates, ResolveError> {
        let session = ctx.session.ok_or(ResolveError::MissingSession(frequency))?;
        let term = ctx.term.ok_or(ResolveError::MissingTerm(frequency))?;
        Ok(self.calendar()?.term_range_for(session, term)?)
    }
}

/// `today` through the `n`-th business day counted from `today`.
fn rolling(today: NaiveDate, n: usize) -> Option<(NaiveDate, NaiveDate)> {
    nth_business_day(today, n).map(|end| (today, end))
}
