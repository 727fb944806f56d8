//! Term and academic-session calendar models.
//!
//! An academic session (e.g. `"2024/2025"`) is split into exactly three terms.
//! Each term has inclusive start and end dates. Terms within a session are
//! chronological and never overlap, but gaps between them (holidays) are legal.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// One of the three sub-periods of an academic session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    First,
    Second,
    Third,
}

impl Term {
    pub const ALL: [Term; 3] = [Term::First, Term::Second, Term::Third];

    pub fn as_str(self) -> &'static str {
        match self {
            Term::First => "first",
            Term::Second => "second",
            Term::Third => "third",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown term `{0}` (expected first, second or third)")]
pub struct ParseTermError(pub String);

impl FromStr for Term {
    type Err = ParseTermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "1" => Ok(Term::First),
            "second" | "2" => Ok(Term::Second),
            "third" | "3" => Ok(Term::Third),
            other => Err(ParseTermError(other.to_string())),
        }
    }
}

/// Inclusive date boundaries of a single term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TermDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TermDates {
    /// Returns `None` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whole days between `start` and `end`; zero for a single-day term.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermOrderError {
    #[error("{term} term starts on {start} after it ends on {end}")]
    Inverted {
        term: Term,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("{later} term must start after the {earlier} term ends")]
    Overlapping { earlier: Term, later: Term },
}

/// Term boundaries for one academic session. Missing terms are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TermDateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<TermDates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<TermDates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third: Option<TermDates>,
}

impl TermDateRange {
    pub fn get(&self, term: Term) -> Option<TermDates> {
        match term {
            Term::First => self.first,
            Term::Second => self.second,
            Term::Third => self.third,
        }
    }

    pub fn set(&mut self, term: Term, dates: TermDates) {
        match term {
            Term::First => self.first = Some(dates),
            Term::Second => self.second = Some(dates),
            Term::Third => self.third = Some(dates),
        }
    }

    /// Present terms in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (Term, TermDates)> + '_ {
        Term::ALL
            .into_iter()
            .filter_map(|term| self.get(term).map(|dates| (term, dates)))
    }

    /// Every term has `start <= end` and each term ends before the next begins.
    pub fn check_order(&self) -> Result<(), TermOrderError> {
        let mut previous: Option<(Term, TermDates)> = None;

        for (term, dates) in self.iter() {
            if dates.start > dates.end {
                return Err(TermOrderError::Inverted {
                    term,
                    start: dates.start,
                    end: dates.end,
                });
            }
            if let Some((earlier, earlier_dates)) = previous
                && earlier_dates.end >= dates.start
            {
                return Err(TermOrderError::Overlapping {
                    earlier,
                    later: term,
                });
            }
            previous = Some((term, dates));
        }

        Ok(())
    }
}

fn validate_term_order(session: &SessionTerms) -> Result<(), ValidationError> {
    session.terms.check_order().map_err(|e| {
        ValidationError::new("term_order").with_message(format!("{}: {}", session.label, e).into())
    })
}

/// A labelled academic session and its term boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_term_order"))]
pub struct SessionTerms {
    /// Session label, e.g. `"2024/2025"`
    #[validate(length(min = 1, max = 50))]
    pub label: String,
    pub terms: TermDateRange,
}

/// Every academic session known to the school, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct AcademicSessionTerms {
    #[validate(nested)]
    pub sessions: Vec<SessionTerms>,
}

impl AcademicSessionTerms {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.sessions.iter().map(|s| s.label.as_str())
    }
}
