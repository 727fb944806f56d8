//! Read-only lookup of term boundaries per academic session.

use std::collections::HashMap;

use chrono::NaiveDate;
use rollbook_models::{AcademicSessionTerms, SessionTerms, Term, TermDates, TermOrderError};
use thiserror::Error;

/// A session/term pair the calendar has no dates for. Callers treat this as
/// "no default range available", never as a fatal error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("academic session `{0}` not found")]
    SessionNotFound(String),
    #[error("{term} term of session `{session}` not found")]
    TermNotFound { session: String, term: Term },
}

/// Raised while building a calendar from upstream data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("academic session `{0}` is listed more than once")]
    DuplicateSession(String),
    #[error("academic session `{session}`: {source}")]
    InvalidTerms {
        session: String,
        #[source]
        source: TermOrderError,
    },
}

#[derive(Debug, Clone, Default)]
pub struct TermCalendar {
    sessions: Vec<SessionTerms>,
    index: HashMap<String, usize>,
}

impl TermCalendar {
    /// Build a calendar, rejecting duplicate labels and inverted or
    /// overlapping terms. Session order is preserved.
    pub fn from_sessions(data: AcademicSessionTerms) -> Result<Self, CalendarError> {
        let mut index = HashMap::with_capacity(data.sessions.len());

        for (position, session) in data.sessions.iter().enumerate() {
            session
                .terms
                .check_order()
                .map_err(|source| CalendarError::InvalidTerms {
                    session: session.label.clone(),
                    source,
                })?;

            if index.insert(session.label.clone(), position).is_some() {
                return Err(CalendarError::DuplicateSession(session.label.clone()));
            }
        }

        tracing::debug!(sessions = data.sessions.len(), "Term calendar loaded");

        Ok(Self {
            sessions: data.sessions,
            index,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn sessions(&self) -> &[SessionTerms] {
        &self.sessions
    }

    pub fn session_labels(&self) -> impl Iterator<Item = &str> {
        self.sessions.iter().map(|s| s.label.as_str())
    }

    fn session(&self, label: &str) -> Result<&SessionTerms, LookupError> {
        self.index
            .get(label)
            .map(|&position| &self.sessions[position])
            .ok_or_else(|| LookupError::SessionNotFound(label.to_string()))
    }

    pub fn term_range_for(&self, session: &str, term: Term) -> Result<TermDates, LookupError> {
        self.session(session)?
            .terms
            .get(term)
            .ok_or_else(|| LookupError::TermNotFound {
                session: session.to_string(),
                term,
            })
    }

    /// First-term start to third-term end, gaps between terms included.
    pub fn session_span(&self, session: &str) -> Result<TermDates, LookupError> {
        let first = self.term_range_for(session, Term::First)?;
        let third = self.term_range_for(session, Term::Third)?;

        Ok(TermDates {
            start: first.start,
            end: third.end,
        })
    }

    /// The session and term whose dates contain `today`, if school is in.
    pub fn current_term(&self, today: NaiveDate) -> Option<(&str, Term, TermDates)> {
        self.sessions.iter().find_map(|session| {
            session
                .terms
                .iter()
                .find(|(_, dates)| dates.contains(today))
                .map(|(term, dates)| (session.label.as_str(), term, dates))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollbook_models::TermDateRange;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar() -> TermCalendar {
        TermCalendar::from_sessions(AcademicSessionTerms {
            sessions: vec![
                SessionTerms {
                    label: "2024/2025".to_string(),
                    terms: TermDateRange {
                        first: Some(TermDates {
                            start: date(2024, 9, 9),
                            end: date(2024, 12, 13),
                        }),
                        second: Some(TermDates {
                            start: date(2025, 1, 6),
                            end: date(2025, 4, 4),
                        }),
                        third: Some(TermDates {
                            start: date(2025, 4, 28),
                            end: date(2025, 7, 18),
                        }),
                    },
                },
                SessionTerms {
                    label: "2025/2026".to_string(),
                    terms: TermDateRange {
                        first: Some(TermDates {
                            start: date(2025, 9, 10),
                            end: date(2025, 12, 5),
                        }),
                        second: None,
                        third: None,
                    },
                },
            ],
        })
        .unwrap()
    }

    #[test]
    fn test_term_range_for_hits_and_misses() {
        let calendar = calendar();

        let first = calendar.term_range_for("2025/2026", Term::First).unwrap();
        assert_eq!(first.start, date(2025, 9, 10));

        assert_eq!(
            calendar.term_range_for("2025/2026", Term::Second),
            Err(LookupError::TermNotFound {
                session: "2025/2026".to_string(),
                term: Term::Second
            })
        );
        assert_eq!(
            calendar.term_range_for("1999/2000", Term::First),
            Err(LookupError::SessionNotFound("1999/2000".to_string()))
        );
    }

    #[test]
    fn test_session_span_crosses_gaps() {
        let calendar = calendar();
        let span = calendar.session_span("2024/2025").unwrap();
        assert_eq!(span.start, date(2024, 9, 9));
        assert_eq!(span.end, date(2025, 7, 18));

        assert!(calendar.session_span("2025/2026").is_err());
    }

    #[test]
    fn test_current_term() {
        let calendar = calendar();
        let (label, term, _) = calendar.current_term(date(2025, 2, 3)).unwrap();
        assert_eq!((label, term), ("2024/2025", Term::Second));

        // Easter holiday falls between terms.
        assert!(calendar.current_term(date(2025, 4, 15)).is_none());
    }

    #[test]
    fn test_labels_keep_order() {
        let labels: Vec<_> = calendar().session_labels().map(str::to_string).collect();
        assert_eq!(labels, vec!["2024/2025", "2025/2026"]);
    }

    #[test]
    fn test_rejects_duplicates_and_overlaps() {
        let session = SessionTerms {
            label: "2024/2025".to_string(),
            terms: TermDateRange::default(),
        };
        let duplicated = AcademicSessionTerms {
            sessions: vec![session.clone(), session],
        };
        assert_eq!(
            TermCalendar::from_sessions(duplicated).unwrap_err(),
            CalendarError::DuplicateSession("2024/2025".to_string())
        );

        let overlapping = AcademicSessionTerms {
            sessions: vec![SessionTerms {
                label: "2024/2025".to_string(),
                terms: TermDateRange {
                    first: Some(TermDates {
                        start: date(2024, 9, 9),
                        end: date(2025, 1, 10),
                    }),
                    second: Some(TermDates {
                        start: date(2025, 1, 6),
                        end: date(2025, 4, 4),
                    }),
                    third: None,
                },
            }],
        };
        assert!(matches!(
            TermCalendar::from_sessions(overlapping),
            Err(CalendarError::InvalidTerms { .. })
        ));
    }
}
