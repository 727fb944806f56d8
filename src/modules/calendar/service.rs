use anyhow::anyhow;
use tracing::{debug, instrument};

use rollbook_calendar::{
    CustomPick, DateRange, RangeResolver, ResolveContext, ResolveError, TermCalendar,
};
use rollbook_core::AppError;
use rollbook_models::SessionTerms;

use crate::modules::calendar::model::{CurrentTermQuery, CurrentTermResponse, ResolveQuery};
use crate::state::AppState;

pub struct CalendarService;

impl CalendarService {
    fn resolve_error(err: ResolveError) -> AppError {
        match err {
            ResolveError::Lookup(_) => AppError::not_found(err),
            ResolveError::OutOfRange(_) => AppError::unprocessable(err),
            ResolveError::NoCalendar => {
                AppError::internal(anyhow!("Term calendar is not available"))
            }
            _ => AppError::bad_request(err),
        }
    }

    pub fn list_sessions(calendar: &TermCalendar) -> Vec<SessionTerms> {
        calendar.sessions().to_vec()
    }

    #[instrument(skip(state))]
    pub fn current_term(state: &AppState, query: CurrentTermQuery) -> CurrentTermResponse {
        let today = query.today.unwrap_or_else(|| state.clock.today());

        match state.calendar.current_term(today) {
            Some((session, term, dates)) => CurrentTermResponse {
                today,
                session: Some(session.to_string()),
                term: Some(term),
                dates: Some(dates),
            },
            None => CurrentTermResponse {
                today,
                session: None,
                term: None,
                dates: None,
            },
        }
    }

    #[instrument(skip(state))]
    pub fn resolve(state: &AppState, query: ResolveQuery) -> Result<DateRange, AppError> {
        let today = query.today.unwrap_or_else(|| state.clock.today());

        let custom = match (query.from, query.to) {
            (Some(from), Some(to)) => Some(CustomPick { from, to }),
            (None, None) => None,
            _ => {
                return Err(AppError::bad_request(anyhow!(
                    "Both from and to are required for a custom range"
                )));
            }
        };

        let ctx = ResolveContext {
            session: query.session.as_deref(),
            term: query.term,
            custom,
        };

        RangeResolver::new(&state.calendar)
            .resolve(query.frequency, today, ctx)
            .map_err(|e| {
                debug!(error = %e, "Range resolution failed");
                Self::resolve_error(e)
            })
    }
}
