use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use rollbook_calendar::DateRange;
use rollbook_core::AppError;
use rollbook_models::SessionTerms;

use crate::modules::calendar::model::{CurrentTermQuery, CurrentTermResponse, ResolveQuery};
use crate::modules::calendar::service::CalendarService;
use crate::state::AppState;

/// List academic sessions with their term dates, in calendar order
#[utoipa::path(
    get,
    path = "/api/calendar/sessions",
    summary = "List sessions",
    responses(
        (status = 200, description = "Academic sessions", body = Vec<SessionTerms>)
    ),
    tag = "Calendar"
)]
#[instrument(skip(state))]
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionTerms>> {
    Json(CalendarService::list_sessions(&state.calendar))
}

/// Get the session and term in progress today
#[utoipa::path(
    get,
    path = "/api/calendar/current",
    summary = "Current term",
    params(CurrentTermQuery),
    responses(
        (status = 200, description = "Current term, empty between terms", body = CurrentTermResponse)
    ),
    tag = "Calendar"
)]
#[instrument(skip(state))]
pub async fn current_term(
    State(state): State<AppState>,
    Query(query): Query<CurrentTermQuery>,
) -> Json<CurrentTermResponse> {
    Json(CalendarService::current_term(&state, query))
}

/// Resolve a frequency preset to a date range and its school days
#[utoipa::path(
    get,
    path = "/api/calendar/resolve",
    summary = "Resolve range",
    params(ResolveQuery),
    responses(
        (status = 200, description = "Resolved range", body = DateRange),
        (status = 400, description = "Missing selection or inverted custom range"),
        (status = 404, description = "Session or term not in the calendar"),
        (status = 422, description = "Range outside the supported calendar")
    ),
    tag = "Calendar"
)]
#[instrument(skip(state))]
pub async fn resolve_range(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<DateRange>, AppError> {
    Ok(Json(CalendarService::resolve(&state, query)?))
}
