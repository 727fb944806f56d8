use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{current_term, list_sessions, resolve_range};

/// Initialize the calendar router
/// Routes: GET /sessions, GET /current, GET /resolve
pub fn init_calendar_router() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list_sessions))
        .route("/current", get(current_term))
        .route("/resolve", get(resolve_range))
}
