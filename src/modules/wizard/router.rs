use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

use super::controller::{
    advance_wizard, back_wizard, cancel_wizard, get_wizard, mark_all_present, open_wizard,
    reset_wizard, set_class, set_custom_range, set_frequency, set_session, set_term,
    submit_wizard, update_record,
};

/// Initialize the attendance wizard router
/// Routes: POST /, GET /{id}, DELETE /{id}, step transitions and record edits under /{id}
pub fn init_wizard_router() -> Router<AppState> {
    Router::new()
        .route("/", post(open_wizard))
        .route("/{id}", get(get_wizard).delete(cancel_wizard))
        .route("/{id}/reset", post(reset_wizard))
        .route("/{id}/advance", post(advance_wizard))
        .route("/{id}/back", post(back_wizard))
        .route("/{id}/submit", post(submit_wizard))
        .route("/{id}/class", put(set_class))
        .route("/{id}/session", put(set_session))
        .route("/{id}/term", put(set_term))
        .route("/{id}/frequency", put(set_frequency))
        .route("/{id}/custom-range", put(set_custom_range))
        .route("/{id}/records/mark-all-present", post(mark_all_present))
        .route("/{id}/records/{student_id}", patch(update_record))
}
