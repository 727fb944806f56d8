use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use rollbook_core::AppError;
use rollbook_models::{AttendancePatch, StudentId, WizardId};

use crate::modules::wizard::model::{
    CustomPick, SetClassDto, SetFrequencyDto, SetSessionDto, SetTermDto, WizardView,
};
use crate::modules::wizard::service::WizardService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Open a new attendance wizard at the Details step
#[utoipa::path(
    post,
    path = "/api/attendance/wizards",
    summary = "Open wizard",
    responses(
        (status = 201, description = "Wizard opened", body = WizardView),
        (status = 429, description = "Too many open wizards")
    ),
    tag = "Attendance Wizard"
)]
#[instrument(skip(state))]
pub async fn open_wizard(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<WizardView>), AppError> {
    let view = WizardService::open_wizard(&state)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Get the current state of a wizard
#[utoipa::path(
    get,
    path = "/api/attendance/wizards/{id}",
    summary = "Get wizard",
    params(
        ("id" = Uuid, Path, description = "Wizard ID")
    ),
    responses(
        (status = 200, description = "Wizard state", body = WizardView),
        (status = 404, description = "Wizard not found")
    ),
    tag = "Attendance Wizard"
)]
#[instrument(skip(state))]
pub async fn get_wizard(
    State(state): State<AppState>,
    Path(id): Path<WizardId>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(WizardService::get_wizard(&state, id)?))
}

/// Cancel a wizard and discard its draft
#[utoipa::path(
    delete,
    path = "/api/attendance/wizards/{id}",
    summary = "Cancel wizard",
    params(
        ("id" = Uuid, Path, description = "Wizard ID")
    ),
    responses(
        (status = 204, description = "Wizard cancelled"),
        (status = 404, description = "Wizard not found")
    ),
    tag = "Attendance Wizard"
)]
#[instrument(skip(state))]
pub async fn cancel_wizard(
    State(state): State<AppState>,
    Path(id): Path<WizardId>,
) -> Result<StatusCode, AppError> {
    WizardService::cancel_wizard(&state, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Clear the draft and return to the Details step
#[utoipa::path(
    post,
    path = "/api/attendance/wizards/{id}/reset",
    summary = "Reset wizard",
    params(
        ("id" = Uuid, Path, description = "Wizard ID")
    ),
    responses(
        (status = 200, description = "Wizard reset", body = WizardView),
        (status = 404, description = "Wizard not found")
    ),
    tag = "Attendance Wizard"
)]
#[instrument(skip(state))]
pub async fn reset_wizard(
    State(state): State<AppState>,
    Path(id): Path<WizardId>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(WizardService::reset(&state, id)?))
}

/// Move to the next step. Returns the unchanged wizard when the current step is incomplete.
#[utoipa::path(
    post,
    path = "/api/attendance/wizards/{id}/advance",
    summary = "Advance wizard",
    params(
        ("id" = Uuid, Path, description = "Wizard ID")
    ),
    responses(
        (status = 200, description = "Wizard after the transition", body = WizardView),
        (status = 404, description = "Wizard not found")
    ),
    tag = "Attendance Wizard"
)]
#[instrument(skip(state))]
pub async fn advance_wizard(
    State(state): State<AppState>,
    Path(id): Path<WizardId>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(WizardService::advance(&state, id)?))
}

/// Go back one step
#[utoipa::path(
    post,
    path = "/api/attendance/wizards/{id}/back",
    summary = "Step back",
    params(
        ("id" = Uuid, Path, description = "Wizard ID")
    ),
    responses(
        (status = 200, description = "Wizard after the transition", body = WizardView),
        (status = 404, description = "Wizard not found")
    ),
    tag = "Attendance Wizard"
)]
#[instrument(skip(state))]
pub async fn back_wizard(
    State(state): State<AppState>,
    Path(id): Path<WizardId>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(WizardService::back(&state, id)?))
}

/// Submit the previewed attendance session to the school API
#[utoipa::path(
    post,
    path = "/api/attendance/wizards/{id}/submit",
    summary = "Submit attendance",
    params(
        ("id" = Uuid, Path, description = "Wizard ID")
    ),
    responses(
        (status = 200, description = "Submitted (step is closed) or not ready (unchanged)", body = WizardView),
        (status = 404, description = "Wizard not found or cancelled during submission"),
        (status = 502, description = "School API rejected the submission, draft kept")
    ),
    tag = "Attendance Wizard"
)]
#[instrument(skip(state))]
pub async fn submit_wizard(
    State(state): State<AppState>,
    Path(id): Path<WizardId>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(WizardService::submit(&state, id).await?))
}

/// Select the class and load its roster
#[utoipa::path(
    put,
    path = "/api/attendance/wizards/{id}/class",
    summary = "Set class",
    params(
        ("id" = Uuid, Path, description = "Wizard ID")
    ),
    request_body = SetClassDto,
    responses(
        (status = 200, description = "Class set and roster loaded", body = WizardView),
        (status = 404, description = "Wizard not found"),
        (status = 502, description = "Roster could not be fetched")
    ),
    tag = "Attendance Wizard"
)]
#[instrument(skip(state))]
pub async fn set_class(
    State(state): State<AppState>,
    Path(id): Path<WizardId>,
    Json(dto): Json<SetClassDto>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(WizardService::set_class(&state, id, dto.class_id).await?))
}

/// Select the academic session
#[utoipa::path(
    put,
    path = "/api/attendance/wizards/{id}/session",
    summary = "Set session",
    params(
        ("id" = Uuid, Path, description = "Wizard ID")
    ),
    request_body = SetSessionDto,
    responses(
        (status = 200, description = "Session set", body = WizardView),
        (status = 404, description = "Wizard not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Attendance Wizard"
)]
#[instrument(skip(state))]
pub async fn set_session(
    State(state): State<AppState>,
    Path(id): Path<WizardId>,
    ValidatedJson(dto): ValidatedJson<SetSessionDto>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(WizardService::set_session(&state, id, dto.session)?))
}

/// Select the term; the range defaults to that term
#[utoipa::path(
    put,
    path = "/api/attendance/wizards/{id}/term",
    summary = "Set term",
    params(
        ("id" = Uuid, Path, description = "Wizard ID")
    ),
    request_body = SetTermDto,
    responses(
        (status = 200, description = "Term set", body = WizardView),
        (status = 404, description = "Wizard not found")
    ),
    tag = "Attendance Wizard"
)]
#[instrument(skip(state))]
pub async fn set_term(
    State(state): State<AppState>,
    Path(id): Path<WizardId>,
    Json(dto): Json<SetTermDto>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(WizardService::set_term(&state, id, dto.term)?))
}

/// Pick a range preset
#[utoipa::path(
    put,
    path = "/api/attendance/wizards/{id}/frequency",
    summary = "Set frequency",
    params(
        ("id" = Uuid, Path, description = "Wizard ID")
    ),
    request_body = SetFrequencyDto,
    responses(
        (status = 200, description = "Frequency set", body = WizardView),
        (status = 404, description = "Wizard not found")
    ),
    tag = "Attendance Wizard"
)]
#[instrument(skip(state))]
pub async fn set_frequency(
    State(state): State<AppState>,
    Path(id): Path<WizardId>,
    Json(dto): Json<SetFrequencyDto>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(WizardService::set_frequency(&state, id, dto.frequency)?))
}

/// Set explicit range bounds; switches the frequency to custom
#[utoipa::path(
    put,
    path = "/api/attendance/wizards/{id}/custom-range",
    summary = "Set custom range",
    params(
        ("id" = Uuid, Path, description = "Wizard ID")
    ),
    request_body = CustomPick,
    responses(
        (status = 200, description = "Range set", body = WizardView),
        (status = 400, description = "Range starts after it ends, previous range kept"),
        (status = 404, description = "Wizard not found")
    ),
    tag = "Attendance Wizard"
)]
#[instrument(skip(state))]
pub async fn set_custom_range(
    State(state): State<AppState>,
    Path(id): Path<WizardId>,
    Json(pick): Json<CustomPick>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(WizardService::set_custom_range(
        &state, id, pick.from, pick.to,
    )?))
}

/// Update one student's status and/or remarks
#[utoipa::path(
    patch,
    path = "/api/attendance/wizards/{id}/records/{student_id}",
    summary = "Update attendance record",
    params(
        ("id" = Uuid, Path, description = "Wizard ID"),
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    request_body = AttendancePatch,
    responses(
        (status = 200, description = "Record updated", body = WizardView),
        (status = 404, description = "Wizard or student not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Attendance Wizard"
)]
#[instrument(skip(state))]
pub async fn update_record(
    State(state): State<AppState>,
    Path((id, student_id)): Path<(WizardId, StudentId)>,
    ValidatedJson(patch): ValidatedJson<AttendancePatch>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(WizardService::update_record(
        &state, id, student_id, patch,
    )?))
}

/// Mark every rostered student present
#[utoipa::path(
    post,
    path = "/api/attendance/wizards/{id}/records/mark-all-present",
    summary = "Mark all present",
    params(
        ("id" = Uuid, Path, description = "Wizard ID")
    ),
    responses(
        (status = 200, description = "All records set to present", body = WizardView),
        (status = 404, description = "Wizard not found")
    ),
    tag = "Attendance Wizard"
)]
#[instrument(skip(state))]
pub async fn mark_all_present(
    State(state): State<AppState>,
    Path(id): Path<WizardId>,
) -> Result<Json<WizardView>, AppError> {
    Ok(Json(WizardService::mark_all_present(&state, id)?))
}
