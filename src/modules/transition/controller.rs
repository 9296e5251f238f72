use anyhow::anyhow;
use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;
use validator::Validate;

use scholaris_core::{AppError, ErrorResponse};

use crate::modules::transition::academic_year::current_academic_year_now;
use crate::modules::transition::model::{
    AcademicYearQuery, CurrentAcademicYearResponse, PreviewRow, TransitionRequest,
    TransitionResult,
};
use crate::modules::transition::service::TransitionService;
use crate::state::AppState;
use crate::store::SchoolStore;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/transitions/current-year",
    responses(
        (status = 200, description = "Academic year of today's date", body = CurrentAcademicYearResponse)
    ),
    tag = "Transitions"
)]
pub async fn get_current_academic_year() -> Json<CurrentAcademicYearResponse> {
    Json(CurrentAcademicYearResponse {
        academic_year: current_academic_year_now(),
    })
}

#[utoipa::path(
    get,
    path = "/api/transitions/preview",
    params(AcademicYearQuery),
    responses(
        (status = 200, description = "Expected approvals per class", body = Vec<PreviewRow>),
        (status = 400, description = "Missing or malformed academic_year", body = ErrorResponse),
        (status = 422, description = "academic_year out of range", body = ErrorResponse)
    ),
    tag = "Transitions"
)]
#[instrument(skip(state))]
pub async fn preview_transition<S>(
    State(state): State<AppState<S>>,
    Query(query): Query<AcademicYearQuery>,
) -> Result<Json<Vec<PreviewRow>>, AppError>
where
    S: SchoolStore + Clone + 'static,
{
    query.validate().map_err(AppError::unprocessable)?;

    let rows = TransitionService::new(&state.store, state.transition_config)
        .transition_preview(query.academic_year)
        .await;

    Ok(Json(rows))
}

#[utoipa::path(
    post,
    path = "/api/transitions",
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Run summary; check `errors` for partial failures", body = TransitionResult),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 409, description = "A transition is already running", body = ErrorResponse),
        (status = 422, description = "academic_year out of range", body = ErrorResponse)
    ),
    tag = "Transitions"
)]
#[instrument(skip(state))]
pub async fn execute_transition<S>(
    State(state): State<AppState<S>>,
    ValidatedJson(request): ValidatedJson<TransitionRequest>,
) -> Result<Json<TransitionResult>, AppError>
where
    S: SchoolStore + Clone + 'static,
{
    let _running = state
        .transition_lock
        .try_lock()
        .map_err(|_| AppError::conflict(anyhow!("A transition is already running")))?;

    let result = TransitionService::new(&state.store, state.transition_config)
        .execute_transition(request.academic_year)
        .await;

    Ok(Json(result))
}
