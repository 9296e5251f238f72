use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;
use validator::Validate;

use scholaris_core::{AppError, ErrorResponse};

use crate::modules::classes::model::{ClassFilterParams, PaginatedClassesResponse};
use crate::modules::classes::service::ClassService;
use crate::state::AppState;
use crate::store::SchoolStore;

#[utoipa::path(
    get,
    path = "/api/classes",
    params(ClassFilterParams),
    responses(
        (status = 200, description = "List of classes with active student counts", body = PaginatedClassesResponse),
        (status = 400, description = "Malformed query parameter", body = ErrorResponse),
        (status = 422, description = "Filter out of range", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn get_classes<S>(
    State(state): State<AppState<S>>,
    Query(filters): Query<ClassFilterParams>,
) -> Result<Json<PaginatedClassesResponse>, AppError>
where
    S: SchoolStore + Clone + 'static,
{
    filters.validate().map_err(AppError::unprocessable)?;

    let classes = ClassService::list_classes(&state.store, filters).await?;

    Ok(Json(classes))
}
