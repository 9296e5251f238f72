use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;
use crate::store::SchoolStore;

use super::controller::{execute_transition, get_current_academic_year, preview_transition};

pub fn init_transition_router<S>() -> Router<AppState<S>>
where
    S: SchoolStore + Clone + 'static,
{
    Router::new()
        .route("/", post(execute_transition::<S>))
        .route("/current-year", get(get_current_academic_year))
        .route("/preview", get(preview_transition::<S>))
}
