use axum::{Router, routing::get};

use crate::state::AppState;
use crate::store::SchoolStore;

use super::controller::get_classes;

pub fn init_classes_router<S>() -> Router<AppState<S>>
where
    S: SchoolStore + Clone + 'static,
{
    Router::new().route("/", get(get_classes::<S>))
}
