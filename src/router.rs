use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::classes::init_classes_router;
use crate::modules::transition::init_transition_router;
use crate::state::AppState;
use crate::store::SchoolStore;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use scholaris_config::CorsConfig;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Full application: API routes under `/api`, Swagger UI and Scalar docs,
/// wrapped in CORS, metrics and request logging.
pub fn init_router<S>(state: AppState<S>) -> Router
where
    S: SchoolStore + Clone + 'static,
{
    let cors = cors_layer(&state.cors_config);
    let api = Router::new()
        .nest("/transitions", init_transition_router::<S>())
        .nest("/classes", init_classes_router::<S>());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", api)
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
