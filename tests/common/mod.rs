#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use fake::Fake;
use fake::faker::name::en::Name;
use http_body_util::BodyExt;
use tower::ServiceExt;

use scholaris::router::init_router;
use scholaris::state::AppState;
use scholaris::store::MemoryStore;
use scholaris_config::{CorsConfig, TransitionConfig};
use scholaris_models::ids::{ClassId, CourseId, StudentId};

pub fn setup_test_app(store: MemoryStore) -> Router {
    init_router(test_state(store))
}

pub fn test_state(store: MemoryStore) -> AppState<MemoryStore> {
    AppState::new(store, TransitionConfig::default(), CorsConfig::default())
}

pub fn random_name() -> String {
    Name().fake()
}

/// Adds an active student with a generated name and the given final marks.
pub fn enrolled_student(
    store: &MemoryStore,
    class_id: ClassId,
    academic_year: i32,
    marks: &[f64],
) -> StudentId {
    let student = store.add_student(&random_name(), class_id);
    let marks: Vec<Option<f64>> = marks.iter().copied().map(Some).collect();
    store.add_grades(student, class_id, academic_year, &marks);
    student
}

/// One course with a single grade-11 class of 2025.
pub fn single_class_school() -> (MemoryStore, CourseId, ClassId) {
    let store = MemoryStore::new();
    let course = store.add_course("Informatics Management");
    let class = store.add_class(course, 11, "A", 2025);
    (store, course, class)
}

pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
    };
    (status, body)
}
