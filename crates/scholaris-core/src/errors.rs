//! Application error type used at the HTTP edge.
//!
//! [`AppError`] pairs an HTTP status with an [`anyhow::Error`]. Handlers return
//! `Result<_, AppError>` and any error convertible into `anyhow::Error` can be
//! propagated with `?`, defaulting to `500 Internal Server Error`.
//!
//! The response body is always `{"error": "<message>"}`.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable error message
    pub error: String,
}

macro_rules! status_constructors {
    ($($(#[$doc:meta])* $fn_name:ident => $status:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $fn_name(err: impl Into<Error>) -> Self {
                Self::new(StatusCode::$status, err)
            }
        )*
    };
}

impl AppError {
    pub fn new(status: StatusCode, err: impl Into<Error>) -> Self {
        Self {
            status,
            error: err.into(),
        }
    }

    status_constructors! {
        internal => INTERNAL_SERVER_ERROR,
        bad_request => BAD_REQUEST,
        not_found => NOT_FOUND,
        /// A transition is already running.
        conflict => CONFLICT,
        /// Request DTOs that fail `validator` checks.
        unprocessable => UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.error.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl<E: Into<Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_set_status() {
        assert_eq!(
            AppError::not_found(anyhow::anyhow!("missing")).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::bad_request(anyhow::anyhow!("bad")).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::unprocessable(anyhow::anyhow!("invalid")).status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::conflict(anyhow::anyhow!("busy")).status,
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_from_error_defaults_to_internal() {
        let io = std::io::Error::other("disk gone");
        let err: AppError = io.into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error.to_string(), "disk gone");
    }

    #[test]
    fn test_into_response_keeps_status() {
        let response = AppError::not_found(anyhow::anyhow!("Class not found")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
