use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use crate::errors::AppError;

// Converts AppError into a well-formed HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Authentication errors redirect to the landing page alert
            AppError::Auth(msg) => {
                Redirect::to(&format!("/?error={}", urlencoding::encode(&msg))).into_response()
            }

            // Store errors are internal server errors
            AppError::Store(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Store error: {}", e),
            )
                .into_response(),

            AppError::Template(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Template error: {}", e),
            )
                .into_response(),

            AppError::Form(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid form value: {}", msg),
            )
                .into_response(),
        }
    }
}
