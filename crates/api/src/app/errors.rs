use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use staffgate_auth::{AuthError, LoginError};
use staffgate_leave::WorkflowError;

const UNAUTHORIZED: &str = "Unauthorized";
const FORBIDDEN: &str = "Forbidden";
const INTERNAL: &str = "Internal server error";

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

/// Same body for every token failure.
pub fn unauthorized() -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, UNAUTHORIZED)
}

fn internal(err: &dyn std::error::Error) -> axum::response::Response {
    tracing::error!(error = %err, "internal failure");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
}

pub fn login_error_to_response(err: LoginError) -> axum::response::Response {
    match err {
        LoginError::Validation(e) => json_error(StatusCode::BAD_REQUEST, e.to_string()),
        LoginError::Auth(e) if e.is_unauthenticated() => {
            json_error(StatusCode::UNAUTHORIZED, AuthError::InvalidCredentials.to_string())
        }
        LoginError::Auth(e) => internal(&e),
    }
}

pub fn workflow_error_to_response(err: WorkflowError) -> axum::response::Response {
    match err {
        WorkflowError::Validation(e) => json_error(StatusCode::BAD_REQUEST, e.to_string()),
        WorkflowError::Forbidden(_) => json_error(StatusCode::FORBIDDEN, FORBIDDEN),
        e @ WorkflowError::NotFound(_) => json_error(StatusCode::NOT_FOUND, e.to_string()),
        e @ WorkflowError::Conflict { .. } => json_error(StatusCode::CONFLICT, e.to_string()),
        WorkflowError::Store(e) => internal(&e),
    }
}
