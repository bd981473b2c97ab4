use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::Value;

use staffgate_auth::StaffRole;

use crate::app::{dto, errors, services::AppServices};

/// POST /login/teaching
pub async fn login_teaching(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Value>, JsonRejection>,
) -> axum::response::Response {
    login(&services, StaffRole::Teaching, body).await
}

/// POST /login/nonteaching
pub async fn login_nonteaching(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Value>, JsonRejection>,
) -> axum::response::Response {
    login(&services, StaffRole::NonTeaching, body).await
}

async fn login(
    services: &AppServices,
    role: StaffRole,
    body: Result<Json<Value>, JsonRejection>,
) -> axum::response::Response {
    let req = match dto::login_request(&dto::JsonFields::from_body(body)) {
        Ok(r) => r,
        Err(e) => return errors::login_error_to_response(e.into()),
    };

    match services.auth.login(role, &req, Utc::now()).await {
        Ok(out) => (StatusCode::OK, Json(dto::LoginResponse::from(out))).into_response(),
        Err(e) => errors::login_error_to_response(e),
    }
}
