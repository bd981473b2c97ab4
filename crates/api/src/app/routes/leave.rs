use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use staffgate_auth::{authorize, ClaimSet, LeaveAction};
use staffgate_leave::WorkflowError;

use crate::app::{dto, errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/apply", post(apply))
        .route("/pending", get(pending))
        .route("/approve", post(approve))
        .route("/cancel", post(cancel))
        .route("/mine", get(mine))
}

/// POST /leave/apply
pub async fn apply(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<ClaimSet>,
    body: Result<Json<Value>, JsonRejection>,
) -> axum::response::Response {
    let cmd = match dto::apply_leave(&dto::JsonFields::from_body(body)) {
        Ok(c) => c,
        Err(e) => return errors::workflow_error_to_response(e.into()),
    };

    match services.leave.apply(&claims, cmd).await {
        Ok(leave) => {
            let mut body = dto::message("Leave applied successfully");
            body["id"] = serde_json::json!(leave.id);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::workflow_error_to_response(e),
    }
}

/// GET /leave/pending - superadmin only
pub async fn pending(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<ClaimSet>,
) -> axum::response::Response {
    match services.leave.list_pending(&claims).await {
        Ok(leaves) => (StatusCode::OK, Json(dto::LeavesResponse::from(leaves))).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}

/// POST /leave/approve - superadmin only
pub async fn approve(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<ClaimSet>,
    body: Result<Json<Value>, JsonRejection>,
) -> axum::response::Response {
    let cmd = match dto::decide_leave(&dto::JsonFields::from_body(body)) {
        Ok(c) => c,
        // A caller who may not decide is told so before anything about the body.
        Err(e) => {
            let err = match authorize(&claims, &LeaveAction::Decide) {
                Err(denied) => WorkflowError::from(denied),
                Ok(()) => e.into(),
            };
            return errors::workflow_error_to_response(err);
        }
    };

    match services.leave.decide(&claims, cmd).await {
        Ok(_) => (StatusCode::OK, Json(dto::message("Leave status updated"))).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}

/// POST /leave/cancel - owner or superadmin
pub async fn cancel(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<ClaimSet>,
    body: Result<Json<Value>, JsonRejection>,
) -> axum::response::Response {
    let cmd = match dto::cancel_leave(&dto::JsonFields::from_body(body)) {
        Ok(c) => c,
        Err(e) => return errors::workflow_error_to_response(e.into()),
    };

    match services.leave.cancel(&claims, cmd).await {
        Ok(_) => (StatusCode::OK, Json(dto::message("Leave cancelled"))).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}

/// GET /leave/mine
pub async fn mine(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<ClaimSet>,
) -> axum::response::Response {
    match services.leave.list_mine(&claims).await {
        Ok(leaves) => (StatusCode::OK, Json(dto::LeavesResponse::from(leaves))).into_response(),
        Err(e) => errors::workflow_error_to_response(e),
    }
}
