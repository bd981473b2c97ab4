use axum::{extract::Extension, Json};

use staffgate_auth::ClaimSet;

/// GET /me - the caller's validated claims.
pub async fn me(Extension(claims): Extension<ClaimSet>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "user": claims }))
}
