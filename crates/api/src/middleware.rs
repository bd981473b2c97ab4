use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::Instrument;
use uuid::Uuid;

use staffgate_auth::{AuthError, TokenValidator};

use crate::app::errors;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenValidator>,
}

/// Validate the bearer token and attach its [`staffgate_auth::ClaimSet`] to
/// the request. Guarded handlers never run on failure.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let claims = extract_bearer(req.headers())
        .and_then(|token| state.tokens.validate(token, Utc::now()))
        .map_err(|e| {
            tracing::warn!(reason = %e, "rejected bearer token");
            errors::unauthorized()
        })?;

    tracing::debug!(sub = %claims.sub, role = %claims.role, "authenticated");
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Wrap each request in a span carrying a fresh request id.
pub async fn request_span(req: Request, next: Next) -> Response {
    let span = tracing::info_span!(
        "request",
        request_id = %Uuid::now_v7(),
        method = %req.method(),
        path = %req.uri().path(),
    );
    next.run(req).instrument(span).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let header = header.to_str().map_err(|_| AuthError::Malformed)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}
