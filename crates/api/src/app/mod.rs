//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and component wiring
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use staffgate_auth::{Hs256Tokens, TokenValidator};

use crate::{config::ApiConfig, middleware};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router from configuration (used by `main.rs`).
pub async fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let tokens = Arc::new(Hs256Tokens::new(config.jwt_secret.as_bytes())?);
    let services = services::build_services(config, tokens.clone()).await?;
    Ok(router(Arc::new(services), tokens))
}

/// Assemble routes around already-wired services.
pub fn router(services: Arc<AppServices>, tokens: Arc<dyn TokenValidator>) -> Router {
    let auth_state = middleware::AuthState { tokens };

    // Protected routes: require a valid bearer token.
    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .merge(routes::public_router())
        .merge(protected)
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_span)))
}
