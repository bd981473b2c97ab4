use axum::{
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod leave;
pub mod system;

/// Endpoints that need no token.
pub fn public_router() -> Router {
    Router::new()
        .route("/login/teaching", post(auth::login_teaching))
        .route("/login/nonteaching", post(auth::login_nonteaching))
}

/// Endpoints behind the bearer-token middleware.
pub fn protected_router() -> Router {
    Router::new()
        .route("/me", get(system::me))
        .nest("/leave", leave::router())
}
