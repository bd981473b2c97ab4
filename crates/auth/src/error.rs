use thiserror::Error;

use staffgate_core::StoreError;

/// Authentication failures (401-equivalent) plus the internal failures that
/// can occur while authenticating.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are deliberately identical.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("malformed token")]
    Malformed,

    #[error("token has expired")]
    Expired,

    /// Signing key missing or token encoding failed.
    #[error("signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// True for failures the caller caused (401), false for internal ones.
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, AuthError::Signing(_) | AuthError::Store(_))
    }
}
