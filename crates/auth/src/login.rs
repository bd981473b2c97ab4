use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use staffgate_core::ValidationError;

use crate::{
    resolve_portal, AuthError, ClaimBuilder, ClaimSet, CredentialStore, CredentialVerifier,
    PasswordMatcher, PlaintextMatcher, StaffProfile, StaffRole, TokenIssuer,
};

/// Login input as submitted by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub off_email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub portal: Option<String>,
}

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub claims: ClaimSet,
    pub user: StaffProfile,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// credentials → verifier → claim builder → token issuer.
pub struct Authenticator<S, M = PlaintextMatcher> {
    verifier: CredentialVerifier<S, M>,
    builder: ClaimBuilder,
    issuer: Arc<dyn TokenIssuer>,
}

impl<S, M> Authenticator<S, M>
where
    S: CredentialStore,
    M: PasswordMatcher,
{
    pub fn new(verifier: CredentialVerifier<S, M>, builder: ClaimBuilder, issuer: Arc<dyn TokenIssuer>) -> Self {
        Self {
            verifier,
            builder,
            issuer,
        }
    }

    /// Authenticate as `role` and issue a bearer token.
    ///
    /// Input validation (required fields, portal) completes before the store
    /// is touched.
    pub async fn login(
        &self,
        role: StaffRole,
        req: &LoginRequest,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, LoginError> {
        let email = req.off_email.as_deref().filter(|s| !s.is_empty());
        let password = req.password.as_deref().filter(|s| !s.is_empty());
        let (Some(email), Some(password)) = (email, password) else {
            return Err(ValidationError::missing("off_email and password are required").into());
        };

        let portal = req.portal.as_deref();
        resolve_portal(role, portal)?;

        let user = self.verifier.verify(role, email, password).await?;
        let claims = self.builder.build(&user, role, portal, now)?;
        let token = self.issuer.issue(&claims)?;

        info!(role = %role, sub = %claims.sub, portal = ?claims.portal, "login succeeded");
        Ok(LoginOutcome {
            token,
            claims,
            user,
        })
    }
}
