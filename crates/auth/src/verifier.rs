use tracing::{debug, warn};

use crate::{AuthError, CredentialStore, StaffProfile, StaffRole};

/// Compares a presented password with the stored credential.
///
/// Swap the implementation to move to hashed, constant-time comparison;
/// callers of [`CredentialVerifier`] are unaffected.
pub trait PasswordMatcher: Send + Sync {
    fn matches(&self, presented: &str, stored: &str) -> bool;
}

/// Direct equality on the stored value (plaintext credentials).
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextMatcher;

impl PasswordMatcher for PlaintextMatcher {
    fn matches(&self, presented: &str, stored: &str) -> bool {
        presented == stored
    }
}

/// Checks submitted credentials against the credential store.
#[derive(Debug, Clone)]
pub struct CredentialVerifier<S, M = PlaintextMatcher> {
    store: S,
    matcher: M,
}

impl<S: CredentialStore> CredentialVerifier<S, PlaintextMatcher> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            matcher: PlaintextMatcher,
        }
    }
}

impl<S, M> CredentialVerifier<S, M>
where
    S: CredentialStore,
    M: PasswordMatcher,
{
    pub fn with_matcher(store: S, matcher: M) -> Self {
        Self { store, matcher }
    }

    /// Look up `(role, email)` and check the password.
    ///
    /// Unknown email and wrong password both return
    /// [`AuthError::InvalidCredentials`]. Read-only.
    pub async fn verify(
        &self,
        role: StaffRole,
        email: &str,
        password: &str,
    ) -> Result<StaffProfile, AuthError> {
        let Some(record) = self.store.find_by_email(role, email).await? else {
            warn!(role = %role, reason = "unknown email", "login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.matcher.matches(password, record.password.expose()) {
            warn!(role = %role, reason = "password mismatch", "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        debug!(role = %role, "credentials verified");
        Ok(record.into_profile())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{InMemoryStaffDirectory, StaffRecord};

    fn verifier() -> CredentialVerifier<Arc<InMemoryStaffDirectory>> {
        let dir = Arc::new(InMemoryStaffDirectory::new());
        dir.insert(
            StaffRole::Teaching,
            StaffRecord::new("t@x.edu", "secret").with_emp_id("TCH00123"),
        ).unwrap();
        dir.insert(StaffRole::NonTeaching, StaffRecord::new("n@x.edu", "other")).unwrap();
        CredentialVerifier::new(dir)
    }

    #[tokio::test]
    async fn valid_credentials_return_profile() {
        let profile = verifier()
            .verify(StaffRole::Teaching, "t@x.edu", "secret")
            .await
            .unwrap();
        assert_eq!(profile.off_email, "t@x.edu");
        assert_eq!(profile.emp_id.as_deref(), Some("TCH00123"));
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable() {
        let v = verifier();
        let unknown = v
            .verify(StaffRole::Teaching, "nobody@x.edu", "secret")
            .await
            .unwrap_err();
        let wrong = v
            .verify(StaffRole::Teaching, "t@x.edu", "nope")
            .await
            .unwrap_err();
        assert_eq!(unknown, wrong);
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn lookup_is_scoped_to_category() {
        let err = verifier()
            .verify(StaffRole::NonTeaching, "t@x.edu", "secret")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn matcher_is_pluggable() {
        struct Reversed;
        impl PasswordMatcher for Reversed {
            fn matches(&self, presented: &str, stored: &str) -> bool {
                presented.chars().rev().collect::<String>() == stored
            }
        }

        let dir = Arc::new(InMemoryStaffDirectory::new());
        dir.insert(StaffRole::Teaching, StaffRecord::new("t@x.edu", "terces")).unwrap();
        let v = CredentialVerifier::with_matcher(dir, Reversed);

        assert!(v.verify(StaffRole::Teaching, "t@x.edu", "secret").await.is_ok());
        assert!(v.verify(StaffRole::Teaching, "t@x.edu", "terces").await.is_err());
    }
}
