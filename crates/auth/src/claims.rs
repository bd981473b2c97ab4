use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use staffgate_core::EmployeeId;

use crate::{AuthError, Portal, StaffRole};

/// Claims carried by a bearer token.
///
/// Produced per successful login and never persisted. Once a token has been
/// validated this is the caller's identity for the rest of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Stable record id when available, otherwise the office email.
    pub sub: String,

    pub role: StaffRole,

    pub email: String,

    /// Derived employee short-id (see [`crate::derive_employee_id`]).
    #[serde(rename = "EMP_ID", default, skip_serializing_if = "Option::is_none")]
    pub emp_id: Option<EmployeeId>,

    #[serde(default)]
    pub is_superadmin: bool,

    /// Checked against the role once, at issuance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal: Option<Portal>,

    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Time-window check on decoded claims.
///
/// Signature verification happens in [`crate::TokenValidator`]; this only
/// looks at `exp`.
pub fn validate_claims(claims: &ClaimSet, now: DateTime<Utc>) -> Result<(), AuthError> {
    if now.timestamp() >= claims.exp {
        return Err(AuthError::Expired);
    }
    Ok(())
}
