use thiserror::Error;

use staffgate_core::EmployeeId;

use crate::ClaimSet;

/// Leave operations the gate knows how to decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveAction<'a> {
    /// Submit a leave owned by `owner`.
    Apply { owner: &'a EmployeeId },
    /// List the caller's own leaves.
    ListOwn,
    /// List every pending leave.
    ListPending,
    /// Approve or deny a leave.
    Decide,
    /// Set the cancel flag on a leave owned by `owner`.
    Cancel { owner: &'a EmployeeId },
}

impl LeaveAction<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            LeaveAction::Apply { .. } => "leave.apply",
            LeaveAction::ListOwn => "leave.list_own",
            LeaveAction::ListPending => "leave.list_pending",
            LeaveAction::Decide => "leave.decide",
            LeaveAction::Cancel { .. } => "leave.cancel",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// Claims are valid but do not grant the action.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// The action needs a claim the token does not carry.
    #[error("claim '{0}' is missing")]
    MissingClaim(&'static str),
}

/// Decide whether `claims` may perform `action`.
///
/// - No IO
/// - No panics
/// - Owner checks compare the `EMP_ID` claim exactly
pub fn authorize(claims: &ClaimSet, action: &LeaveAction<'_>) -> Result<(), AuthzError> {
    let result = match action {
        LeaveAction::Apply { owner } => match &claims.emp_id {
            None => Err(AuthzError::MissingClaim("EMP_ID")),
            Some(caller) if caller == *owner => Ok(()),
            Some(_) => Err(AuthzError::Forbidden(action.name())),
        },
        LeaveAction::ListOwn => match claims.emp_id {
            Some(_) => Ok(()),
            None => Err(AuthzError::MissingClaim("EMP_ID")),
        },
        LeaveAction::ListPending | LeaveAction::Decide => {
            if claims.is_superadmin {
                Ok(())
            } else {
                Err(AuthzError::Forbidden(action.name()))
            }
        }
        LeaveAction::Cancel { owner } => {
            if claims.is_superadmin || claims.emp_id.as_ref() == Some(*owner) {
                Ok(())
            } else {
                Err(AuthzError::Forbidden(action.name()))
            }
        }
    };

    if let Err(e) = &result {
        tracing::warn!(sub = %claims.sub, action = action.name(), error = %e, "authorization denied");
    }
    result
}
