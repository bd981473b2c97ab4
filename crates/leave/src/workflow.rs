use thiserror::Error;
use tracing::{debug, info, warn};

use staffgate_auth::{authorize, AuthzError, ClaimSet, LeaveAction};
use staffgate_core::{LeaveId, StoreError, ValidationError};

use crate::{
    ApplyLeave, CancelLeave, DecideLeave, LeaveRequest, LeaveStatus, LeaveStore, StatusUpdate,
    StatusUpdateOutcome,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    #[error("Leave request not found")]
    NotFound(LeaveId),

    #[error("leave {id} changed concurrently (now {current:?})")]
    Conflict { id: LeaveId, current: LeaveStatus },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthzError> for WorkflowError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Forbidden(action) => WorkflowError::Forbidden(action),
            AuthzError::MissingClaim(claim) => ValidationError::MissingClaim(claim).into(),
        }
    }
}

/// Leave-request state machine.
///
/// States: Pending → Approved | Denied, plus an orthogonal cancel flag.
/// Decisions are not restricted to Pending leaves: re-deciding an already
/// decided leave is accepted unless the caller supplies `expected_status`.
#[derive(Debug, Clone)]
pub struct LeaveWorkflow<S> {
    store: S,
}

impl<S: LeaveStore> LeaveWorkflow<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Submit a leave for the caller. Starts Pending, not cancelled.
    pub async fn apply(&self, claims: &ClaimSet, cmd: ApplyLeave) -> Result<LeaveRequest, WorkflowError> {
        let new = cmd.validate()?;
        authorize(claims, &LeaveAction::Apply { owner: &new.emp_id })?;

        let leave = self.store.insert(new).await?;
        info!(id = %leave.id, emp_id = %leave.emp_id, leave_type = %leave.leave_type, "leave applied");
        Ok(leave)
    }

    /// Approve or deny. Authorization is decided before the input is inspected.
    pub async fn decide(&self, claims: &ClaimSet, cmd: DecideLeave) -> Result<LeaveRequest, WorkflowError> {
        authorize(claims, &LeaveAction::Decide)?;

        let (Some(id), Some(status)) = (cmd.id, cmd.status) else {
            return Err(ValidationError::missing(DecideLeave::MISSING_FIELDS).into());
        };
        let id = LeaveId::new(id);
        let status = LeaveStatus::try_from(status)?;
        if !status.is_terminal() {
            return Err(ValidationError::InvalidStatus.into());
        }
        let expected = cmd.expected_status.map(LeaveStatus::try_from).transpose()?;

        let update = StatusUpdate {
            status,
            cancel_reason: cmd.cancel_reason,
            expected,
        };
        match self.store.set_status(id, update).await? {
            StatusUpdateOutcome::Updated(leave) => {
                info!(id = %id, status = ?status, by = %claims.sub, "leave decided");
                Ok(leave)
            }
            StatusUpdateOutcome::NotFound => Err(WorkflowError::NotFound(id)),
            StatusUpdateOutcome::Conflict { current } => Err(WorkflowError::Conflict { id, current }),
        }
    }

    /// Mark a leave cancelled. Status is left as it is.
    pub async fn cancel(&self, claims: &ClaimSet, cmd: CancelLeave) -> Result<LeaveRequest, WorkflowError> {
        let Some(id) = cmd.id else {
            return Err(ValidationError::missing(CancelLeave::MISSING_FIELDS).into());
        };
        let id = LeaveId::new(id);

        // Only superadmins may learn that an id does not exist.
        let Some(existing) = self.store.get(id).await? else {
            if claims.is_superadmin {
                return Err(WorkflowError::NotFound(id));
            }
            warn!(sub = %claims.sub, id = %id, "cancel denied for unknown leave");
            return Err(WorkflowError::Forbidden("leave.cancel"));
        };
        authorize(claims, &LeaveAction::Cancel { owner: &existing.emp_id })?;

        let leave = self
            .store
            .set_cancelled(id, cmd.cancel_reason)
            .await?
            .ok_or(WorkflowError::NotFound(id))?;
        info!(id = %id, by = %claims.sub, "leave cancelled");
        Ok(leave)
    }

    /// All Pending leaves. Not scoped by department.
    pub async fn list_pending(&self, claims: &ClaimSet) -> Result<Vec<LeaveRequest>, WorkflowError> {
        authorize(claims, &LeaveAction::ListPending)?;
        let leaves = self.store.list_by_status(LeaveStatus::Pending).await?;
        debug!(count = leaves.len(), "listed pending leaves");
        Ok(leaves)
    }

    /// Leaves whose `EMP_ID` equals the caller's claim.
    pub async fn list_mine(&self, claims: &ClaimSet) -> Result<Vec<LeaveRequest>, WorkflowError> {
        authorize(claims, &LeaveAction::ListOwn)?;
        let Some(emp_id) = claims.emp_id.as_ref() else {
            return Err(ValidationError::MissingClaim("EMP_ID").into());
        };
        let leaves = self.store.list_by_employee(emp_id).await?;
        debug!(emp_id = %emp_id, count = leaves.len(), "listed own leaves");
        Ok(leaves)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use proptest::prelude::*;
    use staffgate_auth::StaffRole;
    use staffgate_core::EmployeeId;

    use super::*;
    use crate::InMemoryLeaveStore;

    fn claims(emp_id: &str, is_superadmin: bool) -> ClaimSet {
        ClaimSet {
            sub: format!("sub-{emp_id}"),
            role: StaffRole::Teaching,
            email: format!("{emp_id}@x.edu"),
            emp_id: EmployeeId::new(emp_id),
            is_superadmin,
            portal: None,
            exp: i64::MAX,
        }
    }

    fn apply_for(emp_id: &str) -> ApplyLeave {
        ApplyLeave {
            leave_type: Some("CL".to_string()),
            emp_id: Some(emp_id.to_string()),
            from: NaiveDate::from_ymd_opt(2026, 3, 2),
            to: NaiveDate::from_ymd_opt(2026, 3, 4),
            reason: Some("family".to_string()),
            total: Some(3.0),
            ..Default::default()
        }
    }

    fn decide(id: i64, status: i64) -> DecideLeave {
        DecideLeave {
            id: Some(id),
            status: Some(status),
            ..Default::default()
        }
    }

    fn workflow() -> LeaveWorkflow<Arc<InMemoryLeaveStore>> {
        LeaveWorkflow::new(Arc::new(InMemoryLeaveStore::new()))
    }

    #[tokio::test]
    async fn apply_creates_pending_uncancelled_leave() {
        let wf = workflow();
        let leave = wf.apply(&claims("123", false), apply_for("123")).await.unwrap();
        assert_eq!(leave.status, LeaveStatus::Pending);
        assert!(!leave.cancel);
        assert_eq!(leave.id, LeaveId::new(1));
    }

    #[tokio::test]
    async fn apply_for_someone_else_is_forbidden_and_not_stored() {
        let wf = workflow();
        let err = wf.apply(&claims("123", false), apply_for("456")).await.unwrap_err();
        assert_eq!(err, WorkflowError::Forbidden("leave.apply"));
        assert!(wf.store().get(LeaveId::new(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn apply_missing_field_is_validation_error() {
        let wf = workflow();
        let mut cmd = apply_for("123");
        cmd.from = None;
        let err = wf.apply(&claims("123", false), cmd).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields");
    }

    #[tokio::test]
    async fn non_superadmin_cannot_decide_even_with_invalid_body() {
        let wf = workflow();
        wf.apply(&claims("123", false), apply_for("123")).await.unwrap();

        let err = wf
            .decide(&claims("123", false), DecideLeave::default())
            .await
            .unwrap_err();
        assert_eq!(err, WorkflowError::Forbidden("leave.decide"));

        let err = wf.decide(&claims("123", false), decide(1, 1)).await.unwrap_err();
        assert_eq!(err, WorkflowError::Forbidden("leave.decide"));

        let stored = wf.store().get(LeaveId::new(1)).await.unwrap().unwrap();
        assert_eq!(stored.status, LeaveStatus::Pending);
    }

    #[tokio::test]
    async fn superadmin_decides_and_redecides() {
        let wf = workflow();
        wf.apply(&claims("123", false), apply_for("123")).await.unwrap();
        let admin = claims("900", true);

        let leave = wf.decide(&admin, decide(1, 1)).await.unwrap();
        assert_eq!(leave.status, LeaveStatus::Approved);

        let mut deny = decide(1, 2);
        deny.cancel_reason = Some("short staffed".to_string());
        let leave = wf.decide(&admin, deny).await.unwrap();
        assert_eq!(leave.status, LeaveStatus::Denied);
        assert_eq!(leave.cancel_reason.as_deref(), Some("short staffed"));
    }

    #[tokio::test]
    async fn decide_validates_after_authorization() {
        let wf = workflow();
        let admin = claims("900", true);

        let err = wf
            .decide(&admin, DecideLeave { id: Some(1), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "id and status are required");

        let err = wf.decide(&admin, decide(1, 0)).await.unwrap_err();
        assert_eq!(err, WorkflowError::Validation(ValidationError::InvalidStatus));

        let err = wf.decide(&admin, decide(1, 9)).await.unwrap_err();
        assert_eq!(err, WorkflowError::Validation(ValidationError::InvalidStatus));

        let err = wf.decide(&admin, decide(77, 1)).await.unwrap_err();
        assert_eq!(err, WorkflowError::NotFound(LeaveId::new(77)));
    }

    #[tokio::test]
    async fn expected_status_guards_against_concurrent_decisions() {
        let wf = workflow();
        wf.apply(&claims("123", false), apply_for("123")).await.unwrap();
        let admin = claims("900", true);

        let mut first = decide(1, 1);
        first.expected_status = Some(0);
        wf.decide(&admin, first.clone()).await.unwrap();

        let mut second = decide(1, 2);
        second.expected_status = Some(0);
        let err = wf.decide(&admin, second).await.unwrap_err();
        assert_eq!(
            err,
            WorkflowError::Conflict {
                id: LeaveId::new(1),
                current: LeaveStatus::Approved
            }
        );
    }

    #[tokio::test]
    async fn pending_list_is_superadmin_only_and_excludes_decided() {
        let wf = workflow();
        wf.apply(&claims("1", false), apply_for("1")).await.unwrap();
        wf.apply(&claims("2", false), apply_for("2")).await.unwrap();
        let admin = claims("900", true);
        wf.decide(&admin, decide(1, 2)).await.unwrap();

        assert!(matches!(
            wf.list_pending(&claims("1", false)).await,
            Err(WorkflowError::Forbidden(_))
        ));

        let pending = wf.list_pending(&admin).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].emp_id.as_str(), "2");
    }

    #[tokio::test]
    async fn cancel_is_orthogonal_to_status() {
        let wf = workflow();
        wf.apply(&claims("123", false), apply_for("123")).await.unwrap();
        wf.decide(&claims("900", true), decide(1, 1)).await.unwrap();

        let err = wf
            .cancel(&claims("456", false), CancelLeave { id: Some(1), cancel_reason: None })
            .await
            .unwrap_err();
        assert_eq!(err, WorkflowError::Forbidden("leave.cancel"));

        let leave = wf
            .cancel(
                &claims("123", false),
                CancelLeave { id: Some(1), cancel_reason: Some("plans changed".to_string()) },
            )
            .await
            .unwrap();
        assert!(leave.cancel);
        assert_eq!(leave.status, LeaveStatus::Approved);
        assert_eq!(leave.cancel_reason.as_deref(), Some("plans changed"));
    }

    #[tokio::test]
    async fn cancel_unknown_or_missing_id() {
        let wf = workflow();
        let c = claims("123", false);
        assert_eq!(
            wf.cancel(&c, CancelLeave::default()).await.unwrap_err().to_string(),
            "id is required"
        );
        assert_eq!(
            wf.cancel(&claims("900", true), CancelLeave { id: Some(5), cancel_reason: None })
                .await
                .unwrap_err(),
            WorkflowError::NotFound(LeaveId::new(5))
        );
    }

    #[tokio::test]
    async fn cancel_does_not_reveal_unknown_ids_to_regular_staff() {
        let wf = workflow();
        wf.apply(&claims("123", false), apply_for("123")).await.unwrap();
        let stranger = claims("456", false);

        let unknown = wf
            .cancel(&stranger, CancelLeave { id: Some(99), cancel_reason: None })
            .await
            .unwrap_err();
        let foreign = wf
            .cancel(&stranger, CancelLeave { id: Some(1), cancel_reason: None })
            .await
            .unwrap_err();
        assert_eq!(unknown, foreign);
        assert_eq!(unknown, WorkflowError::Forbidden("leave.cancel"));
    }

    #[tokio::test]
    async fn decision_without_reason_keeps_cancel_reason() {
        let wf = workflow();
        wf.apply(&claims("123", false), apply_for("123")).await.unwrap();
        wf.cancel(
            &claims("123", false),
            CancelLeave { id: Some(1), cancel_reason: Some("plans changed".to_string()) },
        )
        .await
        .unwrap();

        let leave = wf.decide(&claims("900", true), decide(1, 1)).await.unwrap();
        assert_eq!(leave.status, LeaveStatus::Approved);
        assert!(leave.cancel);
        assert_eq!(leave.cancel_reason.as_deref(), Some("plans changed"));

        let stored = wf.store().get(LeaveId::new(1)).await.unwrap().unwrap();
        assert_eq!(stored.cancel_reason.as_deref(), Some("plans changed"));
    }

    #[tokio::test]
    async fn list_mine_requires_emp_id_claim() {
        let wf = workflow();
        let mut c = claims("123", false);
        c.emp_id = None;
        assert_eq!(
            wf.list_mine(&c).await.unwrap_err(),
            WorkflowError::Validation(ValidationError::MissingClaim("EMP_ID"))
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: listing "mine" only ever returns the caller's own leaves.
        #[test]
        fn list_mine_never_returns_other_employees(
            owners in prop::collection::vec(prop::sample::select(vec!["101", "102", "103", "104"]), 0..20),
            caller in prop::sample::select(vec!["101", "102", "103", "104"]),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let mine = rt.block_on(async {
                let wf = workflow();
                for owner in &owners {
                    wf.apply(&claims(owner, false), apply_for(owner)).await.unwrap();
                }
                wf.list_mine(&claims(caller, false)).await.unwrap()
            });

            prop_assert_eq!(mine.len(), owners.iter().filter(|o| **o == caller).count());
            prop_assert!(mine.iter().all(|l| l.emp_id.as_str() == caller));
        }
    }
}
