use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use staffgate_core::{EmployeeId, LeaveId, StoreError};

use crate::{LeaveRequest, LeaveStatus, NewLeave};

/// Status change requested by an approver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: LeaveStatus,
    /// `None` keeps the stored reason.
    pub cancel_reason: Option<String>,
    /// Compare-and-set guard; `None` means last write wins.
    pub expected: Option<LeaveStatus>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusUpdateOutcome {
    Updated(LeaveRequest),
    NotFound,
    Conflict { current: LeaveStatus },
}

/// Persistence for leave requests. Records are never deleted.
#[async_trait]
pub trait LeaveStore: Send + Sync {
    /// Store a new request and assign its id.
    async fn insert(&self, leave: NewLeave) -> Result<LeaveRequest, StoreError>;

    async fn get(&self, id: LeaveId) -> Result<Option<LeaveRequest>, StoreError>;

    async fn set_status(
        &self,
        id: LeaveId,
        update: StatusUpdate,
    ) -> Result<StatusUpdateOutcome, StoreError>;

    /// Set the cancel flag, and the reason when one is given. `None` when
    /// the id is unknown.
    async fn set_cancelled(
        &self,
        id: LeaveId,
        reason: Option<String>,
    ) -> Result<Option<LeaveRequest>, StoreError>;

    async fn list_by_status(&self, status: LeaveStatus) -> Result<Vec<LeaveRequest>, StoreError>;

    async fn list_by_employee(&self, emp_id: &EmployeeId) -> Result<Vec<LeaveRequest>, StoreError>;
}

#[async_trait]
impl<S> LeaveStore for Arc<S>
where
    S: LeaveStore + ?Sized,
{
    async fn insert(&self, leave: NewLeave) -> Result<LeaveRequest, StoreError> {
        (**self).insert(leave).await
    }

    async fn get(&self, id: LeaveId) -> Result<Option<LeaveRequest>, StoreError> {
        (**self).get(id).await
    }

    async fn set_status(
        &self,
        id: LeaveId,
        update: StatusUpdate,
    ) -> Result<StatusUpdateOutcome, StoreError> {
        (**self).set_status(id, update).await
    }

    async fn set_cancelled(
        &self,
        id: LeaveId,
        reason: Option<String>,
    ) -> Result<Option<LeaveRequest>, StoreError> {
        (**self).set_cancelled(id, reason).await
    }

    async fn list_by_status(&self, status: LeaveStatus) -> Result<Vec<LeaveRequest>, StoreError> {
        (**self).list_by_status(status).await
    }

    async fn list_by_employee(&self, emp_id: &EmployeeId) -> Result<Vec<LeaveRequest>, StoreError> {
        (**self).list_by_employee(emp_id).await
    }
}

#[derive(Debug, Default)]
struct Rows {
    next_id: i64,
    by_id: BTreeMap<LeaveId, LeaveRequest>,
}

/// In-memory leave store for tests/dev. Ids start at 1.
#[derive(Debug, Default)]
pub struct InMemoryLeaveStore {
    inner: RwLock<Rows>,
}

impl InMemoryLeaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::new("leave store lock poisoned")
    }

    fn select(
        &self,
        pred: impl Fn(&LeaveRequest) -> bool,
    ) -> Result<Vec<LeaveRequest>, StoreError> {
        let rows = self.inner.read().map_err(|_| Self::poisoned())?;
        Ok(rows.by_id.values().filter(|l| pred(l)).cloned().collect())
    }
}

#[async_trait]
impl LeaveStore for InMemoryLeaveStore {
    async fn insert(&self, leave: NewLeave) -> Result<LeaveRequest, StoreError> {
        let mut rows = self.inner.write().map_err(|_| Self::poisoned())?;
        rows.next_id += 1;
        let id = LeaveId::new(rows.next_id);
        let record = LeaveRequest::from_new(id, leave);
        rows.by_id.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: LeaveId) -> Result<Option<LeaveRequest>, StoreError> {
        let rows = self.inner.read().map_err(|_| Self::poisoned())?;
        Ok(rows.by_id.get(&id).cloned())
    }

    async fn set_status(
        &self,
        id: LeaveId,
        update: StatusUpdate,
    ) -> Result<StatusUpdateOutcome, StoreError> {
        let mut rows = self.inner.write().map_err(|_| Self::poisoned())?;
        let Some(leave) = rows.by_id.get_mut(&id) else {
            return Ok(StatusUpdateOutcome::NotFound);
        };

        if let Some(expected) = update.expected {
            if leave.status != expected {
                return Ok(StatusUpdateOutcome::Conflict {
                    current: leave.status,
                });
            }
        }

        leave.status = update.status;
        if let Some(reason) = update.cancel_reason {
            leave.cancel_reason = Some(reason);
        }
        Ok(StatusUpdateOutcome::Updated(leave.clone()))
    }

    async fn set_cancelled(
        &self,
        id: LeaveId,
        reason: Option<String>,
    ) -> Result<Option<LeaveRequest>, StoreError> {
        let mut rows = self.inner.write().map_err(|_| Self::poisoned())?;
        Ok(rows.by_id.get_mut(&id).map(|leave| {
            leave.cancel = true;
            if let Some(reason) = reason {
                leave.cancel_reason = Some(reason);
            }
            leave.clone()
        }))
    }

    async fn list_by_status(&self, status: LeaveStatus) -> Result<Vec<LeaveRequest>, StoreError> {
        self.select(|l| l.status == status)
    }

    async fn list_by_employee(&self, emp_id: &EmployeeId) -> Result<Vec<LeaveRequest>, StoreError> {
        self.select(|l| &l.emp_id == emp_id)
    }
}
