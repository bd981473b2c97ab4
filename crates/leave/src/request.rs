use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use staffgate_core::{EmployeeId, LeaveId, ValidationError};

/// Leave decision state. Wire form is the numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum LeaveStatus {
    Pending = 0,
    Approved = 1,
    Denied = 2,
}

impl LeaveStatus {
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Approved or Denied.
    pub fn is_terminal(self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

impl TryFrom<i64> for LeaveStatus {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LeaveStatus::Pending),
            1 => Ok(LeaveStatus::Approved),
            2 => Ok(LeaveStatus::Denied),
            _ => Err(ValidationError::InvalidStatus),
        }
    }
}

impl From<LeaveStatus> for i64 {
    fn from(value: LeaveStatus) -> Self {
        value.code()
    }
}

/// A stored leave request.
///
/// `cancel` is independent of `status`: a leave can be cancelled whether it
/// was approved, denied or is still pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: LeaveId,
    #[serde(rename = "LTYPE")]
    pub leave_type: String,
    #[serde(rename = "EMP_ID")]
    pub emp_id: EmployeeId,
    #[serde(rename = "ROLE_ID")]
    pub role_id: Option<i64>,
    #[serde(rename = "LFROM")]
    pub from: NaiveDate,
    #[serde(rename = "LTO")]
    pub to: NaiveDate,
    #[serde(rename = "INCHARGE")]
    pub in_charge: Option<String>,
    #[serde(rename = "RESON")]
    pub reason: Option<String>,
    #[serde(rename = "TOTAL")]
    pub total: Option<f64>,
    pub status: LeaveStatus,
    #[serde(rename = "Daytype")]
    pub day_type: Option<String>,
    #[serde(rename = "Session")]
    pub session: Option<String>,
    #[serde(rename = "Timing")]
    pub timing: Option<String>,
    pub cancel: bool,
    pub cancel_reason: Option<String>,
}

impl LeaveRequest {
    /// Materialize a validated submission: Pending, not cancelled.
    pub fn from_new(id: LeaveId, new: NewLeave) -> Self {
        Self {
            id,
            leave_type: new.leave_type,
            emp_id: new.emp_id,
            role_id: new.role_id,
            from: new.from,
            to: new.to,
            in_charge: new.in_charge,
            reason: new.reason,
            total: new.total,
            status: LeaveStatus::Pending,
            day_type: new.day_type,
            session: new.session,
            timing: new.timing,
            cancel: false,
            cancel_reason: None,
        }
    }
}

/// Raw leave submission; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyLeave {
    pub leave_type: Option<String>,
    pub emp_id: Option<String>,
    pub role_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub in_charge: Option<String>,
    pub reason: Option<String>,
    pub total: Option<f64>,
    pub day_type: Option<String>,
    pub session: Option<String>,
    pub timing: Option<String>,
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLeave {
    pub leave_type: String,
    pub emp_id: EmployeeId,
    pub role_id: Option<i64>,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub in_charge: Option<String>,
    pub reason: Option<String>,
    pub total: Option<f64>,
    pub day_type: Option<String>,
    pub session: Option<String>,
    pub timing: Option<String>,
}

impl ApplyLeave {
    pub const MISSING_FIELDS: &'static str = "Missing required fields";

    /// Leave type, employee id and both dates are required; empty strings
    /// count as missing.
    pub fn validate(self) -> Result<NewLeave, ValidationError> {
        let leave_type = self.leave_type.filter(|s| !s.trim().is_empty());
        let emp_id = self.emp_id.and_then(EmployeeId::new);

        let (Some(leave_type), Some(emp_id), Some(from), Some(to)) =
            (leave_type, emp_id, self.from, self.to)
        else {
            return Err(ValidationError::missing(Self::MISSING_FIELDS));
        };

        if from > to {
            return Err(ValidationError::InvalidDateRange);
        }

        Ok(NewLeave {
            leave_type,
            emp_id,
            role_id: self.role_id,
            from,
            to,
            in_charge: self.in_charge,
            reason: self.reason,
            total: self.total,
            day_type: self.day_type,
            session: self.session,
            timing: self.timing,
        })
    }
}

/// Approve/deny input, unvalidated.
///
/// Kept raw so that authorization can be decided before the body is looked at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecideLeave {
    pub id: Option<i64>,
    pub status: Option<i64>,
    pub cancel_reason: Option<String>,
    /// When set, the decision only applies if the stored status still matches.
    pub expected_status: Option<i64>,
}

impl DecideLeave {
    pub const MISSING_FIELDS: &'static str = "id and status are required";
}

/// Cancel input, unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancelLeave {
    pub id: Option<i64>,
    pub cancel_reason: Option<String>,
}

impl CancelLeave {
    pub const MISSING_FIELDS: &'static str = "id is required";
}
