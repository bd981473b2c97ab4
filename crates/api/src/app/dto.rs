use axum::{extract::rejection::JsonRejection, Json};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use staffgate_auth::{LoginOutcome, LoginRequest, Portal, StaffProfile};
use staffgate_core::ValidationError;
use staffgate_leave::{ApplyLeave, CancelLeave, DecideLeave, LeaveRequest};

// -------------------------
// Request bodies
// -------------------------

/// Top-level fields of a JSON request body, read leniently.
///
/// Clients send ids and amounts as either numbers or strings. A body that is
/// not a JSON object reads as empty, so the endpoint reports its
/// missing-fields message. A field of an unusable type is `Malformed`.
#[derive(Debug, Default)]
pub struct JsonFields(Map<String, Value>);

impl JsonFields {
    pub fn from_body(body: Result<Json<Value>, JsonRejection>) -> Self {
        match body {
            Ok(Json(Value::Object(map))) => Self(map),
            _ => Self::default(),
        }
    }

    fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    /// String field; numbers are accepted and rendered as text.
    pub fn text(&self, field: &'static str) -> Result<Option<String>, ValidationError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(ValidationError::malformed(field, "expected a string")),
        }
    }

    /// Integer field; numeric strings are accepted, empty strings are absent.
    pub fn int(&self, field: &'static str) -> Result<Option<i64>, ValidationError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| ValidationError::malformed(field, "expected an integer")),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ValidationError::malformed(field, "expected an integer")),
            Some(_) => Err(ValidationError::malformed(field, "expected an integer")),
        }
    }

    /// Decimal field; numeric strings are accepted, empty strings are absent.
    pub fn number(&self, field: &'static str) -> Result<Option<f64>, ValidationError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ValidationError::malformed(field, "expected a number")),
            Some(_) => Err(ValidationError::malformed(field, "expected a number")),
        }
    }

    /// `YYYY-MM-DD`; empty strings are absent so the missing-field check reports them.
    pub fn date(&self, field: &'static str) -> Result<Option<NaiveDate>, ValidationError> {
        match self.text(field)?.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Some)
                .map_err(|e| ValidationError::malformed(field, e.to_string())),
        }
    }
}

pub fn login_request(f: &JsonFields) -> Result<LoginRequest, ValidationError> {
    Ok(LoginRequest {
        off_email: f.text("off_email")?,
        password: f.text("password")?,
        portal: f.text("portal")?,
    })
}

pub fn apply_leave(f: &JsonFields) -> Result<ApplyLeave, ValidationError> {
    Ok(ApplyLeave {
        leave_type: f.text("LTYPE")?,
        emp_id: f.text("EMP_ID")?,
        role_id: f.int("ROLE_ID")?,
        from: f.date("LFROM")?,
        to: f.date("LTO")?,
        in_charge: f.text("INCHARGE")?,
        reason: f.text("RESON")?,
        total: f.number("TOTAL")?,
        day_type: f.text("Daytype")?,
        session: f.text("Session")?,
        timing: f.text("Timing")?,
    })
}

pub fn decide_leave(f: &JsonFields) -> Result<DecideLeave, ValidationError> {
    Ok(DecideLeave {
        id: f.int("id")?,
        status: f.int("status")?,
        cancel_reason: f.text("cancel_reason")?,
        expected_status: f.int("expected_status")?,
    })
}

pub fn cancel_leave(f: &JsonFields) -> Result<CancelLeave, ValidationError> {
    Ok(CancelLeave {
        id: f.int("id")?,
        cancel_reason: f.text("cancel_reason")?,
    })
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: StaffProfile,
    pub is_superadmin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portal: Option<Portal>,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(out: LoginOutcome) -> Self {
        Self {
            success: true,
            is_superadmin: out.claims.is_superadmin,
            portal: out.claims.portal,
            token: out.token,
            user: out.user,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeavesResponse {
    pub success: bool,
    pub leaves: Vec<LeaveRequest>,
}

impl From<Vec<LeaveRequest>> for LeavesResponse {
    fn from(leaves: Vec<LeaveRequest>) -> Self {
        Self {
            success: true,
            leaves,
        }
    }
}

pub fn message(text: &str) -> serde_json::Value {
    serde_json::json!({ "success": true, "message": text })
}
