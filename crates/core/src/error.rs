//! Error model shared across the workspace.

use thiserror::Error;

/// Malformed or missing input.
///
/// Always resolved before any store access; maps to a 400-equivalent outcome.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields were absent or empty.
    ///
    /// The message is what the caller sees.
    #[error("{0}")]
    MissingField(String),

    /// The caller's claims lack a value the operation needs.
    #[error("{0} not found in token")]
    MissingClaim(&'static str),

    /// A portal outside the role's allowed set was requested.
    #[error("Invalid portal for {staff} staff")]
    InvalidPortal { staff: &'static str },

    /// A field was present but could not be parsed.
    #[error("invalid value for {field}: {reason}")]
    Malformed { field: &'static str, reason: String },

    /// `from` is after `to`.
    #[error("leave start date must not be after its end date")]
    InvalidDateRange,

    /// A leave decision must target Approved or Denied.
    #[error("status must be 1 (approved) or 2 (denied)")]
    InvalidStatus,
}

impl ValidationError {
    pub fn missing(msg: impl Into<String>) -> Self {
        Self::MissingField(msg.into())
    }

    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure talking to a backing store (database, file, lock).
///
/// The message is for logs only and must never reach a caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("store error: {0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}
