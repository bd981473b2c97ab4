//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Employee identifier as it appears in claims and leave records.
///
/// Opaque text: for teaching staff this is already the short form carried in
/// the token, for non-teaching staff it is the full identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Returns `None` for empty or whitespace-only input.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a leave request (assigned by the store).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaveId(i64);

impl LeaveId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for LeaveId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for LeaveId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for LeaveId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| ValidationError::malformed("id", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_employee_ids_are_rejected() {
        assert!(EmployeeId::new("").is_none());
        assert!(EmployeeId::new("   ").is_none());
        assert_eq!(EmployeeId::new("123").unwrap().as_str(), "123");
    }

    #[test]
    fn ids_serialize_transparently() {
        let emp = EmployeeId::new("NT-77").unwrap();
        assert_eq!(serde_json::to_string(&emp).unwrap(), "\"NT-77\"");
        assert_eq!(serde_json::to_string(&LeaveId::new(9)).unwrap(), "9");
    }

    #[test]
    fn leave_id_parses_from_text() {
        assert_eq!("42".parse::<LeaveId>().unwrap(), LeaveId::new(42));
        assert!("abc".parse::<LeaveId>().is_err());
    }
}
