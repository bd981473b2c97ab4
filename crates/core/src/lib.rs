//! `staffgate-core`: identifiers and error types shared by every crate.
//!
//! This crate contains no I/O and no policy.

pub mod error;
pub mod id;

pub use error::{StoreError, ValidationError};
pub use id::{EmployeeId, LeaveId};
