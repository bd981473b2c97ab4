//! `staffgate-leave`: leave-request records and the approval workflow.
//!
//! Every transition goes through [`LeaveWorkflow`], which consults the
//! authorization gate in `staffgate-auth` before touching the store.

pub mod request;
pub mod store;
pub mod workflow;

pub use request::{ApplyLeave, CancelLeave, DecideLeave, LeaveRequest, LeaveStatus, NewLeave};
pub use store::{InMemoryLeaveStore, LeaveStore, StatusUpdate, StatusUpdateOutcome};
pub use workflow::{LeaveWorkflow, WorkflowError};
