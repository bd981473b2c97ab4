//! `staffgate-infra`: PostgreSQL implementations of the store traits.

pub mod leave_store;
pub mod staff_store;


pub use leave_store::PostgresLeaveStore;
pub use staff_store::PostgresStaffDirectory;

use staffgate_core::StoreError;

pub(crate) fn store_err(e: sqlx::Error) -> StoreError {
    StoreError::new(e.to_string())
}
