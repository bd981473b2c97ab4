//! Postgres-backed credential store.
//!
//! Teaching and non-teaching staff live in separate tables; a lookup only
//! ever touches the table for the requested category.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::debug;

use staffgate_auth::{CredentialStore, Password, StaffRecord, StaffRole};
use staffgate_core::StoreError;

use crate::store_err;

pub struct PostgresStaffDirectory {
    pool: PgPool,
}

impl PostgresStaffDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn table(role: StaffRole) -> &'static str {
        match role {
            StaffRole::Teaching => "employee_master",
            StaffRole::NonTeaching => "employee_master_nonteaching",
        }
    }
}

fn record_from_row(row: &PgRow) -> Result<StaffRecord, sqlx::Error> {
    Ok(StaffRecord {
        id: row.try_get("id")?,
        emp_id: row.try_get("emp_id")?,
        name: row.try_get("name")?,
        off_email: row.try_get("off_email")?,
        password: Password::new(row.try_get::<String, _>("password")?),
        department: row.try_get("department")?,
        is_superadmin: row.try_get::<Option<bool>, _>("is_superadmin")?.unwrap_or(false),
    })
}

#[async_trait]
impl CredentialStore for PostgresStaffDirectory {
    async fn find_by_email(
        &self,
        role: StaffRole,
        email: &str,
    ) -> Result<Option<StaffRecord>, StoreError> {
        debug!(role = %role, "querying staff record");

        // Table name comes from a closed match, never from input.
        let sql = format!(
            r#"
            SELECT id, emp_id, name, off_email, password, department, is_superadmin
            FROM {}
            WHERE off_email = $1
            LIMIT 1
            "#,
            Self::table(role)
        );

        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;

        row.as_ref()
            .map(record_from_row)
            .transpose()
            .map_err(store_err)
    }
}
