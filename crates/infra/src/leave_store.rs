//! Postgres-backed leave store (`leave_requests` table).

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::debug;

use staffgate_core::{EmployeeId, LeaveId, StoreError};
use staffgate_leave::{LeaveRequest, LeaveStatus, LeaveStore, NewLeave, StatusUpdate, StatusUpdateOutcome};

use crate::store_err;

const COLUMNS: &str = "id, ltype, emp_id, role_id, lfrom, lto, incharge, reson, total, \
                       status, daytype, session, timing, cancel, cancel_reason";

pub struct PostgresLeaveStore {
    pool: PgPool,
}

impl PostgresLeaveStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_where(&self, clause: &str, bind: impl FnOnce(Query<'_>) -> Query<'_>) -> Result<Vec<LeaveRequest>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM leave_requests WHERE {clause} ORDER BY id");
        let rows = bind(sqlx::query(&sql))
            .fetch_all(&self.pool)
            .await
            .map_err(store_err)?;
        rows.iter().map(leave_from_row).collect()
    }
}

type Query<'q> = sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;

fn leave_from_row(row: &PgRow) -> Result<LeaveRequest, StoreError> {
    let status: i16 = row.try_get("status").map_err(store_err)?;
    let status = LeaveStatus::try_from(i64::from(status))
        .map_err(|_| StoreError::new(format!("unknown leave status code {status}")))?;
    let emp_id: String = row.try_get("emp_id").map_err(store_err)?;

    Ok(LeaveRequest {
        id: LeaveId::new(row.try_get("id").map_err(store_err)?),
        leave_type: row.try_get("ltype").map_err(store_err)?,
        emp_id: EmployeeId::new(emp_id).ok_or_else(|| StoreError::new("leave row has empty emp_id"))?,
        role_id: row.try_get("role_id").map_err(store_err)?,
        from: row.try_get("lfrom").map_err(store_err)?,
        to: row.try_get("lto").map_err(store_err)?,
        in_charge: row.try_get("incharge").map_err(store_err)?,
        reason: row.try_get("reson").map_err(store_err)?,
        total: row.try_get("total").map_err(store_err)?,
        status,
        day_type: row.try_get("daytype").map_err(store_err)?,
        session: row.try_get("session").map_err(store_err)?,
        timing: row.try_get("timing").map_err(store_err)?,
        cancel: row.try_get("cancel").map_err(store_err)?,
        cancel_reason: row.try_get("cancel_reason").map_err(store_err)?,
    })
}

fn status_code(status: LeaveStatus) -> i16 {
    status.code() as i16
}

#[async_trait]
impl LeaveStore for PostgresLeaveStore {
    async fn insert(&self, leave: NewLeave) -> Result<LeaveRequest, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO leave_requests
                (ltype, emp_id, role_id, lfrom, lto, incharge, reson, total,
                 status, daytype, session, timing, cancel, cancel_reason)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, FALSE, NULL)
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(&leave.leave_type)
            .bind(leave.emp_id.as_str())
            .bind(leave.role_id)
            .bind(leave.from)
            .bind(leave.to)
            .bind(&leave.in_charge)
            .bind(&leave.reason)
            .bind(leave.total)
            .bind(status_code(LeaveStatus::Pending))
            .bind(&leave.day_type)
            .bind(&leave.session)
            .bind(&leave.timing)
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;

        leave_from_row(&row)
    }

    async fn get(&self, id: LeaveId) -> Result<Option<LeaveRequest>, StoreError> {
        let mut rows = self.fetch_where("id = $1", |q| q.bind(id.get())).await?;
        Ok(rows.pop())
    }

    async fn set_status(
        &self,
        id: LeaveId,
        update: StatusUpdate,
    ) -> Result<StatusUpdateOutcome, StoreError> {
        debug!(id = %id, status = ?update.status, "updating leave status");

        let sql = format!(
            r#"
            UPDATE leave_requests
            SET status = $2, cancel_reason = COALESCE($3, cancel_reason)
            WHERE id = $1 AND ($4::SMALLINT IS NULL OR status = $4)
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(id.get())
            .bind(status_code(update.status))
            .bind(&update.cancel_reason)
            .bind(update.expected.map(status_code))
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;

        if let Some(row) = row {
            return Ok(StatusUpdateOutcome::Updated(leave_from_row(&row)?));
        }

        // Nothing updated: either the id is unknown or the guard failed.
        match self.get(id).await? {
            None => Ok(StatusUpdateOutcome::NotFound),
            Some(current) => Ok(StatusUpdateOutcome::Conflict {
                current: current.status,
            }),
        }
    }

    async fn set_cancelled(
        &self,
        id: LeaveId,
        reason: Option<String>,
    ) -> Result<Option<LeaveRequest>, StoreError> {
        let sql = format!(
            r#"
            UPDATE leave_requests
            SET cancel = TRUE, cancel_reason = COALESCE($2, cancel_reason)
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(id.get())
            .bind(reason)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;

        row.as_ref().map(leave_from_row).transpose()
    }

    async fn list_by_status(&self, status: LeaveStatus) -> Result<Vec<LeaveRequest>, StoreError> {
        self.fetch_where("status = $1", |q| q.bind(status_code(status))).await
    }

    async fn list_by_employee(&self, emp_id: &EmployeeId) -> Result<Vec<LeaveRequest>, StoreError> {
        let emp_id = emp_id.as_str().to_string();
        self.fetch_where("emp_id = $1", move |q| q.bind(emp_id)).await
    }
}
