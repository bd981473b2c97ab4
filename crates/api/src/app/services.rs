use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use sqlx::PgPool;

use staffgate_auth::{
    Authenticator, ClaimBuilder, CredentialStore, CredentialVerifier, InMemoryStaffDirectory,
    StaffSeed, TokenIssuer,
};
use staffgate_infra::{PostgresLeaveStore, PostgresStaffDirectory};
use staffgate_leave::{InMemoryLeaveStore, LeaveStore, LeaveWorkflow};

use crate::config::ApiConfig;

/// Components shared by every handler. Read-only after startup.
pub struct AppServices {
    pub auth: Authenticator<Arc<dyn CredentialStore>>,
    pub leave: LeaveWorkflow<Arc<dyn LeaveStore>>,
}

impl AppServices {
    pub fn new(
        staff: Arc<dyn CredentialStore>,
        leaves: Arc<dyn LeaveStore>,
        issuer: Arc<dyn TokenIssuer>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            auth: Authenticator::new(
                CredentialVerifier::new(staff),
                ClaimBuilder::new(token_ttl),
                issuer,
            ),
            leave: LeaveWorkflow::new(leaves),
        }
    }

    /// In-memory stores (dev/test).
    pub fn in_memory(
        staff: InMemoryStaffDirectory,
        issuer: Arc<dyn TokenIssuer>,
        token_ttl: Duration,
    ) -> Self {
        Self::new(
            Arc::new(staff),
            Arc::new(InMemoryLeaveStore::new()),
            issuer,
            token_ttl,
        )
    }
}

/// Pick stores from configuration: PostgreSQL when `DATABASE_URL` is set,
/// otherwise in-memory (optionally seeded from `STAFF_SEED_FILE`).
pub async fn build_services(config: &ApiConfig, issuer: Arc<dyn TokenIssuer>) -> anyhow::Result<AppServices> {
    if let Some(url) = &config.database_url {
        let pool = PgPool::connect(url)
            .await
            .context("failed to connect to Postgres")?;
        tracing::info!("using PostgreSQL stores");
        return Ok(AppServices::new(
            Arc::new(PostgresStaffDirectory::new(pool.clone())),
            Arc::new(PostgresLeaveStore::new(pool)),
            issuer,
            config.token_ttl,
        ));
    }

    let staff = match &config.staff_seed_file {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let seed: StaffSeed = serde_json::from_str(&raw)
                .with_context(|| format!("invalid staff seed file {}", path.display()))?;
            InMemoryStaffDirectory::from_seed(seed)
        }
        None => {
            tracing::warn!("no DATABASE_URL or STAFF_SEED_FILE; staff directory is empty");
            InMemoryStaffDirectory::new()
        }
    };
    tracing::info!(staff = staff.len(), "using in-memory stores");

    Ok(AppServices::in_memory(staff, issuer, config.token_ttl))
}
