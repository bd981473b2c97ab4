//! Process configuration, read once at startup.

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Duration;

const DEV_SECRET: &str = "dev-secret-change-me-dev-secret-change-me";

#[derive(Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    /// HS256 signing key. Never logged.
    pub jwt_secret: String,
    pub token_ttl: Duration,
    /// Use PostgreSQL stores when set; in-memory otherwise.
    pub database_url: Option<String>,
    /// Staff records for the in-memory directory.
    pub staff_seed_file: Option<PathBuf>,
}

impl core::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"***")
            .field("token_ttl", &self.token_ttl)
            .field("database_url", &self.database_url.as_ref().map(|_| "***"))
            .field("staff_seed_file", &self.staff_seed_file)
            .finish()
    }
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_SECRET.to_string()
        });

        let ttl_secs = match get("TOKEN_TTL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("TOKEN_TTL_SECS is not an integer: {raw}"))?,
            None => 3600,
        };
        if ttl_secs <= 0 {
            bail!("TOKEN_TTL_SECS must be positive, got {ttl_secs}");
        }

        let bind_addr = match (get("BIND_ADDR"), get("PORT")) {
            (Some(addr), _) => addr,
            (None, Some(port)) => {
                let port: u16 = port
                    .trim()
                    .parse()
                    .with_context(|| format!("PORT is not a valid port: {port}"))?;
                format!("0.0.0.0:{port}")
            }
            (None, None) => "0.0.0.0:3000".to_string(),
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            token_ttl: Duration::seconds(ttl_secs),
            database_url: get("DATABASE_URL"),
            staff_seed_file: get("STAFF_SEED_FILE").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<ApiConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000");
        assert_eq!(cfg.token_ttl, Duration::hours(1));
        assert!(cfg.database_url.is_none());
        assert!(!cfg.jwt_secret.is_empty());
    }

    #[test]
    fn port_and_bind_addr() {
        assert_eq!(config(&[("PORT", "8081")]).unwrap().bind_addr, "0.0.0.0:8081");
        assert_eq!(
            config(&[("PORT", "8081"), ("BIND_ADDR", "127.0.0.1:9000")])
                .unwrap()
                .bind_addr,
            "127.0.0.1:9000"
        );
        assert!(config(&[("PORT", "http")]).is_err());
    }

    #[test]
    fn invalid_ttl_fails() {
        assert!(config(&[("TOKEN_TTL_SECS", "soon")]).is_err());
        assert!(config(&[("TOKEN_TTL_SECS", "0")]).is_err());
        assert_eq!(
            config(&[("TOKEN_TTL_SECS", "60")]).unwrap().token_ttl,
            Duration::seconds(60)
        );
    }

    #[test]
    fn debug_hides_secret() {
        let cfg = config(&[("JWT_SECRET", "very-secret-value")]).unwrap();
        assert!(!format!("{cfg:?}").contains("very-secret-value"));
    }
}
