use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

use skillgate_infra::DatabaseConfig;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Postgres tenancy store; the in-memory store is used when absent.
    pub database: Option<DatabaseConfig>,
    /// JSON tenancy snapshot loaded into the in-memory store.
    pub seed_file: Option<PathBuf>,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let database = DatabaseConfig::from_env()
            .ok()
            .map(DatabaseConfig::with_env_overrides);

        let seed_file = std::env::var_os("SEED_FILE").map(PathBuf::from);

        Ok(Self {
            bind_addr,
            jwt_secret,
            database,
            seed_file,
        })
    }
}
