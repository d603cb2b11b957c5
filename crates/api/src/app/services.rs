use std::sync::Arc;

use anyhow::Context;

use skillgate_infra::{
    InMemoryTenancyStore, PostgresTenancyStore, TenancySnapshot, TenancyStore,
};
use skillgate_scope::ScopeResolver;

use crate::config::ApiConfig;

/// Shared per-process services handed to every handler.
pub struct AppServices {
    pub scope: ScopeResolver<dyn TenancyStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn TenancyStore>) -> Self {
        Self {
            scope: ScopeResolver::new(store),
        }
    }

    pub fn store(&self) -> &dyn TenancyStore {
        self.scope.store()
    }
}

/// Postgres when `DATABASE_URL` is configured, otherwise an in-memory graph
/// seeded from `SEED_FILE` (or empty).
pub async fn build_store(config: &ApiConfig) -> anyhow::Result<Arc<dyn TenancyStore>> {
    if let Some(database) = &config.database {
        let pool = database
            .connect()
            .await
            .context("failed to connect to the tenancy database")?;
        tracing::info!(max_connections = database.max_connections, "using postgres tenancy store");
        return Ok(Arc::new(PostgresTenancyStore::new(pool)));
    }

    let snapshot = match &config.seed_file {
        Some(path) => TenancySnapshot::from_json_file(path)
            .with_context(|| format!("failed to load seed file {}", path.display()))?,
        None => TenancySnapshot::default(),
    };
    tracing::info!(
        organisations = snapshot.organisations.len(),
        centres = snapshot.centres.len(),
        "using in-memory tenancy store"
    );
    Ok(Arc::new(InMemoryTenancyStore::from_snapshot(snapshot)))
}
