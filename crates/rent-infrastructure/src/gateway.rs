//! Persistence gateway selection

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};

use rent_core::repositories::Repositories;
use rent_shared::config::{DatabaseBackend, DatabaseSettings};

use crate::database::{
    create_pool, run_migrations, PgAddressRepository, PgContractRepository, PgHealthCheck,
    PgStatisticsRepository, PgUserRepository, PgVersionRepository,
};
use crate::memory::MemoryStore;

/// Build the repository bundle for the configured backend
pub async fn build_repositories(settings: &DatabaseSettings) -> anyhow::Result<Repositories> {
    match settings.backend {
        DatabaseBackend::Postgres => {
            let pool = create_pool(settings).await?;
            info!("Database pool created (max {} connections)", settings.max_connections);

            if settings.run_migrations {
                run_migrations(&pool).await?;
            }
            Ok(postgres_repositories(pool))
        }
        DatabaseBackend::Memory => {
            warn!("Using the in-memory backend; data is lost on shutdown");
            Ok(Repositories::from_gateway(Arc::new(MemoryStore::new())))
        }
    }
}

pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        addresses: Arc::new(PgAddressRepository::new(pool.clone())),
        users: Arc::new(PgUserRepository::new(pool.clone())),
        contracts: Arc::new(PgContractRepository::new(pool.clone())),
        versions: Arc::new(PgVersionRepository::new(pool.clone())),
        statistics: Arc::new(PgStatisticsRepository::new(pool.clone())),
        health: Arc::new(PgHealthCheck::new(pool)),
    }
}
