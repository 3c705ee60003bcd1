// ============================================================================
// Rent Infrastructure - PostgreSQL Statistics Repository
// File: crates/rent-infrastructure/src/database/postgres/statistics_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use rent_core::domain::StatisticsSnapshot;
use rent_core::error::DomainError;
use rent_core::repositories::{StatisticsRepository, StorageHealth};

use super::map_db_error;

pub struct PgStatisticsRepository {
    pool: PgPool,
}

impl PgStatisticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SnapshotRow {
    total_contracts: i64,
    active_contracts: i64,
    expired_contracts: i64,
    total_properties: i64,
    occupied_properties: i64,
    total_tenants: i64,
    total_references: i64,
    active_tenants: i64,
    monthly_revenue: f64,
    average_duration_days: Option<f64>,
}

impl From<SnapshotRow> for StatisticsSnapshot {
    fn from(row: SnapshotRow) -> Self {
        StatisticsSnapshot {
            total_contracts: row.total_contracts,
            active_contracts: row.active_contracts,
            expired_contracts: row.expired_contracts,
            total_properties: row.total_properties,
            occupied_properties: row.occupied_properties,
            total_tenants: row.total_tenants,
            total_references: row.total_references,
            active_tenants: row.active_tenants,
            monthly_revenue: row.monthly_revenue,
            average_duration_days: row.average_duration_days,
        }
    }
}

// Live contracts joined to their current version
const CURRENT: &str = "contracts c JOIN contract_versions v ON v.id = c.current_version_id \
                       WHERE c.deleted_at IS NULL";

#[async_trait]
impl StatisticsRepository for PgStatisticsRepository {
    async fn snapshot(&self) -> Result<StatisticsSnapshot, DomainError> {
        let sql = format!(
            r#"
            SELECT
                (SELECT COUNT(*) FROM contracts WHERE deleted_at IS NULL) AS total_contracts,
                (SELECT COUNT(*) FROM {current} AND v.status = 'active') AS active_contracts,
                (SELECT COUNT(*) FROM {current} AND v.status = 'expired') AS expired_contracts,
                (SELECT COUNT(*) FROM addresses
                    WHERE deleted_at IS NULL AND address_type = 'property') AS total_properties,
                (SELECT COUNT(DISTINCT c.address_id) FROM {current} AND v.status = 'active'
                    AND EXISTS (SELECT 1 FROM addresses a
                                WHERE a.id = c.address_id AND a.deleted_at IS NULL
                                  AND a.address_type = 'property')) AS occupied_properties,
                (SELECT COUNT(*) FROM users
                    WHERE deleted_at IS NULL AND user_type = 'tenant') AS total_tenants,
                (SELECT COUNT(*) FROM users
                    WHERE deleted_at IS NULL AND user_type = 'reference') AS total_references,
                (SELECT COUNT(DISTINCT c.tenant_id) FROM {current} AND v.status = 'active') AS active_tenants,
                (SELECT COALESCE(SUM(v.rent), 0)::DOUBLE PRECISION
                    FROM {current} AND v.status = 'active') AS monthly_revenue,
                (SELECT AVG(v.end_date - v.start_date)::DOUBLE PRECISION
                    FROM contract_versions v JOIN contracts c ON c.id = v.contract_id
                    WHERE c.deleted_at IS NULL) AS average_duration_days
            "#,
            current = CURRENT
        );

        let row: SnapshotRow = sqlx::query_as(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error("reading statistics", e))?;

        Ok(row.into())
    }
}

/// Readiness probe against the pool
pub struct PgHealthCheck {
    pool: PgPool,
}

impl PgHealthCheck {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageHealth for PgHealthCheck {
    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("pinging database", e))?;
        Ok(())
    }
}
