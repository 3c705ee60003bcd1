// ============================================================================
// Rent Infrastructure - PostgreSQL Contract Version Repository
// File: crates/rent-infrastructure/src/database/postgres/version_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use rent_core::domain::{
    next_version_number, ContractStatus, ContractType, ContractVersion, VersionTerms,
};
use rent_core::error::DomainError;
use rent_core::repositories::VersionRepository;

use super::{map_db_error, sql_state, UNIQUE_VIOLATION};

const COLUMNS: &str = "id, contract_id, version_number, rent, deposit, rent_increase_percentage, \
                       business, status, contract_type, start_date, end_date, renewal_date, \
                       special_terms, created_at";

pub struct PgVersionRepository {
    pool: PgPool,
}

impl PgVersionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct VersionRow {
    id: Uuid,
    contract_id: Uuid,
    version_number: i32,
    rent: f64,
    deposit: f64,
    rent_increase_percentage: f64,
    business: String,
    status: String,
    contract_type: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    renewal_date: Option<NaiveDate>,
    special_terms: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<VersionRow> for ContractVersion {
    type Error = DomainError;

    fn try_from(row: VersionRow) -> Result<Self, Self::Error> {
        let status = ContractStatus::from_str(&row.status).ok_or_else(|| {
            DomainError::DatabaseError(format!("unknown contract status '{}'", row.status))
        })?;
        let contract_type = ContractType::from_str(&row.contract_type).ok_or_else(|| {
            DomainError::DatabaseError(format!("unknown contract type '{}'", row.contract_type))
        })?;

        Ok(ContractVersion {
            id: row.id,
            contract_id: row.contract_id,
            version_number: row.version_number,
            rent: row.rent,
            deposit: row.deposit,
            rent_increase_percentage: row.rent_increase_percentage,
            business: row.business,
            status,
            contract_type,
            start_date: row.start_date,
            end_date: row.end_date,
            renewal_date: row.renewal_date,
            special_terms: row.special_terms,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl VersionRepository for PgVersionRepository {
    /// Locks the contract row so concurrent writers for the same contract
    /// queue up behind each other; the unique constraint catches anything else.
    async fn insert_next(&self, terms: &VersionTerms) -> Result<ContractVersion, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_db_error("starting version transaction", e))?;

        let locked: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM contracts WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(terms.contract_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_db_error("locking contract", e))?;

        if locked.is_none() {
            return Err(DomainError::not_found("Contract", terms.contract_id));
        }

        let current_max: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(version_number) FROM contract_versions WHERE contract_id = $1",
        )
        .bind(terms.contract_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_db_error("reading latest version number", e))?;

        let version = ContractVersion::from_terms(terms, next_version_number(current_max));
        let sql = format!(
            r#"
            INSERT INTO contract_versions (
                id, contract_id, version_number, rent, deposit, rent_increase_percentage,
                business, status, contract_type, start_date, end_date, renewal_date,
                special_terms, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            COLUMNS
        );
        let row: VersionRow = sqlx::query_as(&sql)
            .bind(version.id)
            .bind(version.contract_id)
            .bind(version.version_number)
            .bind(version.rent)
            .bind(version.deposit)
            .bind(version.rent_increase_percentage)
            .bind(&version.business)
            .bind(version.status.as_str())
            .bind(version.contract_type.as_str())
            .bind(version.start_date)
            .bind(version.end_date)
            .bind(version.renewal_date)
            .bind(&version.special_terms)
            .bind(version.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if sql_state(&e).as_deref() == Some(UNIQUE_VIOLATION) {
                    warn!(
                        "Version number {} already taken for contract {}",
                        version.version_number, version.contract_id
                    );
                    DomainError::VersionNumberTaken {
                        contract_id: version.contract_id,
                        version_number: version.version_number,
                    }
                } else {
                    map_db_error("creating contract version", e)
                }
            })?;

        tx.commit().await.map_err(|e| {
            if sql_state(&e).as_deref() == Some(UNIQUE_VIOLATION) {
                DomainError::VersionNumberTaken {
                    contract_id: version.contract_id,
                    version_number: version.version_number,
                }
            } else {
                map_db_error("committing contract version", e)
            }
        })?;

        info!("Version row inserted: {} (number {})", row.id, row.version_number);
        row.try_into()
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ContractVersion>, DomainError> {
        let sql = format!("SELECT {} FROM contract_versions WHERE id = $1", COLUMNS);
        let row: Option<VersionRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("finding contract version by id", e))?;

        row.map(ContractVersion::try_from).transpose()
    }

    async fn list_by_contract(&self, contract_id: &Uuid) -> Result<Vec<ContractVersion>, DomainError> {
        let sql = format!(
            "SELECT {} FROM contract_versions WHERE contract_id = $1 ORDER BY version_number DESC",
            COLUMNS
        );
        let rows: Vec<VersionRow> = sqlx::query_as(&sql)
            .bind(contract_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("listing contract versions", e))?;

        rows.into_iter().map(ContractVersion::try_from).collect()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ContractVersion>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {} FROM contract_versions WHERE id = ANY($1)", COLUMNS);
        let rows: Vec<VersionRow> = sqlx::query_as(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("finding contract versions by ids", e))?;

        rows.into_iter().map(ContractVersion::try_from).collect()
    }
}
