// ============================================================================
// Rent Infrastructure - PostgreSQL Contract Repository
// File: crates/rent-infrastructure/src/database/postgres/contract_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use rent_core::domain::{Contract, ContractFilter};
use rent_core::error::DomainError;
use rent_core::repositories::ContractRepository;
use rent_shared::types::AuditFields;

use super::map_db_error;

const COLUMNS: &str = "id, landlord_id, tenant_id, address_id, current_version_id, \
                       created_at, updated_at, deleted_at";

pub struct PgContractRepository {
    pool: PgPool,
}

impl PgContractRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_references(
        tx: &mut Transaction<'_, Postgres>,
        contract_id: Uuid,
        reference_ids: &[Uuid],
    ) -> Result<(), DomainError> {
        for (position, reference_id) in reference_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO contract_references (contract_id, reference_id, position) VALUES ($1, $2, $3)",
            )
            .bind(contract_id)
            .bind(reference_id)
            .bind(position as i32)
            .execute(&mut **tx)
            .await
            .map_err(|e| map_db_error("inserting contract reference", e))?;
        }
        Ok(())
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct ContractRow {
    id: Uuid,
    landlord_id: Uuid,
    tenant_id: Uuid,
    address_id: Uuid,
    current_version_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<ContractRow> for Contract {
    fn from(row: ContractRow) -> Self {
        Contract {
            id: row.id,
            landlord_id: row.landlord_id,
            tenant_id: row.tenant_id,
            address_id: row.address_id,
            current_version_id: row.current_version_id,
            audit: AuditFields {
                created_at: row.created_at,
                updated_at: row.updated_at,
                deleted_at: row.deleted_at,
            },
        }
    }
}

#[async_trait]
impl ContractRepository for PgContractRepository {
    async fn create_with_references(
        &self,
        contract: &Contract,
        reference_ids: &[Uuid],
    ) -> Result<Contract, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_db_error("starting contract transaction", e))?;

        let sql = format!(
            r#"
            INSERT INTO contracts (
                id, landlord_id, tenant_id, address_id, current_version_id,
                created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            COLUMNS
        );
        let row: ContractRow = sqlx::query_as(&sql)
            .bind(contract.id)
            .bind(contract.landlord_id)
            .bind(contract.tenant_id)
            .bind(contract.address_id)
            .bind(contract.current_version_id)
            .bind(contract.audit.created_at)
            .bind(contract.audit.updated_at)
            .bind(contract.audit.deleted_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_db_error("creating contract", e))?;

        // dropping `tx` on error rolls the contract row back
        Self::insert_references(&mut tx, row.id, reference_ids).await?;

        tx.commit()
            .await
            .map_err(|e| map_db_error("committing contract", e))?;

        info!("Contract row inserted: {} ({} references)", row.id, reference_ids.len());
        Ok(row.into())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Contract>, DomainError> {
        let sql = format!("SELECT {} FROM contracts WHERE id = $1 AND deleted_at IS NULL", COLUMNS);
        let row: Option<ContractRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("finding contract by id", e))?;

        Ok(row.map(Contract::from))
    }

    async fn list(&self, filter: &ContractFilter) -> Result<Vec<Contract>, DomainError> {
        let sql = format!(
            r#"
            SELECT {} FROM contracts
            WHERE deleted_at IS NULL AND ($1::UUID IS NULL OR tenant_id = $1)
            ORDER BY created_at, id
            "#,
            COLUMNS
        );
        let rows: Vec<ContractRow> = sqlx::query_as(&sql)
            .bind(filter.tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("listing contracts", e))?;

        Ok(rows.into_iter().map(Contract::from).collect())
    }

    async fn update_with_references(
        &self,
        contract: &Contract,
        reference_ids: Option<Vec<Uuid>>,
    ) -> Result<Contract, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_db_error("starting contract transaction", e))?;

        let sql = format!(
            r#"
            UPDATE contracts SET
                landlord_id = $2, tenant_id = $3, address_id = $4,
                current_version_id = $5, updated_at = $6
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            COLUMNS
        );
        let row: ContractRow = sqlx::query_as(&sql)
            .bind(contract.id)
            .bind(contract.landlord_id)
            .bind(contract.tenant_id)
            .bind(contract.address_id)
            .bind(contract.current_version_id)
            .bind(contract.audit.updated_at)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_db_error("updating contract", e))?
            .ok_or_else(|| DomainError::not_found("Contract", contract.id))?;

        if let Some(reference_ids) = &reference_ids {
            sqlx::query("DELETE FROM contract_references WHERE contract_id = $1")
                .bind(contract.id)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_db_error("clearing contract references", e))?;
            Self::insert_references(&mut tx, contract.id, reference_ids).await?;
        }

        tx.commit()
            .await
            .map_err(|e| map_db_error("committing contract", e))?;

        Ok(row.into())
    }

    async fn soft_delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE contracts SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("deleting contract", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn reference_ids(&self, contract_id: &Uuid) -> Result<Vec<Uuid>, DomainError> {
        sqlx::query_scalar(
            "SELECT reference_id FROM contract_references WHERE contract_id = $1 ORDER BY position",
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("listing contract references", e))
    }
}
