// ============================================================================
// Rent Infrastructure - PostgreSQL Address Repository
// File: crates/rent-infrastructure/src/database/postgres/address_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use rent_core::domain::{Address, AddressFilter, AddressType};
use rent_core::error::DomainError;
use rent_core::repositories::AddressRepository;
use rent_shared::types::AuditFields;

use super::map_db_error;

const COLUMNS: &str = "id, address_type, street, number, neighborhood, city, state, zip_code, \
                       country, created_at, updated_at, deleted_at";

pub struct PgAddressRepository {
    pool: PgPool,
}

impl PgAddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct AddressRow {
    id: Uuid,
    address_type: String,
    street: String,
    number: String,
    neighborhood: String,
    city: String,
    state: String,
    zip_code: String,
    country: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<AddressRow> for Address {
    type Error = DomainError;

    fn try_from(row: AddressRow) -> Result<Self, Self::Error> {
        let address_type = AddressType::from_str(&row.address_type).ok_or_else(|| {
            DomainError::DatabaseError(format!("unknown address type '{}'", row.address_type))
        })?;

        Ok(Address {
            id: row.id,
            address_type,
            street: row.street,
            number: row.number,
            neighborhood: row.neighborhood,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            country: row.country,
            audit: AuditFields {
                created_at: row.created_at,
                updated_at: row.updated_at,
                deleted_at: row.deleted_at,
            },
        })
    }
}

fn into_addresses(rows: Vec<AddressRow>) -> Result<Vec<Address>, DomainError> {
    rows.into_iter().map(Address::try_from).collect()
}

#[async_trait]
impl AddressRepository for PgAddressRepository {
    async fn create(&self, address: &Address) -> Result<Address, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO addresses (
                id, address_type, street, number, neighborhood, city, state,
                zip_code, country, created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            COLUMNS
        );
        let row: AddressRow = sqlx::query_as(&sql)
            .bind(address.id)
            .bind(address.address_type.as_str())
            .bind(&address.street)
            .bind(&address.number)
            .bind(&address.neighborhood)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.zip_code)
            .bind(&address.country)
            .bind(address.audit.created_at)
            .bind(address.audit.updated_at)
            .bind(address.audit.deleted_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error("creating address", e))?;

        info!("Address row inserted: {}", row.id);
        row.try_into()
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Address>, DomainError> {
        let sql = format!("SELECT {} FROM addresses WHERE id = $1 AND deleted_at IS NULL", COLUMNS);
        let row: Option<AddressRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("finding address by id", e))?;

        row.map(Address::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Address>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {} FROM addresses WHERE id = ANY($1)", COLUMNS);
        let rows: Vec<AddressRow> = sqlx::query_as(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("finding addresses by ids", e))?;

        into_addresses(rows)
    }

    async fn list(&self, filter: &AddressFilter) -> Result<Vec<Address>, DomainError> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM addresses WHERE deleted_at IS NULL",
            COLUMNS
        ));

        if let Some(address_type) = filter.address_type {
            query.push(" AND address_type = ").push_bind(address_type.as_str());
        }
        if let Some(available) = filter.available {
            query.push(" AND address_type = 'property' AND ");
            if available {
                query.push("NOT ");
            }
            query.push(
                "EXISTS (SELECT 1 FROM contracts c \
                 JOIN contract_versions v ON v.id = c.current_version_id \
                 WHERE c.address_id = addresses.id AND c.deleted_at IS NULL AND v.status = 'active')",
            );
        }
        query.push(" ORDER BY created_at, id");
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(i64::from(limit));
        }

        let rows: Vec<AddressRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("listing addresses", e))?;

        into_addresses(rows)
    }

    async fn update(&self, address: &Address) -> Result<Address, DomainError> {
        let sql = format!(
            r#"
            UPDATE addresses SET
                address_type = $2, street = $3, number = $4, neighborhood = $5,
                city = $6, state = $7, zip_code = $8, country = $9, updated_at = $10
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            COLUMNS
        );
        let row: Option<AddressRow> = sqlx::query_as(&sql)
            .bind(address.id)
            .bind(address.address_type.as_str())
            .bind(&address.street)
            .bind(&address.number)
            .bind(&address.neighborhood)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.zip_code)
            .bind(&address.country)
            .bind(address.audit.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("updating address", e))?;

        row.ok_or_else(|| DomainError::not_found("Address", address.id))?
            .try_into()
    }

    async fn soft_delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE addresses SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("deleting address", e))?;

        Ok(result.rows_affected() > 0)
    }
}
