// ============================================================================
// Rent Infrastructure - PostgreSQL User Repository
// File: crates/rent-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use rent_core::domain::{User, UserFilter, UserType};
use rent_core::error::DomainError;
use rent_core::repositories::UserRepository;
use rent_shared::types::AuditFields;

use super::map_db_error;

const COLUMNS: &str = "id, user_type, address_id, first_name, middle_name, last_name, email, \
                       phone, created_at, updated_at, deleted_at";

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    user_type: String,
    address_id: Uuid,
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    email: String,
    phone: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let user_type = UserType::from_str(&row.user_type).ok_or_else(|| {
            DomainError::DatabaseError(format!("unknown user type '{}'", row.user_type))
        })?;

        Ok(User {
            id: row.id,
            user_type,
            address_id: row.address_id,
            first_name: row.first_name,
            middle_name: row.middle_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            audit: AuditFields {
                created_at: row.created_at,
                updated_at: row.updated_at,
                deleted_at: row.deleted_at,
            },
        })
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> Result<User, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO users (
                id, user_type, address_id, first_name, middle_name, last_name,
                email, phone, created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            COLUMNS
        );
        let row: UserRow = sqlx::query_as(&sql)
            .bind(user.id)
            .bind(user.user_type.as_str())
            .bind(user.address_id)
            .bind(&user.first_name)
            .bind(&user.middle_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(user.audit.created_at)
            .bind(user.audit.updated_at)
            .bind(user.audit.deleted_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error("creating user", e))?;

        info!("User row inserted: {}", row.id);
        row.try_into()
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1 AND deleted_at IS NULL", COLUMNS);
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("finding user by id", e))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {} FROM users WHERE id = ANY($1)", COLUMNS);
        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("finding users by ids", e))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError> {
        let sql = format!(
            r#"
            SELECT {} FROM users
            WHERE deleted_at IS NULL AND ($1::VARCHAR IS NULL OR user_type = $1)
            ORDER BY created_at, id
            "#,
            COLUMNS
        );
        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .bind(filter.user_type.map(|t| t.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("listing users", e))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let sql = format!(
            r#"
            UPDATE users SET
                user_type = $2, address_id = $3, first_name = $4, middle_name = $5,
                last_name = $6, email = $7, phone = $8, updated_at = $9
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            COLUMNS
        );
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(user.id)
            .bind(user.user_type.as_str())
            .bind(user.address_id)
            .bind(&user.first_name)
            .bind(&user.middle_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(user.audit.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("updating user", e))?;

        row.ok_or_else(|| DomainError::not_found("User", user.id))?
            .try_into()
    }

    async fn soft_delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("deleting user", e))?;

        Ok(result.rows_affected() > 0)
    }
}
