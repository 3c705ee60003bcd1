//! PostgreSQL repository implementations

pub mod address_repo_impl;
pub mod user_repo_impl;
pub mod contract_repo_impl;
pub mod version_repo_impl;
pub mod statistics_repo_impl;

pub use address_repo_impl::PgAddressRepository;
pub use user_repo_impl::PgUserRepository;
pub use contract_repo_impl::PgContractRepository;
pub use version_repo_impl::PgVersionRepository;
pub use statistics_repo_impl::{PgHealthCheck, PgStatisticsRepository};

use rent_core::error::DomainError;
use tracing::error;

pub(crate) const FOREIGN_KEY_VIOLATION: &str = "23503";
pub(crate) const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE of a database error, if any
pub(crate) fn sql_state(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db) => db.code().map(|code| code.into_owned()),
        _ => None,
    }
}

/// Map an sqlx error, turning foreign key violations into dependency errors
pub(crate) fn map_db_error(action: &str, e: sqlx::Error) -> DomainError {
    if sql_state(&e).as_deref() == Some(FOREIGN_KEY_VIOLATION) {
        let constraint = match &e {
            sqlx::Error::Database(db) => db.constraint().unwrap_or("foreign key").to_string(),
            _ => "foreign key".to_string(),
        };
        return DomainError::DependencyError(format!(
            "{}: a referenced record does not exist ({})",
            action, constraint
        ));
    }

    error!("Database error {}: {}", action, e);
    DomainError::DatabaseError(e.to_string())
}
