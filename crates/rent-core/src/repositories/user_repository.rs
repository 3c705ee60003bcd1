//! User repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{User, UserFilter};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DependencyError` when `address_id` does not resolve
    async fn create(&self, user: &User) -> Result<User, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError>;

    /// Batched lookup for hydration; tombstoned rows are included.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, DomainError>;

    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError>;
    async fn update(&self, user: &User) -> Result<User, DomainError>;
    async fn soft_delete(&self, id: &Uuid) -> Result<bool, DomainError>;
}
