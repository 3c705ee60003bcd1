//! Address repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Address, AddressFilter};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn create(&self, address: &Address) -> Result<Address, DomainError>;

    /// Live address only
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Address>, DomainError>;

    /// Batched lookup for hydration; tombstoned rows are included.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Address>, DomainError>;

    async fn list(&self, filter: &AddressFilter) -> Result<Vec<Address>, DomainError>;

    async fn update(&self, address: &Address) -> Result<Address, DomainError>;

    /// Returns `false` when no live row matched
    async fn soft_delete(&self, id: &Uuid) -> Result<bool, DomainError>;
}
