//! Contract version repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ContractVersion, VersionTerms};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionRepository: Send + Sync {
    /// Number and insert a version while holding the contract's sequence.
    /// A lost race surfaces as `VersionNumberTaken`.
    async fn insert_next(&self, terms: &VersionTerms) -> Result<ContractVersion, DomainError>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ContractVersion>, DomainError>;

    /// Newest first
    async fn list_by_contract(&self, contract_id: &Uuid) -> Result<Vec<ContractVersion>, DomainError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ContractVersion>, DomainError>;
}
