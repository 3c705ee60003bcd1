//! Contract repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Contract, ContractFilter};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContractRepository: Send + Sync {
    /// Insert the contract and its reference rows as one unit.
    /// Unknown party/address/reference ids fail with `DependencyError`.
    async fn create_with_references(
        &self,
        contract: &Contract,
        reference_ids: &[Uuid],
    ) -> Result<Contract, DomainError>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Contract>, DomainError>;

    /// Live contracts ordered by creation time
    async fn list(&self, filter: &ContractFilter) -> Result<Vec<Contract>, DomainError>;

    /// Write the contract fields and, when `reference_ids` is `Some`,
    /// replace the whole reference set, as one unit.
    async fn update_with_references(
        &self,
        contract: &Contract,
        reference_ids: Option<Vec<Uuid>>,
    ) -> Result<Contract, DomainError>;

    async fn soft_delete(&self, id: &Uuid) -> Result<bool, DomainError>;

    /// Reference party ids in insertion order
    async fn reference_ids(&self, contract_id: &Uuid) -> Result<Vec<Uuid>, DomainError>;
}
