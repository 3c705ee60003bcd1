// ============================================================================
// Rent Core - Version Service
// File: crates/rent-core/src/services/version_service.rs
// ============================================================================
//! Version sequencer: validates terms and appends gap-free numbered versions

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Contract, ContractVersion, VersionDraft};
use crate::error::DomainError;
use crate::repositories::Repositories;

/// Attempts made when another writer takes the same version number
pub const MAX_VERSION_RETRIES: usize = 5;

pub struct VersionService {
    repos: Repositories,
}

impl VersionService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Append a version to a live contract. The version is not promoted to current.
    pub async fn create_version(&self, draft: VersionDraft) -> Result<ContractVersion, DomainError> {
        let terms = draft.into_terms()?;
        self.live_contract(terms.contract_id).await?;

        for attempt in 1..=MAX_VERSION_RETRIES {
            match self.repos.versions.insert_next(&terms).await {
                Ok(version) => {
                    info!(
                        "Contract version created: {} (contract {}, number {})",
                        version.id, version.contract_id, version.version_number
                    );
                    return Ok(version);
                }
                Err(DomainError::VersionNumberTaken { version_number, .. }) => {
                    warn!(
                        "Version number {} taken for contract {} (attempt {}/{})",
                        version_number, terms.contract_id, attempt, MAX_VERSION_RETRIES
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::Conflict(format!(
            "could not allocate a version number for contract {} after {} attempts",
            terms.contract_id, MAX_VERSION_RETRIES
        )))
    }

    /// Versions of a live contract, newest first
    pub async fn list_versions(&self, contract_id: Uuid) -> Result<Vec<ContractVersion>, DomainError> {
        self.live_contract(contract_id).await?;
        self.repos.versions.list_by_contract(&contract_id).await
    }

    pub async fn get_version(&self, id: Uuid) -> Result<ContractVersion, DomainError> {
        self.repos.versions.find_by_id(&id).await?.ok_or_else(|| {
            warn!("Contract version not found: {}", id);
            DomainError::not_found("ContractVersion", id)
        })
    }

    async fn live_contract(&self, id: Uuid) -> Result<Contract, DomainError> {
        self.repos.contracts.find_by_id(&id).await?.ok_or_else(|| {
            warn!("Contract not found: {}", id);
            DomainError::not_found("Contract", id)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::domain::contract_version::sample_draft;
    use crate::domain::ContractDraft;
    use crate::services::test_support::MockSet;

    fn live_contract() -> Contract {
        ContractDraft {
            landlord_id: Some(Uuid::new_v4()),
            tenant_id: Some(Uuid::new_v4()),
            address_id: Some(Uuid::new_v4()),
            reference_ids: Vec::new(),
        }
        .into_contract()
        .unwrap()
        .0
    }

    fn with_contract(mocks: &mut MockSet, contract: Contract) {
        mocks
            .contracts
            .expect_find_by_id()
            .returning(move |_| Ok(Some(contract.clone())));
    }

    #[tokio::test]
    async fn test_retries_after_lost_race() {
        let contract = live_contract();
        let contract_id = contract.id;
        let mut mocks = MockSet::default();
        with_contract(&mut mocks, contract);

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        mocks.versions.expect_insert_next().returning(move |terms| {
            if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(DomainError::VersionNumberTaken {
                    contract_id: terms.contract_id,
                    version_number: 1,
                })
            } else {
                Ok(ContractVersion::from_terms(terms, 2))
            }
        });

        let service = VersionService::new(mocks.into_repositories());
        let version = service.create_version(sample_draft(contract_id)).await.unwrap();

        assert_eq!(version.version_number, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_with_conflict() {
        let contract = live_contract();
        let contract_id = contract.id;
        let mut mocks = MockSet::default();
        with_contract(&mut mocks, contract);
        mocks
            .versions
            .expect_insert_next()
            .times(MAX_VERSION_RETRIES)
            .returning(|terms| {
                Err(DomainError::VersionNumberTaken {
                    contract_id: terms.contract_id,
                    version_number: 1,
                })
            });

        let service = VersionService::new(mocks.into_repositories());
        let result = service.create_version(sample_draft(contract_id)).await;

        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_storage_error_is_not_retried() {
        let contract = live_contract();
        let contract_id = contract.id;
        let mut mocks = MockSet::default();
        with_contract(&mut mocks, contract);
        mocks
            .versions
            .expect_insert_next()
            .times(1)
            .returning(|_| Err(DomainError::DatabaseError("connection reset".into())));

        let service = VersionService::new(mocks.into_repositories());
        let result = service.create_version(sample_draft(contract_id)).await;

        assert!(matches!(result, Err(DomainError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_invalid_terms_never_reach_storage() {
        let mut mocks = MockSet::default();
        mocks.contracts.expect_find_by_id().never();
        mocks.versions.expect_insert_next().never();

        let service = VersionService::new(mocks.into_repositories());
        let draft = VersionDraft {
            rent: -5.0,
            ..sample_draft(Uuid::new_v4())
        };

        assert!(matches!(
            service.create_version(draft).await,
            Err(DomainError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_deleted_contract_is_not_found() {
        let mut mocks = MockSet::default();
        mocks.contracts.expect_find_by_id().returning(|_| Ok(None));
        mocks.versions.expect_insert_next().never();

        let service = VersionService::new(mocks.into_repositories());
        let result = service.create_version(sample_draft(Uuid::new_v4())).await;

        assert!(matches!(result, Err(DomainError::NotFound { entity: "Contract", .. })));
    }
}
