// ============================================================================
// Rent Core - Contract Service
// File: crates/rent-core/src/services/contract_service.rs
// ============================================================================
//! Contract aggregate: envelope CRUD, reference sets, current-version
//! promotion, hydration and document rendering

use std::collections::HashMap;

use tracing::{debug, info, warn};
use uuid::Uuid;

use rent_shared::utils::dedup_ids;

use crate::document;
use crate::domain::{
    Address, Contract, ContractDraft, ContractFilter, ContractPatch, ContractVersion,
    HydratedContract, Hydration, PartyView, User,
};
use crate::error::DomainError;
use crate::repositories::Repositories;

pub struct ContractService {
    repos: Repositories,
}

impl ContractService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Create a contract with no versions and no current version
    pub async fn create(&self, draft: ContractDraft) -> Result<HydratedContract, DomainError> {
        let (contract, reference_ids) = draft.into_contract()?;
        let created = self
            .repos
            .contracts
            .create_with_references(&contract, &reference_ids)
            .await?;

        info!(
            "Contract created: {} (landlord {}, tenant {}, {} references)",
            created.id,
            created.landlord_id,
            created.tenant_id,
            reference_ids.len()
        );
        self.hydrate(created, Hydration::Detail).await
    }

    pub async fn get(&self, id: Uuid) -> Result<HydratedContract, DomainError> {
        let contract = self.find_live(id).await?;
        self.hydrate(contract, Hydration::Detail).await
    }

    pub async fn list(&self, filter: ContractFilter) -> Result<Vec<HydratedContract>, DomainError> {
        let contracts = self.repos.contracts.list(&filter).await?;
        self.hydrate_many(contracts, Hydration::Summary).await
    }

    /// Merge-patch. Absent fields are kept; a present reference list replaces the set.
    pub async fn update(&self, id: Uuid, patch: ContractPatch) -> Result<HydratedContract, DomainError> {
        patch.validate()?;
        let mut contract = self.find_live(id).await?;
        if patch.is_empty() {
            debug!("Empty patch for contract {}; nothing to write", id);
            return self.hydrate(contract, Hydration::Detail).await;
        }

        if let Some(version_id) = patch.current_version_id {
            self.ensure_version_of(&contract, version_id).await?;
        }

        contract.apply(&patch);
        let updated = self
            .repos
            .contracts
            .update_with_references(&contract, patch.replacement_references())
            .await?;

        info!("Contract updated: {}", id);
        self.hydrate(updated, Hydration::Detail).await
    }

    /// Promote one of the contract's versions to current
    pub async fn set_current_version(
        &self,
        contract_id: Uuid,
        version_id: Uuid,
    ) -> Result<HydratedContract, DomainError> {
        let patch = ContractPatch {
            current_version_id: Some(version_id),
            ..Default::default()
        };
        let contract = self.update(contract_id, patch).await?;
        info!("Contract {} current version set to {}", contract_id, version_id);
        Ok(contract)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.repos.contracts.soft_delete(&id).await? {
            warn!("Delete failed: contract not found: {}", id);
            return Err(DomainError::not_found("Contract", id));
        }
        info!("Contract deleted: {}", id);
        Ok(())
    }

    /// Render the lease document for the given version, or the current one
    pub async fn render_document(&self, id: Uuid, version_id: Option<Uuid>) -> Result<Vec<u8>, DomainError> {
        let contract = self.get(id).await?;
        let bytes = document::render(&contract, version_id)?;
        info!("Contract document rendered: {} ({} bytes)", id, bytes.len());
        Ok(bytes)
    }

    pub async fn hydrate(&self, contract: Contract, depth: Hydration) -> Result<HydratedContract, DomainError> {
        let mut hydrated = self.hydrate_many(vec![contract], depth).await?;
        hydrated
            .pop()
            .ok_or_else(|| DomainError::InternalError("hydration returned no contract".to_string()))
    }

    /// Resolve related records for a batch of contracts. Parties and addresses
    /// are fetched by id including tombstoned rows.
    pub async fn hydrate_many(
        &self,
        contracts: Vec<Contract>,
        depth: Hydration,
    ) -> Result<Vec<HydratedContract>, DomainError> {
        if contracts.is_empty() {
            return Ok(Vec::new());
        }

        let mut histories: HashMap<Uuid, Vec<ContractVersion>> = HashMap::new();
        let mut reference_lists: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        if depth.includes_history() {
            for contract in &contracts {
                let versions = self.repos.versions.list_by_contract(&contract.id).await?;
                histories.insert(contract.id, versions);
                let references = self.repos.contracts.reference_ids(&contract.id).await?;
                reference_lists.insert(contract.id, references);
            }
        }

        let current_versions: HashMap<Uuid, ContractVersion> = if depth.includes_history() {
            histories
                .values()
                .flatten()
                .map(|v| (v.id, v.clone()))
                .collect()
        } else {
            let ids: Vec<Uuid> = contracts.iter().filter_map(|c| c.current_version_id).collect();
            let ids = dedup_ids(&ids);
            if ids.is_empty() {
                HashMap::new()
            } else {
                self.repos
                    .versions
                    .find_by_ids(&ids)
                    .await?
                    .into_iter()
                    .map(|v| (v.id, v))
                    .collect()
            }
        };

        let mut user_ids: Vec<Uuid> = contracts
            .iter()
            .flat_map(|c| [c.landlord_id, c.tenant_id])
            .collect();
        user_ids.extend(reference_lists.values().flatten().copied());
        let users: HashMap<Uuid, User> = self
            .repos
            .users
            .find_by_ids(&dedup_ids(&user_ids))
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut address_ids: Vec<Uuid> = contracts.iter().map(|c| c.address_id).collect();
        address_ids.extend(users.values().map(|u| u.address_id));
        let addresses: HashMap<Uuid, Address> = self
            .repos
            .addresses
            .find_by_ids(&dedup_ids(&address_ids))
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let party = |id: &Uuid| {
            users.get(id).map(|user| PartyView {
                address: addresses.get(&user.address_id).cloned(),
                user: user.clone(),
            })
        };

        Ok(contracts
            .into_iter()
            .map(|contract| {
                let current_version = contract
                    .current_version_id
                    .and_then(|id| current_versions.get(&id).cloned());
                let references = reference_lists
                    .remove(&contract.id)
                    .unwrap_or_default()
                    .iter()
                    .filter_map(&party)
                    .collect();

                HydratedContract {
                    current_version,
                    landlord: party(&contract.landlord_id),
                    tenant: party(&contract.tenant_id),
                    address: addresses.get(&contract.address_id).cloned(),
                    versions: histories.remove(&contract.id).unwrap_or_default(),
                    references,
                    contract,
                }
            })
            .collect())
    }

    async fn find_live(&self, id: Uuid) -> Result<Contract, DomainError> {
        self.repos.contracts.find_by_id(&id).await?.ok_or_else(|| {
            warn!("Contract not found: {}", id);
            DomainError::not_found("Contract", id)
        })
    }

    async fn ensure_version_of(&self, contract: &Contract, version_id: Uuid) -> Result<(), DomainError> {
        let version = self
            .repos
            .versions
            .find_by_id(&version_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ContractVersion", version_id))?;

        if version.contract_id != contract.id {
            warn!(
                "Version {} belongs to contract {}, not {}",
                version_id, version.contract_id, contract.id
            );
            return Err(DomainError::ValidationError(format!(
                "version {} does not belong to contract {}",
                version_id, contract.id
            )));
        }
        Ok(())
    }
}
