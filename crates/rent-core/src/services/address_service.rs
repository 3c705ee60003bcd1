// ============================================================================
// Rent Core - Address Service
// File: crates/rent-core/src/services/address_service.rs
// ============================================================================
//! Address directory: CRUD over property, tenant and reference addresses

use tracing::{info, warn};
use uuid::Uuid;

use rent_shared::constants::MAX_LIST_LIMIT;

use crate::domain::{Address, AddressFilter, AddressPatch, NewAddress};
use crate::error::DomainError;
use crate::repositories::Repositories;

pub struct AddressService {
    repos: Repositories,
}

impl AddressService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn create(&self, fields: NewAddress) -> Result<Address, DomainError> {
        let address = Address::new(fields)?;
        let created = self.repos.addresses.create(&address).await?;
        info!("Address created: {} ({})", created.id, created.address_type.as_str());
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Address, DomainError> {
        self.repos.addresses.find_by_id(&id).await?.ok_or_else(|| {
            warn!("Address not found: {}", id);
            DomainError::not_found("Address", id)
        })
    }

    pub async fn list(&self, mut filter: AddressFilter) -> Result<Vec<Address>, DomainError> {
        // 0 means "no limit"; anything else is clamped
        filter.limit = filter
            .limit
            .filter(|limit| *limit > 0)
            .map(|limit| limit.min(MAX_LIST_LIMIT));
        self.repos.addresses.list(&filter).await
    }

    pub async fn update(&self, id: Uuid, patch: AddressPatch) -> Result<Address, DomainError> {
        let mut address = self.get(id).await?;
        address.apply(patch)?;
        let updated = self.repos.addresses.update(&address).await?;
        info!("Address updated: {}", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.repos.addresses.soft_delete(&id).await? {
            warn!("Delete failed: address not found: {}", id);
            return Err(DomainError::not_found("Address", id));
        }
        info!("Address deleted: {}", id);
        Ok(())
    }
}
