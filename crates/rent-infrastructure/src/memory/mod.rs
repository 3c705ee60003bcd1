// ============================================================================
// Rent Infrastructure - In-Memory Gateway
// File: crates/rent-infrastructure/src/memory/mod.rs
// Description: Single-process store implementing every repository port
// ============================================================================
//! In-memory persistence gateway.
//!
//! All tables sit behind one mutex, so every operation (including
//! read-max-then-insert for version numbers) is atomic. Foreign keys are
//! checked the way the database does it: tombstoned rows still resolve.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use rent_core::domain::{
    next_version_number, Address, AddressFilter, AddressType, Contract, ContractFilter,
    ContractStatus, ContractVersion, StatisticsSnapshot, User, UserFilter, UserType, VersionTerms,
};
use rent_core::error::DomainError;
use rent_core::repositories::{
    AddressRepository, ContractRepository, StatisticsRepository, StorageHealth, UserRepository,
    VersionRepository,
};

#[derive(Default)]
struct Tables {
    addresses: Vec<Address>,
    users: Vec<User>,
    contracts: Vec<Contract>,
    versions: Vec<ContractVersion>,
    /// contract id -> reference ids in insertion order
    references: HashMap<Uuid, Vec<Uuid>>,
}

impl Tables {
    fn address(&self, id: &Uuid) -> Option<&Address> {
        self.addresses.iter().find(|a| &a.id == id)
    }

    fn user(&self, id: &Uuid) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    fn version(&self, id: &Uuid) -> Option<&ContractVersion> {
        self.versions.iter().find(|v| &v.id == id)
    }

    fn live_contract_mut(&mut self, id: &Uuid) -> Option<&mut Contract> {
        self.contracts.iter_mut().find(|c| &c.id == id && !c.is_deleted())
    }

    fn current_version(&self, contract: &Contract) -> Option<&ContractVersion> {
        contract.current_version_id.and_then(|id| self.version(&id))
    }

    /// Live contracts whose current version has the given status
    fn contracts_with_status(&self, status: ContractStatus) -> impl Iterator<Item = (&Contract, &ContractVersion)> + '_ {
        self.contracts
            .iter()
            .filter(|c| !c.is_deleted())
            .filter_map(|c| self.current_version(c).map(|v| (c, v)))
            .filter(move |(_, v)| v.status == status)
    }

    fn is_occupied(&self, address_id: &Uuid) -> bool {
        self.contracts_with_status(ContractStatus::Active)
            .any(|(c, _)| &c.address_id == address_id)
    }

    fn check_contract_refs(&self, contract: &Contract, reference_ids: Option<&[Uuid]>) -> Result<(), DomainError> {
        for (id, role) in [(contract.landlord_id, "landlord"), (contract.tenant_id, "tenant")] {
            if self.user(&id).is_none() {
                return Err(DomainError::DependencyError(format!("{} {} does not exist", role, id)));
            }
        }
        if self.address(&contract.address_id).is_none() {
            return Err(DomainError::DependencyError(format!(
                "address {} does not exist",
                contract.address_id
            )));
        }
        if let Some(version_id) = contract.current_version_id {
            if self.version(&version_id).is_none() {
                return Err(DomainError::DependencyError(format!("version {} does not exist", version_id)));
            }
        }
        for id in reference_ids.unwrap_or_default() {
            if self.user(id).is_none() {
                return Err(DomainError::DependencyError(format!("reference {} does not exist", id)));
            }
        }
        Ok(())
    }
}

/// In-memory implementation of every repository port
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AddressRepository for MemoryStore {
    async fn create(&self, address: &Address) -> Result<Address, DomainError> {
        self.tables.lock().addresses.push(address.clone());
        Ok(address.clone())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Address>, DomainError> {
        let tables = self.tables.lock();
        Ok(tables.address(id).filter(|a| !a.is_deleted()).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Address>, DomainError> {
        let tables = self.tables.lock();
        Ok(tables
            .addresses
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn list(&self, filter: &AddressFilter) -> Result<Vec<Address>, DomainError> {
        let tables = self.tables.lock();
        let matches = tables
            .addresses
            .iter()
            .filter(|a| !a.is_deleted())
            .filter(|a| filter.address_type.map_or(true, |t| a.address_type == t))
            .filter(|a| match filter.available {
                None => true,
                Some(available) => {
                    a.address_type == AddressType::Property && tables.is_occupied(&a.id) != available
                }
            })
            .cloned();

        Ok(match filter.limit {
            Some(limit) => matches.take(limit as usize).collect(),
            None => matches.collect(),
        })
    }

    async fn update(&self, address: &Address) -> Result<Address, DomainError> {
        let mut tables = self.tables.lock();
        let stored = tables
            .addresses
            .iter_mut()
            .find(|a| a.id == address.id && !a.is_deleted())
            .ok_or_else(|| DomainError::not_found("Address", address.id))?;
        *stored = address.clone();
        Ok(address.clone())
    }

    async fn soft_delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables.lock();
        match tables.addresses.iter_mut().find(|a| &a.id == id && !a.is_deleted()) {
            Some(address) => {
                address.audit.tombstone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.tables.lock();
        if tables.address(&user.address_id).is_none() {
            return Err(DomainError::DependencyError(format!(
                "address {} does not exist",
                user.address_id
            )));
        }
        tables.users.push(user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        let tables = self.tables.lock();
        Ok(tables.user(id).filter(|u| !u.is_deleted()).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.lock();
        Ok(tables.users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.lock();
        Ok(tables
            .users
            .iter()
            .filter(|u| !u.is_deleted())
            .filter(|u| filter.user_type.map_or(true, |t| u.user_type == t))
            .cloned()
            .collect())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.tables.lock();
        if tables.address(&user.address_id).is_none() {
            return Err(DomainError::DependencyError(format!(
                "address {} does not exist",
                user.address_id
            )));
        }
        let stored = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id && !u.is_deleted())
            .ok_or_else(|| DomainError::not_found("User", user.id))?;
        *stored = user.clone();
        Ok(user.clone())
    }

    async fn soft_delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables.lock();
        match tables.users.iter_mut().find(|u| &u.id == id && !u.is_deleted()) {
            Some(user) => {
                user.audit.tombstone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ContractRepository for MemoryStore {
    async fn create_with_references(
        &self,
        contract: &Contract,
        reference_ids: &[Uuid],
    ) -> Result<Contract, DomainError> {
        let mut tables = self.tables.lock();
        // every check runs before the first write, so a failure leaves nothing behind
        tables.check_contract_refs(contract, Some(reference_ids))?;

        tables.contracts.push(contract.clone());
        tables.references.insert(contract.id, reference_ids.to_vec());
        info!("Contract stored in memory: {}", contract.id);
        Ok(contract.clone())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Contract>, DomainError> {
        let tables = self.tables.lock();
        Ok(tables
            .contracts
            .iter()
            .find(|c| &c.id == id && !c.is_deleted())
            .cloned())
    }

    async fn list(&self, filter: &ContractFilter) -> Result<Vec<Contract>, DomainError> {
        let tables = self.tables.lock();
        Ok(tables
            .contracts
            .iter()
            .filter(|c| !c.is_deleted())
            .filter(|c| filter.tenant_id.map_or(true, |t| c.tenant_id == t))
            .cloned()
            .collect())
    }

    async fn update_with_references(
        &self,
        contract: &Contract,
        reference_ids: Option<Vec<Uuid>>,
    ) -> Result<Contract, DomainError> {
        let mut tables = self.tables.lock();
        tables.check_contract_refs(contract, reference_ids.as_deref())?;

        let stored = tables
            .live_contract_mut(&contract.id)
            .ok_or_else(|| DomainError::not_found("Contract", contract.id))?;
        *stored = contract.clone();
        if let Some(reference_ids) = reference_ids {
            tables.references.insert(contract.id, reference_ids);
        }
        Ok(contract.clone())
    }

    async fn soft_delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables.lock();
        match tables.live_contract_mut(id) {
            Some(contract) => {
                contract.audit.tombstone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn reference_ids(&self, contract_id: &Uuid) -> Result<Vec<Uuid>, DomainError> {
        let tables = self.tables.lock();
        Ok(tables.references.get(contract_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl VersionRepository for MemoryStore {
    async fn insert_next(&self, terms: &VersionTerms) -> Result<ContractVersion, DomainError> {
        let mut tables = self.tables.lock();
        if tables.live_contract_mut(&terms.contract_id).is_none() {
            warn!("Version insert for unknown contract {}", terms.contract_id);
            return Err(DomainError::not_found("Contract", terms.contract_id));
        }

        let current_max = tables
            .versions
            .iter()
            .filter(|v| v.contract_id == terms.contract_id)
            .map(|v| v.version_number)
            .max();
        let version = ContractVersion::from_terms(terms, next_version_number(current_max));
        tables.versions.push(version.clone());
        Ok(version)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ContractVersion>, DomainError> {
        Ok(self.tables.lock().version(id).cloned())
    }

    async fn list_by_contract(&self, contract_id: &Uuid) -> Result<Vec<ContractVersion>, DomainError> {
        let tables = self.tables.lock();
        let mut versions: Vec<ContractVersion> = tables
            .versions
            .iter()
            .filter(|v| &v.contract_id == contract_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        Ok(versions)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ContractVersion>, DomainError> {
        let tables = self.tables.lock();
        Ok(tables.versions.iter().filter(|v| ids.contains(&v.id)).cloned().collect())
    }
}

#[async_trait]
impl StatisticsRepository for MemoryStore {
    async fn snapshot(&self) -> Result<StatisticsSnapshot, DomainError> {
        let tables = self.tables.lock();
        let live_contracts: Vec<&Contract> = tables.contracts.iter().filter(|c| !c.is_deleted()).collect();
        let live_contract_ids: HashSet<Uuid> = live_contracts.iter().map(|c| c.id).collect();

        let properties: Vec<&Address> = tables
            .addresses
            .iter()
            .filter(|a| !a.is_deleted() && a.address_type == AddressType::Property)
            .collect();
        let count_users = |user_type: UserType| {
            tables
                .users
                .iter()
                .filter(|u| !u.is_deleted() && u.user_type == user_type)
                .count() as i64
        };

        let active: Vec<(&Contract, &ContractVersion)> =
            tables.contracts_with_status(ContractStatus::Active).collect();
        let active_tenants: HashSet<Uuid> = active.iter().map(|(c, _)| c.tenant_id).collect();

        let durations: Vec<i64> = tables
            .versions
            .iter()
            .filter(|v| live_contract_ids.contains(&v.contract_id))
            .map(ContractVersion::duration_days)
            .collect();
        let average_duration_days = if durations.is_empty() {
            None
        } else {
            Some(durations.iter().sum::<i64>() as f64 / durations.len() as f64)
        };

        Ok(StatisticsSnapshot {
            total_contracts: live_contracts.len() as i64,
            active_contracts: active.len() as i64,
            expired_contracts: tables.contracts_with_status(ContractStatus::Expired).count() as i64,
            total_properties: properties.len() as i64,
            occupied_properties: properties.iter().filter(|a| tables.is_occupied(&a.id)).count() as i64,
            total_tenants: count_users(UserType::Tenant),
            total_references: count_users(UserType::Reference),
            active_tenants: active_tenants.len() as i64,
            monthly_revenue: active.iter().map(|(_, v)| v.rent).sum(),
            average_duration_days,
        })
    }
}

#[async_trait]
impl StorageHealth for MemoryStore {
    async fn ping(&self) -> Result<(), DomainError> {
        let _tables = self.tables.lock();
        Ok(())
    }
}

#[cfg(test)]
mod tests;
