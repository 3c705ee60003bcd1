//! Repository traits (ports)

use std::sync::Arc;

pub mod address_repository;
pub mod user_repository;
pub mod contract_repository;
pub mod version_repository;
pub mod statistics_repository;

pub use address_repository::AddressRepository;
pub use user_repository::UserRepository;
pub use contract_repository::ContractRepository;
pub use version_repository::VersionRepository;
pub use statistics_repository::{StatisticsRepository, StorageHealth};

#[cfg(test)]
pub use address_repository::MockAddressRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use contract_repository::MockContractRepository;
#[cfg(test)]
pub use version_repository::MockVersionRepository;
#[cfg(test)]
pub use statistics_repository::{MockStatisticsRepository, MockStorageHealth};

/// Handle to one persistence gateway, passed to every service at construction
#[derive(Clone)]
pub struct Repositories {
    pub addresses: Arc<dyn AddressRepository>,
    pub users: Arc<dyn UserRepository>,
    pub contracts: Arc<dyn ContractRepository>,
    pub versions: Arc<dyn VersionRepository>,
    pub statistics: Arc<dyn StatisticsRepository>,
    pub health: Arc<dyn StorageHealth>,
}

impl Repositories {
    /// Build the bundle from a single adapter implementing every port
    pub fn from_gateway<G>(gateway: Arc<G>) -> Self
    where
        G: AddressRepository
            + UserRepository
            + ContractRepository
            + VersionRepository
            + StatisticsRepository
            + StorageHealth
            + 'static,
    {
        Self {
            addresses: gateway.clone(),
            users: gateway.clone(),
            contracts: gateway.clone(),
            versions: gateway.clone(),
            statistics: gateway.clone(),
            health: gateway,
        }
    }
}
