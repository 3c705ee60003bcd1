use std::sync::Arc;

use axum::extract::FromRef;

use rent_core::repositories::{Repositories, StorageHealth};
use rent_core::services::{
    AddressService, ContractService, StatisticsService, UserService, VersionService,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub addresses: Arc<AddressService>,
    pub users: Arc<UserService>,
    pub contracts: Arc<ContractService>,
    pub versions: Arc<VersionService>,
    pub statistics: Arc<StatisticsService>,
    pub health: Arc<dyn StorageHealth>,
}

impl AppState {
    pub fn new(repos: Repositories) -> Self {
        Self {
            addresses: Arc::new(AddressService::new(repos.clone())),
            users: Arc::new(UserService::new(repos.clone())),
            contracts: Arc::new(ContractService::new(repos.clone())),
            versions: Arc::new(VersionService::new(repos.clone())),
            statistics: Arc::new(StatisticsService::new(repos.clone())),
            health: repos.health,
        }
    }
}

impl FromRef<AppState> for Arc<ContractService> {
    fn from_ref(state: &AppState) -> Self {
        state.contracts.clone()
    }
}

impl FromRef<AppState> for Arc<VersionService> {
    fn from_ref(state: &AppState) -> Self {
        state.versions.clone()
    }
}
