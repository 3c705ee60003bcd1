//! Hydrated read models

use uuid::Uuid;

use super::{Address, Contract, ContractVersion, User};

/// How much of a contract's graph a read operation loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// Current version, landlord and tenant (each with address), property address.
    Summary,
    /// Everything in `Summary` plus the full version history and the reference parties.
    Detail,
}

impl Hydration {
    pub fn includes_history(&self) -> bool {
        matches!(self, Hydration::Detail)
    }
}

/// A party together with its own address
#[derive(Debug, Clone, PartialEq)]
pub struct PartyView {
    pub user: User,
    pub address: Option<Address>,
}

/// Contract with its related records resolved at some [`Hydration`] depth
#[derive(Debug, Clone, PartialEq)]
pub struct HydratedContract {
    pub contract: Contract,
    pub current_version: Option<ContractVersion>,
    pub landlord: Option<PartyView>,
    pub tenant: Option<PartyView>,
    pub address: Option<Address>,
    /// Newest first; empty below `Detail`.
    pub versions: Vec<ContractVersion>,
    /// Empty below `Detail`.
    pub references: Vec<PartyView>,
}

impl HydratedContract {
    /// Contract with nothing loaded around it
    pub fn bare(contract: Contract) -> Self {
        Self {
            contract,
            current_version: None,
            landlord: None,
            tenant: None,
            address: None,
            versions: Vec::new(),
            references: Vec::new(),
        }
    }

    pub fn version(&self, id: &Uuid) -> Option<&ContractVersion> {
        self.versions.iter().find(|v| &v.id == id)
    }
}
