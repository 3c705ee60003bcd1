//! # Rent Core - Domain Module
//! 
//! Domain entities for the rent contracts application.

pub mod address;
pub mod user;
pub mod contract;
pub mod contract_version;
pub mod hydrated;
pub mod statistics;

// Re-export all entities and enums
pub use address::{Address, AddressFilter, AddressPatch, AddressType, NewAddress};
pub use user::{NewUser, User, UserFilter, UserPatch, UserType};
pub use contract::{Contract, ContractDraft, ContractFilter, ContractPatch, ContractReference};
pub use contract_version::{
    next_version_number, ContractStatus, ContractType, ContractVersion, VersionDraft, VersionTerms,
};
pub use hydrated::{HydratedContract, Hydration, PartyView};
pub use statistics::{OverallStatistics, StatisticsSnapshot};
