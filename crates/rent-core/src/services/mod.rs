//! Domain services (business logic)

pub mod address_service;
pub mod user_service;
pub mod contract_service;
pub mod version_service;
pub mod statistics_service;

pub use address_service::AddressService;
pub use user_service::UserService;
pub use contract_service::ContractService;
pub use version_service::{VersionService, MAX_VERSION_RETRIES};
pub use statistics_service::StatisticsService;
