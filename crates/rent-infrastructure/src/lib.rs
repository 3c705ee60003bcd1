//! # Rent Infrastructure
//! 
//! Persistence gateway adapters: PostgreSQL and in-memory.

pub mod database;
pub mod memory;
pub mod gateway;

pub use database::{
    create_pool, run_migrations, PgAddressRepository, PgContractRepository, PgHealthCheck,
    PgStatisticsRepository, PgUserRepository, PgVersionRepository,
};
pub use gateway::{build_repositories, postgres_repositories};
pub use memory::MemoryStore;
