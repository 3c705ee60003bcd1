//! # Rent Core
//! 
//! Domain entities, services, repository traits, and the lease document renderer.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod document;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
