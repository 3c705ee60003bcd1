//! # Rent API
//! 
//! HTTP handlers, DTOs, error mapping and routing.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{build_router, cors_layer};
pub use state::AppState;
