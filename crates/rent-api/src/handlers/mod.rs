pub mod addresses;
pub mod contracts;
pub mod health;
pub mod statistics;
pub mod users;
pub mod versions;
