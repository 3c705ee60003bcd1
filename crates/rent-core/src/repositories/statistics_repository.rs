//! Statistics and health ports

use async_trait::async_trait;

use crate::domain::StatisticsSnapshot;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatisticsRepository: Send + Sync {
    async fn snapshot(&self) -> Result<StatisticsSnapshot, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageHealth: Send + Sync {
    /// Round-trip to the backing store
    async fn ping(&self) -> Result<(), DomainError>;
}
