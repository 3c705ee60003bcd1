//! Statistics aggregator

use tracing::error;

use crate::domain::OverallStatistics;
use crate::error::DomainError;
use crate::repositories::Repositories;

pub struct StatisticsService {
    repos: Repositories,
}

impl StatisticsService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn overall(&self) -> Result<OverallStatistics, DomainError> {
        let snapshot = self.repos.statistics.snapshot().await.map_err(|e| {
            error!("Failed to read statistics snapshot: {}", e);
            e
        })?;
        Ok(OverallStatistics::from(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StatisticsSnapshot;
    use crate::services::test_support::MockSet;

    #[tokio::test]
    async fn test_overall_derives_from_snapshot() {
        let mut mocks = MockSet::default();
        mocks.statistics.expect_snapshot().returning(|| {
            Ok(StatisticsSnapshot {
                active_contracts: 2,
                total_properties: 4,
                occupied_properties: 1,
                monthly_revenue: 3000.0,
                ..Default::default()
            })
        });

        let service = StatisticsService::new(mocks.into_repositories());
        let stats = service.overall().await.unwrap();

        assert_eq!(stats.average_rent, 1500.0);
        assert_eq!(stats.vacant_properties, 3);
        assert_eq!(stats.occupancy_rate, 25.0);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let mut mocks = MockSet::default();
        mocks
            .statistics
            .expect_snapshot()
            .returning(|| Err(DomainError::DatabaseError("connection reset".into())));

        let service = StatisticsService::new(mocks.into_repositories());
        assert!(matches!(service.overall().await, Err(DomainError::DatabaseError(_))));
    }
}
