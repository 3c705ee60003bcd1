//! Aggregate statistics

use serde::Serialize;

/// Raw figures read from storage over live rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsSnapshot {
    pub total_contracts: i64,
    pub active_contracts: i64,
    pub expired_contracts: i64,
    pub total_properties: i64,
    pub occupied_properties: i64,
    pub total_tenants: i64,
    pub total_references: i64,
    pub active_tenants: i64,
    /// Sum of current-version rent over active contracts
    pub monthly_revenue: f64,
    /// Mean `end_date - start_date` in days over all versions
    pub average_duration_days: Option<f64>,
}

/// Report served to callers, with derived ratios filled in
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStatistics {
    pub total_contracts: i64,
    pub active_contracts: i64,
    pub expired_contracts: i64,

    pub total_properties: i64,
    pub occupied_properties: i64,
    pub vacant_properties: i64,

    pub total_tenants: i64,
    pub total_references: i64,
    pub active_tenants: i64,

    pub monthly_revenue: f64,
    pub average_rent: f64,
    pub total_revenue: f64,

    pub occupancy_rate: f64,
    /// Days
    pub average_contract_duration: i64,
}

impl From<StatisticsSnapshot> for OverallStatistics {
    fn from(s: StatisticsSnapshot) -> Self {
        let average_rent = if s.active_contracts > 0 {
            s.monthly_revenue / s.active_contracts as f64
        } else {
            0.0
        };
        let occupancy_rate = if s.total_properties > 0 {
            s.occupied_properties as f64 / s.total_properties as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_contracts: s.total_contracts,
            active_contracts: s.active_contracts,
            expired_contracts: s.expired_contracts,
            total_properties: s.total_properties,
            occupied_properties: s.occupied_properties,
            vacant_properties: (s.total_properties - s.occupied_properties).max(0),
            total_tenants: s.total_tenants,
            total_references: s.total_references,
            active_tenants: s.active_tenants,
            monthly_revenue: s.monthly_revenue,
            average_rent,
            total_revenue: s.monthly_revenue * 12.0,
            occupancy_rate,
            average_contract_duration: s.average_duration_days.map(|d| d.trunc() as i64).unwrap_or(0),
        }
    }
}
