//! Contract version DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rent_core::domain::{ContractStatus, ContractType, ContractVersion, VersionDraft};

use super::flexible_date;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersionRequest {
    pub contract_id: Uuid,
    pub rent: f64,
    pub deposit: f64,
    pub rent_increase_percentage: f64,
    pub business: String,
    pub status: String,
    #[serde(rename = "type")]
    pub contract_type: String,
    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub end_date: NaiveDate,
    #[serde(default, deserialize_with = "flexible_date::option::deserialize")]
    pub renewal_date: Option<NaiveDate>,
    pub special_terms: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub version_number: i32,
    pub rent: f64,
    pub deposit: f64,
    pub rent_increase_percentage: f64,
    pub business: String,
    pub status: ContractStatus,
    #[serde(rename = "type")]
    pub contract_type: ContractType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub renewal_date: Option<NaiveDate>,
    pub special_terms: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CreateVersionRequest> for VersionDraft {
    fn from(req: CreateVersionRequest) -> Self {
        VersionDraft {
            contract_id: req.contract_id,
            rent: req.rent,
            deposit: req.deposit,
            rent_increase_percentage: req.rent_increase_percentage,
            business: req.business,
            status: req.status,
            contract_type: req.contract_type,
            start_date: req.start_date,
            end_date: req.end_date,
            renewal_date: req.renewal_date,
            special_terms: req.special_terms,
        }
    }
}

impl From<&ContractVersion> for VersionResponse {
    fn from(version: &ContractVersion) -> Self {
        Self {
            id: version.id,
            contract_id: version.contract_id,
            version_number: version.version_number,
            rent: version.rent,
            deposit: version.deposit,
            rent_increase_percentage: version.rent_increase_percentage,
            business: version.business.clone(),
            status: version.status,
            contract_type: version.contract_type,
            start_date: version.start_date,
            end_date: version.end_date,
            renewal_date: version.renewal_date,
            special_terms: version.special_terms.clone(),
            created_at: version.created_at,
        }
    }
}
