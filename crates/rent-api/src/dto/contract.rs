//! Contract DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rent_core::domain::{ContractDraft, ContractFilter, ContractPatch, HydratedContract};

use super::{parse_optional_id, AddressResponse, UserResponse, VersionResponse};
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContractRequest {
    pub landlord_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub address_id: Option<Uuid>,
    #[serde(default)]
    pub reference_ids: Vec<Uuid>,
}

/// Merge-patch body. A present `referenceIds`, even `[]`, replaces the set.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContractRequest {
    pub landlord_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub address_id: Option<Uuid>,
    pub current_version_id: Option<Uuid>,
    pub reference_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCurrentVersionRequest {
    pub version_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractQuery {
    pub tenant_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQuery {
    pub version_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractResponse {
    pub id: Uuid,
    pub landlord_id: Uuid,
    pub tenant_id: Uuid,
    pub address_id: Uuid,
    pub current_version_id: Option<Uuid>,
    pub current_version: Option<VersionResponse>,
    pub landlord: Option<UserResponse>,
    pub tenant: Option<UserResponse>,
    pub address: Option<AddressResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<VersionResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<UserResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<CreateContractRequest> for ContractDraft {
    fn from(req: CreateContractRequest) -> Self {
        ContractDraft {
            landlord_id: req.landlord_id,
            tenant_id: req.tenant_id,
            address_id: req.address_id,
            reference_ids: req.reference_ids,
        }
    }
}

impl From<UpdateContractRequest> for ContractPatch {
    fn from(req: UpdateContractRequest) -> Self {
        ContractPatch {
            landlord_id: req.landlord_id,
            tenant_id: req.tenant_id,
            address_id: req.address_id,
            current_version_id: req.current_version_id,
            reference_ids: req.reference_ids,
        }
    }
}

impl ContractQuery {
    pub fn into_filter(self) -> Result<ContractFilter, ApiError> {
        Ok(ContractFilter {
            tenant_id: parse_optional_id("tenantId", self.tenant_id.as_deref())?,
        })
    }
}

impl DocumentQuery {
    pub fn version_id(&self) -> Result<Option<Uuid>, ApiError> {
        parse_optional_id("versionId", self.version_id.as_deref())
    }
}

impl From<&HydratedContract> for ContractResponse {
    fn from(hydrated: &HydratedContract) -> Self {
        let contract = &hydrated.contract;
        Self {
            id: contract.id,
            landlord_id: contract.landlord_id,
            tenant_id: contract.tenant_id,
            address_id: contract.address_id,
            current_version_id: contract.current_version_id,
            current_version: hydrated.current_version.as_ref().map(VersionResponse::from),
            landlord: hydrated.landlord.as_ref().map(UserResponse::from),
            tenant: hydrated.tenant.as_ref().map(UserResponse::from),
            address: hydrated.address.as_ref().map(AddressResponse::from),
            versions: hydrated.versions.iter().map(VersionResponse::from).collect(),
            references: hydrated.references.iter().map(UserResponse::from).collect(),
            created_at: contract.audit.created_at,
            updated_at: contract.audit.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_ids_presence() {
        let absent: UpdateContractRequest = serde_json::from_str("{}").unwrap();
        assert!(ContractPatch::from(absent).reference_ids.is_none());

        let cleared: UpdateContractRequest =
            serde_json::from_str(r#"{"referenceIds": []}"#).unwrap();
        assert_eq!(ContractPatch::from(cleared).reference_ids, Some(Vec::new()));
    }

    #[test]
    fn test_bad_tenant_filter_is_bad_request() {
        let query = ContractQuery {
            tenant_id: Some("nope".to_string()),
        };
        assert!(matches!(query.into_filter(), Err(ApiError::BadRequest(_))));
    }
}
