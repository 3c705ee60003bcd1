// ============================================================================
// Rent Core - Contract Entity
// File: crates/rent-core/src/domain/contract.rs
// Description: Contract envelope, its reference join rows, and write inputs
// ============================================================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rent_shared::types::{new_id, AuditFields};
use rent_shared::utils::dedup_ids;

use crate::error::DomainError;

/// Contract entity. Terms live in [`crate::domain::ContractVersion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: Uuid,
    pub landlord_id: Uuid,
    pub tenant_id: Uuid,
    pub address_id: Uuid,
    /// Must point at a version whose `contract_id` is this contract.
    pub current_version_id: Option<Uuid>,
    pub audit: AuditFields,
}

/// Join row between a contract and a reference party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractReference {
    pub contract_id: Uuid,
    pub reference_id: Uuid,
}

/// Input for contract creation; ids are optional so missing ones surface as
/// validation errors rather than decode failures.
#[derive(Debug, Clone, Default)]
pub struct ContractDraft {
    pub landlord_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub address_id: Option<Uuid>,
    pub reference_ids: Vec<Uuid>,
}

/// Merge-patch for a contract. `reference_ids: Some(vec![])` clears the set.
#[derive(Debug, Clone, Default)]
pub struct ContractPatch {
    pub landlord_id: Option<Uuid>,
    pub tenant_id: Option<Uuid>,
    pub address_id: Option<Uuid>,
    pub current_version_id: Option<Uuid>,
    pub reference_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractFilter {
    pub tenant_id: Option<Uuid>,
}

impl ContractDraft {
    /// Validate required ids and build the contract plus its de-duplicated references
    pub fn into_contract(self) -> Result<(Contract, Vec<Uuid>), DomainError> {
        let landlord_id = required_id(self.landlord_id, "landlordId")?;
        let tenant_id = required_id(self.tenant_id, "tenantId")?;
        let address_id = required_id(self.address_id, "addressId")?;
        if self.reference_ids.iter().any(Uuid::is_nil) {
            return Err(DomainError::ValidationError(
                "referenceIds must not contain a nil id".to_string(),
            ));
        }

        let contract = Contract {
            id: new_id(),
            landlord_id,
            tenant_id,
            address_id,
            current_version_id: None,
            audit: AuditFields::default(),
        };

        Ok((contract, dedup_ids(&self.reference_ids)))
    }
}

impl ContractPatch {
    pub fn is_empty(&self) -> bool {
        self.landlord_id.is_none()
            && self.tenant_id.is_none()
            && self.address_id.is_none()
            && self.current_version_id.is_none()
            && self.reference_ids.is_none()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let ids = [
            (self.landlord_id, "landlordId"),
            (self.tenant_id, "tenantId"),
            (self.address_id, "addressId"),
            (self.current_version_id, "currentVersionId"),
        ];
        for (id, field) in ids {
            if id.is_some_and(|id| id.is_nil()) {
                return Err(DomainError::ValidationError(format!("{} must not be nil", field)));
            }
        }
        if let Some(reference_ids) = &self.reference_ids {
            if reference_ids.iter().any(Uuid::is_nil) {
                return Err(DomainError::ValidationError(
                    "referenceIds must not contain a nil id".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// De-duplicated replacement set, if one was supplied
    pub fn replacement_references(&self) -> Option<Vec<Uuid>> {
        self.reference_ids.as_deref().map(dedup_ids)
    }
}

impl Contract {
    /// Overwrite the scalar fields present in the patch; references are handled by the repository
    pub fn apply(&mut self, patch: &ContractPatch) {
        if let Some(landlord_id) = patch.landlord_id {
            self.landlord_id = landlord_id;
        }
        if let Some(tenant_id) = patch.tenant_id {
            self.tenant_id = tenant_id;
        }
        if let Some(address_id) = patch.address_id {
            self.address_id = address_id;
        }
        if let Some(version_id) = patch.current_version_id {
            self.current_version_id = Some(version_id);
        }
        self.audit.touch();
    }

    pub fn is_deleted(&self) -> bool {
        self.audit.is_deleted()
    }
}

fn required_id(id: Option<Uuid>, field: &str) -> Result<Uuid, DomainError> {
    match id {
        Some(id) if !id.is_nil() => Ok(id),
        _ => Err(DomainError::ValidationError(format!("{} is required", field))),
    }
}
