// ============================================================================
// Rent Core - Address Entity
// File: crates/rent-core/src/domain/address.rs
// Description: Postal address of a property, tenant, or reference
// ============================================================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use rent_shared::types::{new_id, AuditFields};

/// Address type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Property,
    Tenant,
    Reference,
}

impl AddressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Property => "property",
            AddressType::Tenant => "tenant",
            AddressType::Reference => "reference",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "property" => Some(AddressType::Property),
            "tenant" => Some(AddressType::Tenant),
            "reference" => Some(AddressType::Reference),
            _ => None,
        }
    }
}

/// Address entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Address {
    pub id: Uuid,
    pub address_type: AddressType,

    #[validate(length(min = 1, max = 200, message = "Street must be between 1 and 200 characters"))]
    pub street: String,

    #[validate(length(min = 1, max = 20, message = "Number must be between 1 and 20 characters"))]
    pub number: String,

    #[validate(length(min = 1, max = 120, message = "Neighborhood must be between 1 and 120 characters"))]
    pub neighborhood: String,

    #[validate(length(min = 1, max = 120, message = "City must be between 1 and 120 characters"))]
    pub city: String,

    #[validate(length(min = 1, max = 120, message = "State must be between 1 and 120 characters"))]
    pub state: String,

    #[validate(length(min = 1, max = 20, message = "Zip code must be between 1 and 20 characters"))]
    pub zip_code: String,

    #[validate(length(min = 1, max = 120, message = "Country must be between 1 and 120 characters"))]
    pub country: String,

    pub audit: AuditFields,
}

/// Fields required to register a new address
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub address_type: AddressType,
    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Merge-patch for an address: `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct AddressPatch {
    pub address_type: Option<AddressType>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

/// Listing filter for addresses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressFilter {
    pub address_type: Option<AddressType>,
    /// `Some(true)`: property addresses without a live, active contract.
    /// `Some(false)`: property addresses that have one.
    pub available: Option<bool>,
    pub limit: Option<u32>,
}

impl Address {
    /// Create new address
    pub fn new(fields: NewAddress) -> Result<Self, validator::ValidationErrors> {
        let address = Self {
            id: new_id(),
            address_type: fields.address_type,
            street: fields.street.trim().to_string(),
            number: fields.number.trim().to_string(),
            neighborhood: fields.neighborhood.trim().to_string(),
            city: fields.city.trim().to_string(),
            state: fields.state.trim().to_string(),
            zip_code: fields.zip_code.trim().to_string(),
            country: fields.country.trim().to_string(),
            audit: AuditFields::default(),
        };

        address.validate()?;
        Ok(address)
    }

    /// Apply a merge-patch, re-validating the result
    pub fn apply(&mut self, patch: AddressPatch) -> Result<(), validator::ValidationErrors> {
        let mut next = self.clone();
        if let Some(address_type) = patch.address_type {
            next.address_type = address_type;
        }
        merge_trimmed(&mut next.street, patch.street);
        merge_trimmed(&mut next.number, patch.number);
        merge_trimmed(&mut next.neighborhood, patch.neighborhood);
        merge_trimmed(&mut next.city, patch.city);
        merge_trimmed(&mut next.state, patch.state);
        merge_trimmed(&mut next.zip_code, patch.zip_code);
        merge_trimmed(&mut next.country, patch.country);

        next.validate()?;
        next.audit.touch();
        *self = next;
        Ok(())
    }

    /// Single-line postal form used in documents
    pub fn full_address(&self) -> String {
        [
            self.street.as_str(),
            self.number.as_str(),
            self.neighborhood.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.zip_code.as_str(),
            self.country.as_str(),
        ]
        .join(", ")
    }

    pub fn is_deleted(&self) -> bool {
        self.audit.is_deleted()
    }
}

fn merge_trimmed(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value.trim().to_string();
    }
}

#[cfg(test)]
pub(crate) fn sample_address(address_type: AddressType) -> Address {
    Address::new(NewAddress {
        address_type,
        street: "Av. Juárez".to_string(),
        number: "120".to_string(),
        neighborhood: "Centro".to_string(),
        city: "Guadalajara".to_string(),
        state: "Jalisco".to_string(),
        zip_code: "44100".to_string(),
        country: "México".to_string(),
    })
    .unwrap()
}
