//! Address DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rent_core::domain::{Address, AddressFilter, AddressPatch, AddressType, NewAddress};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressRequest {
    #[serde(rename = "type")]
    pub address_type: String,
    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressRequest {
    #[serde(rename = "type")]
    pub address_type: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

/// Query string for `GET /addresses`, kept as raw strings so bad values map to 400
#[derive(Debug, Default, Deserialize)]
pub struct AddressQuery {
    #[serde(rename = "type")]
    pub address_type: Option<String>,
    pub available: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub address_type: AddressType,
    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub full_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub(crate) fn parse_address_type(raw: &str) -> Result<AddressType, ApiError> {
    AddressType::from_str(raw).ok_or_else(|| {
        ApiError::Validation(format!(
            "type must be one of property, tenant, reference (got '{}')",
            raw
        ))
    })
}

impl CreateAddressRequest {
    pub fn into_domain(self) -> Result<NewAddress, ApiError> {
        Ok(NewAddress {
            address_type: parse_address_type(&self.address_type)?,
            street: self.street,
            number: self.number,
            neighborhood: self.neighborhood,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            country: self.country,
        })
    }
}

impl UpdateAddressRequest {
    pub fn into_domain(self) -> Result<AddressPatch, ApiError> {
        Ok(AddressPatch {
            address_type: self.address_type.as_deref().map(parse_address_type).transpose()?,
            street: self.street,
            number: self.number,
            neighborhood: self.neighborhood,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            country: self.country,
        })
    }
}

impl AddressQuery {
    pub fn into_filter(self) -> Result<AddressFilter, ApiError> {
        let address_type = self
            .address_type
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|raw| {
                AddressType::from_str(raw)
                    .ok_or_else(|| ApiError::BadRequest(format!("unknown address type '{}'", raw)))
            })
            .transpose()?;

        let available = match self.available.as_deref().map(str::trim) {
            None | Some("") => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => {
                return Err(ApiError::BadRequest(format!(
                    "available must be true or false (got '{}')",
                    other
                )))
            }
        };

        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                ApiError::BadRequest(format!("limit must be a non-negative integer (got '{}')", raw))
            })?),
        };

        Ok(AddressFilter {
            address_type,
            available,
            limit,
        })
    }
}

impl From<&Address> for AddressResponse {
    fn from(address: &Address) -> Self {
        Self {
            id: address.id,
            address_type: address.address_type,
            street: address.street.clone(),
            number: address.number.clone(),
            neighborhood: address.neighborhood.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip_code: address.zip_code.clone(),
            country: address.country.clone(),
            full_address: address.full_address(),
            created_at: address.audit.created_at,
            updated_at: address.audit.updated_at,
        }
    }
}
