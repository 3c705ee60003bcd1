//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rent_core::domain::{NewUser, PartyView, UserFilter, UserPatch, UserType};

use super::AddressResponse;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(rename = "type")]
    pub user_type: String,
    pub address_id: Uuid,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(rename = "type")]
    pub user_type: Option<String>,
    pub address_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    #[serde(rename = "type")]
    pub user_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address_id: Uuid,
    pub address: Option<AddressResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn parse_user_type(raw: &str) -> Result<UserType, ApiError> {
    UserType::from_str(raw).ok_or_else(|| {
        ApiError::Validation(format!(
            "type must be one of admin, tenant, reference (got '{}')",
            raw
        ))
    })
}

impl CreateUserRequest {
    pub fn into_domain(self) -> Result<NewUser, ApiError> {
        Ok(NewUser {
            user_type: parse_user_type(&self.user_type)?,
            address_id: self.address_id,
            first_name: self.first_name,
            middle_name: self.middle_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
        })
    }
}

impl UpdateUserRequest {
    pub fn into_domain(self) -> Result<UserPatch, ApiError> {
        Ok(UserPatch {
            user_type: self.user_type.as_deref().map(parse_user_type).transpose()?,
            address_id: self.address_id,
            first_name: self.first_name,
            middle_name: self.middle_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
        })
    }
}

impl UserQuery {
    pub fn into_filter(self) -> Result<UserFilter, ApiError> {
        let user_type = self
            .user_type
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|raw| {
                UserType::from_str(raw)
                    .ok_or_else(|| ApiError::BadRequest(format!("unknown user type '{}'", raw)))
            })
            .transpose()?;
        Ok(UserFilter { user_type })
    }
}

impl From<&PartyView> for UserResponse {
    fn from(party: &PartyView) -> Self {
        let user = &party.user;
        Self {
            id: user.id,
            user_type: user.user_type,
            first_name: user.first_name.clone(),
            middle_name: user.middle_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address_id: user.address_id,
            address: party.address.as_ref().map(AddressResponse::from),
            created_at: user.audit.created_at,
            updated_at: user.audit.updated_at,
        }
    }
}
