// ============================================================================
// Rent Core - User Entity
// File: crates/rent-core/src/domain/user.rs
// Description: Parties to a contract (landlord/admin, tenant, reference)
// ============================================================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use rent_shared::types::{new_id, AuditFields};

/// User type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Admin,
    Tenant,
    Reference,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::Tenant => "tenant",
            UserType::Reference => "reference",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(UserType::Admin),
            "tenant" => Some(UserType::Tenant),
            "reference" => Some(UserType::Reference),
            _ => None,
        }
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Uuid,
    pub user_type: UserType,
    pub address_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: String,

    #[validate(length(max = 100, message = "Middle name too long"))]
    pub middle_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 30, message = "Phone must be between 1 and 30 characters"))]
    pub phone: String,

    pub audit: AuditFields,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_type: UserType,
    pub address_id: Uuid,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Merge-patch for a user: `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub user_type: Option<UserType>,
    pub address_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub user_type: Option<UserType>,
}

impl User {
    pub fn new(fields: NewUser) -> Result<Self, validator::ValidationErrors> {
        let user = Self {
            id: new_id(),
            user_type: fields.user_type,
            address_id: fields.address_id,
            first_name: fields.first_name.trim().to_string(),
            middle_name: normalize_optional(fields.middle_name),
            last_name: fields.last_name.trim().to_string(),
            email: fields.email.trim().to_lowercase(),
            phone: fields.phone.trim().to_string(),
            audit: AuditFields::default(),
        };

        user.validate()?;
        Ok(user)
    }

    pub fn apply(&mut self, patch: UserPatch) -> Result<(), validator::ValidationErrors> {
        let mut next = self.clone();
        if let Some(user_type) = patch.user_type {
            next.user_type = user_type;
        }
        if let Some(address_id) = patch.address_id {
            next.address_id = address_id;
        }
        if let Some(first_name) = patch.first_name {
            next.first_name = first_name.trim().to_string();
        }
        if patch.middle_name.is_some() {
            next.middle_name = normalize_optional(patch.middle_name);
        }
        if let Some(last_name) = patch.last_name {
            next.last_name = last_name.trim().to_string();
        }
        if let Some(email) = patch.email {
            next.email = email.trim().to_lowercase();
        }
        if let Some(phone) = patch.phone {
            next.phone = phone.trim().to_string();
        }

        next.validate()?;
        next.audit.touch();
        *self = next;
        Ok(())
    }

    /// First, middle (when present), and last name
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.audit.is_deleted()
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) fn sample_user(user_type: UserType, first_name: &str, last_name: &str, address_id: Uuid) -> User {
    User::new(NewUser {
        user_type,
        address_id,
        first_name: first_name.to_string(),
        middle_name: None,
        last_name: last_name.to_string(),
        email: format!("user.{}@example.com", Uuid::new_v4().simple()),
        phone: "33 1234 5678".to_string(),
    })
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_with_middle_name() {
        let mut user = sample_user(UserType::Tenant, "Ana", "López", Uuid::new_v4());
        assert_eq!(user.full_name(), "Ana López");

        user.apply(UserPatch {
            middle_name: Some(" María ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(user.full_name(), "Ana María López");
    }

    #[test]
    fn test_accented_names_with_ascii_email() {
        let user = sample_user(UserType::Tenant, "Tomás", "Muñoz", Uuid::new_v4());
        assert_eq!(user.full_name(), "Tomás Muñoz");
        assert!(user.email.is_ascii());
    }

    #[test]
    fn test_non_ascii_email_local_part_rejected() {
        let result = User::new(NewUser {
            user_type: UserType::Tenant,
            address_id: Uuid::new_v4(),
            first_name: "Ana".to_string(),
            middle_name: None,
            last_name: "López".to_string(),
            email: "ana.lópez@example.com".to_string(),
            phone: "555".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let result = User::new(NewUser {
            user_type: UserType::Reference,
            address_id: Uuid::new_v4(),
            first_name: "Luis".to_string(),
            middle_name: None,
            last_name: "Pérez".to_string(),
            email: "not-an-email".to_string(),
            phone: "555".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_keeps_absent_fields() {
        let mut user = sample_user(UserType::Admin, "Carlos", "Ruiz", Uuid::new_v4());
        let before = user.clone();

        user.apply(UserPatch {
            phone: Some("33 0000 0000".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(user.phone, "33 0000 0000");
        assert_eq!(user.email, before.email);
        assert_eq!(user.address_id, before.address_id);
        assert_eq!(user.user_type, before.user_type);
    }

    #[test]
    fn test_user_type_parsing() {
        assert_eq!(UserType::from_str("tenant"), Some(UserType::Tenant));
        assert_eq!(UserType::from_str("owner"), None);
    }
}
