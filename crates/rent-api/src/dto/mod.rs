//! Request and response bodies (camelCase JSON)

pub mod address;
pub mod contract;
pub mod user;
pub mod version;

pub use address::{AddressQuery, AddressResponse, CreateAddressRequest, UpdateAddressRequest};
pub use contract::{
    ContractQuery, ContractResponse, CreateContractRequest, DocumentQuery,
    SetCurrentVersionRequest, UpdateContractRequest,
};
pub use user::{CreateUserRequest, UpdateUserRequest, UserQuery, UserResponse};
pub use version::{CreateVersionRequest, VersionResponse};

use uuid::Uuid;

use rent_shared::utils::parse_uuid;

use crate::error::ApiError;

/// Parse a path or query id, rejecting malformed values before any lookup
pub fn parse_id(name: &str, raw: &str) -> Result<Uuid, ApiError> {
    parse_uuid(raw).ok_or_else(|| ApiError::invalid_id(name, raw))
}

fn parse_optional_id(name: &str, raw: Option<&str>) -> Result<Option<Uuid>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_id(name, raw).map(Some),
        None => Ok(None),
    }
}

/// Version dates: `YYYY-MM-DD`, or an RFC 3339 timestamp truncated to its date
pub(crate) mod flexible_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw)))
    }

    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw))),
                _ => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_flexible_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert_eq!(flexible_date::parse("2024-01-01"), expected);
        assert_eq!(flexible_date::parse("2024-01-01T00:00:00Z"), expected);
        assert_eq!(flexible_date::parse("2024-01-01T10:30:00-06:00"), expected);
        assert_eq!(flexible_date::parse("01/01/2024"), None);
    }

    #[test]
    fn test_parse_id() {
        assert!(parse_id("id", "not-a-uuid").is_err());
        assert!(parse_optional_id("tenantId", Some("")).unwrap().is_none());
        let id = Uuid::new_v4();
        assert_eq!(parse_optional_id("tenantId", Some(&id.to_string())).unwrap(), Some(id));
    }
}
