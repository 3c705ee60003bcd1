// ============================================================================
// Rent Core - Contract Version Entity
// File: crates/rent-core/src/domain/contract_version.rs
// Description: Immutable, sequentially numbered contract terms
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use rent_shared::types::new_id;

use crate::error::DomainError;

/// Contract status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Active,
    Expired,
    Terminated,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Active => "active",
            ContractStatus::Expired => "expired",
            ContractStatus::Terminated => "terminated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(ContractStatus::Active),
            "expired" => Some(ContractStatus::Expired),
            "terminated" => Some(ContractStatus::Terminated),
            _ => None,
        }
    }
}

/// Contract duration type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Yearly,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Yearly => "yearly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "yearly" => Some(ContractType::Yearly),
            _ => None,
        }
    }
}

/// Contract version entity. Never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractVersion {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub version_number: i32,
    pub rent: f64,
    pub deposit: f64,
    pub rent_increase_percentage: f64,
    pub business: String,
    pub status: ContractStatus,
    pub contract_type: ContractType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub renewal_date: Option<NaiveDate>,
    pub special_terms: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Raw version input as received from callers
#[derive(Debug, Clone, Validate)]
pub struct VersionDraft {
    pub contract_id: Uuid,

    #[validate(range(min = 0.0, message = "Rent must not be negative"))]
    pub rent: f64,

    #[validate(range(min = 0.0, message = "Deposit must not be negative"))]
    pub deposit: f64,

    #[validate(range(min = 0.0, max = 100.0, message = "Rent increase percentage must be between 0 and 100"))]
    pub rent_increase_percentage: f64,

    #[validate(length(min = 1, max = 500, message = "Business must be between 1 and 500 characters"))]
    pub business: String,

    pub status: String,
    pub contract_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub renewal_date: Option<NaiveDate>,

    #[validate(length(max = 5000, message = "Special terms too long"))]
    pub special_terms: Option<String>,
}

/// Validated terms ready to be numbered and stored
#[derive(Debug, Clone, PartialEq)]
pub struct VersionTerms {
    pub contract_id: Uuid,
    pub rent: f64,
    pub deposit: f64,
    pub rent_increase_percentage: f64,
    pub business: String,
    pub status: ContractStatus,
    pub contract_type: ContractType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub renewal_date: Option<NaiveDate>,
    pub special_terms: Option<String>,
}

impl VersionDraft {
    pub fn into_terms(self) -> Result<VersionTerms, DomainError> {
        if self.contract_id.is_nil() {
            return Err(DomainError::ValidationError("contractId is required".to_string()));
        }
        for (value, field) in [
            (self.rent, "rent"),
            (self.deposit, "deposit"),
            (self.rent_increase_percentage, "rentIncreasePercentage"),
        ] {
            if !value.is_finite() {
                return Err(DomainError::ValidationError(format!("{} must be a finite number", field)));
            }
        }

        let business = self.business.trim().to_string();
        let special_terms = self
            .special_terms
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let draft = VersionDraft {
            business,
            special_terms,
            ..self
        };
        draft.validate()?;

        let status = ContractStatus::from_str(&draft.status).ok_or_else(|| {
            DomainError::ValidationError(format!(
                "status must be one of active, expired, terminated (got '{}')",
                draft.status
            ))
        })?;
        let contract_type = ContractType::from_str(&draft.contract_type).ok_or_else(|| {
            DomainError::ValidationError(format!("type must be yearly (got '{}')", draft.contract_type))
        })?;

        if draft.start_date > draft.end_date {
            return Err(DomainError::ValidationError(
                "startDate must not be after endDate".to_string(),
            ));
        }
        if draft.renewal_date.is_some_and(|renewal| renewal < draft.start_date) {
            return Err(DomainError::ValidationError(
                "renewalDate must not be before startDate".to_string(),
            ));
        }

        // adding +0.0 folds a negative zero into zero
        Ok(VersionTerms {
            contract_id: draft.contract_id,
            rent: draft.rent + 0.0,
            deposit: draft.deposit + 0.0,
            rent_increase_percentage: draft.rent_increase_percentage + 0.0,
            business: draft.business,
            status,
            contract_type,
            start_date: draft.start_date,
            end_date: draft.end_date,
            renewal_date: draft.renewal_date,
            special_terms: draft.special_terms,
        })
    }
}

/// Next number in a contract's sequence given the highest one stored so far
pub fn next_version_number(current_max: Option<i32>) -> i32 {
    current_max.unwrap_or(0) + 1
}

impl ContractVersion {
    /// Materialize numbered terms as a new version
    pub fn from_terms(terms: &VersionTerms, version_number: i32) -> Self {
        Self {
            id: new_id(),
            contract_id: terms.contract_id,
            version_number,
            rent: terms.rent,
            deposit: terms.deposit,
            rent_increase_percentage: terms.rent_increase_percentage,
            business: terms.business.clone(),
            status: terms.status,
            contract_type: terms.contract_type,
            start_date: terms.start_date,
            end_date: terms.end_date,
            renewal_date: terms.renewal_date,
            special_terms: terms.special_terms.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

#[cfg(test)]
pub(crate) fn sample_draft(contract_id: Uuid) -> VersionDraft {
    VersionDraft {
        contract_id,
        rent: 1000.0,
        deposit: 1000.0,
        rent_increase_percentage: 10.0,
        business: "Casa habitación".to_string(),
        status: "active".to_string(),
        contract_type: "yearly".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        renewal_date: None,
        special_terms: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_validation(draft: VersionDraft, needle: &str) {
        match draft.into_terms() {
            Err(DomainError::ValidationError(msg)) => {
                assert!(msg.contains(needle), "'{}' not in '{}'", needle, msg)
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_draft() {
        let terms = sample_draft(Uuid::new_v4()).into_terms().unwrap();
        assert_eq!(terms.status, ContractStatus::Active);
        assert_eq!(terms.contract_type, ContractType::Yearly);
    }

    #[test]
    fn test_negative_rent_rejected() {
        let draft = VersionDraft { rent: -1.0, ..sample_draft(Uuid::new_v4()) };
        expect_validation(draft, "Rent must not be negative");
    }

    #[test]
    fn test_increase_above_hundred_rejected() {
        let draft = VersionDraft {
            rent_increase_percentage: 100.5,
            ..sample_draft(Uuid::new_v4())
        };
        expect_validation(draft, "between 0 and 100");
    }

    #[test]
    fn test_non_finite_rejected() {
        let draft = VersionDraft { deposit: f64::NAN, ..sample_draft(Uuid::new_v4()) };
        expect_validation(draft, "deposit");
    }

    #[test]
    fn test_negative_zero_amounts_become_zero() {
        let draft = VersionDraft {
            rent: -0.0,
            deposit: -0.0,
            rent_increase_percentage: -0.0,
            ..sample_draft(Uuid::new_v4())
        };
        let terms = draft.into_terms().unwrap();
        assert!(terms.rent.is_sign_positive());
        assert!(terms.deposit.is_sign_positive());
        assert!(terms.rent_increase_percentage.is_sign_positive());
        assert_eq!(crate::document::format::money(terms.rent), "$0.00");
        assert_eq!(crate::document::format::money(terms.deposit), "$0.00");
    }

    #[test]
    fn test_unknown_status_and_type_rejected() {
        let draft = VersionDraft {
            status: "pending".to_string(),
            ..sample_draft(Uuid::new_v4())
        };
        expect_validation(draft, "status");

        let draft = VersionDraft {
            contract_type: "monthly".to_string(),
            ..sample_draft(Uuid::new_v4())
        };
        expect_validation(draft, "type");
    }

    #[test]
    fn test_start_after_end_rejected() {
        let draft = VersionDraft {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            ..sample_draft(Uuid::new_v4())
        };
        expect_validation(draft, "startDate");
    }

    #[test]
    fn test_blank_business_rejected() {
        let draft = VersionDraft {
            business: "   ".to_string(),
            ..sample_draft(Uuid::new_v4())
        };
        expect_validation(draft, "Business");
    }

    #[test]
    fn test_next_version_number() {
        assert_eq!(next_version_number(None), 1);
        assert_eq!(next_version_number(Some(4)), 5);
    }

    #[test]
    fn test_duration_days() {
        let terms = sample_draft(Uuid::new_v4()).into_terms().unwrap();
        let version = ContractVersion::from_terms(&terms, 1);
        assert_eq!(version.duration_days(), 365);
    }
}
