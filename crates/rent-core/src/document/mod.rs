// ============================================================================
// Rent Core - Document Renderer
// File: crates/rent-core/src/document/mod.rs
// Description: Lease PDF generation from a hydrated contract
// ============================================================================
//! Lease document rendering.
//!
//! [`render`] is a pure function of the hydrated contract and the selected
//! version: the same input always yields the same bytes, and any missing
//! related data is reported before output is produced.

pub mod format;
pub mod layout;
mod lease;

use uuid::Uuid;

use crate::domain::{ContractVersion, HydratedContract};
use crate::error::DomainError;

pub use lease::LATE_FEE_PERCENTAGE;

/// Pick the version to render: an explicit id must be one of the contract's
/// versions; otherwise the current version is used.
pub fn select_version(
    contract: &HydratedContract,
    version_id: Option<Uuid>,
) -> Result<&ContractVersion, DomainError> {
    if let Some(id) = version_id {
        return contract
            .version(&id)
            .or_else(|| contract.current_version.as_ref().filter(|v| v.id == id))
            .ok_or_else(|| DomainError::not_found("ContractVersion", id));
    }

    match (&contract.current_version, contract.contract.current_version_id) {
        (Some(version), _) => Ok(version),
        (None, Some(id)) => Err(DomainError::DependencyError(format!(
            "current version {} is not loaded on the contract",
            id
        ))),
        (None, None) => Err(DomainError::Conflict("no version available to render".to_string())),
    }
}

pub fn render(contract: &HydratedContract, version_id: Option<Uuid>) -> Result<Vec<u8>, DomainError> {
    let version = select_version(contract, version_id)?;
    let blocks = lease::compose(contract, version)?;

    let mut composer = layout::PageComposer::new();
    for block in &blocks {
        composer.push(block);
    }
    layout::write_pdf(&composer.finish())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::address::sample_address;
    use crate::domain::contract_version::sample_draft;
    use crate::domain::user::sample_user;
    use crate::domain::{AddressType, ContractDraft, PartyView, UserType};

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle.as_bytes())
    }

    fn hydrated_with_version() -> HydratedContract {
        let property = sample_address(AddressType::Property);
        let home = sample_address(AddressType::Tenant);
        let landlord = sample_user(UserType::Admin, "Carlos", "Ruiz", home.id);
        let tenant = sample_user(UserType::Tenant, "Ana", "Lopez", home.id);
        let reference = sample_user(UserType::Reference, "Luis", "Perez", home.id);

        let (mut contract, _) = ContractDraft {
            landlord_id: Some(landlord.id),
            tenant_id: Some(tenant.id),
            address_id: Some(property.id),
            reference_ids: vec![reference.id],
        }
        .into_contract()
        .unwrap();

        let version = ContractVersion::from_terms(&sample_draft(contract.id).into_terms().unwrap(), 1);
        contract.current_version_id = Some(version.id);

        HydratedContract {
            contract,
            current_version: Some(version.clone()),
            landlord: Some(PartyView { user: landlord, address: Some(home.clone()) }),
            tenant: Some(PartyView { user: tenant, address: Some(home.clone()) }),
            address: Some(property),
            versions: vec![version],
            references: vec![PartyView { user: reference, address: Some(home) }],
        }
    }

    #[test]
    fn test_render_contains_terms() {
        let contract = hydrated_with_version();
        let bytes = render(&contract, None).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(contains(&bytes, "$1000.00"));
        assert!(contains(&bytes, "1 de enero de 2024"));
        assert!(contains(&bytes, "31 de diciembre de 2024"));
        assert!(contains(&bytes, "Carlos Ruiz"));
        assert!(contains(&bytes, "Ana Lopez"));
        assert!(contains(&bytes, "Luis Perez"));
        assert!(contains(&bytes, "$100.00"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let contract = hydrated_with_version();
        assert_eq!(render(&contract, None).unwrap(), render(&contract, None).unwrap());
    }

    #[test]
    fn test_explicit_version_selection() {
        let mut contract = hydrated_with_version();
        let mut older = contract.versions[0].clone();
        older.id = Uuid::new_v4();
        older.rent = 850.0;
        older.start_date = NaiveDate::from_ymd_opt(2023, 3, 15).unwrap();
        contract.versions.push(older.clone());

        let bytes = render(&contract, Some(older.id)).unwrap();
        assert!(contains(&bytes, "$850.00"));
        assert!(contains(&bytes, "15 de marzo de 2023"));

        let unknown = render(&contract, Some(Uuid::new_v4()));
        assert!(matches!(unknown, Err(DomainError::NotFound { .. })));
    }

    #[test]
    fn test_no_version_is_conflict() {
        let mut contract = hydrated_with_version();
        contract.current_version = None;
        contract.contract.current_version_id = None;
        contract.versions.clear();

        assert!(matches!(render(&contract, None), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn test_unloaded_current_version_is_dependency_error() {
        let mut contract = hydrated_with_version();
        contract.current_version = None;

        assert!(matches!(select_version(&contract, None), Err(DomainError::DependencyError(_))));
    }

    #[test]
    fn test_missing_party_is_dependency_error() {
        let mut contract = hydrated_with_version();
        contract.tenant = None;
        assert!(matches!(render(&contract, None), Err(DomainError::DependencyError(_))));

        let mut contract = hydrated_with_version();
        contract.address = None;
        assert!(matches!(render(&contract, None), Err(DomainError::DependencyError(_))));
    }

    #[test]
    fn test_no_references_renders_placeholder() {
        let mut contract = hydrated_with_version();
        contract.references.clear();

        let bytes = render(&contract, None).unwrap();
        assert!(contains(&bytes, "Sin referencias registradas"));
    }
}
