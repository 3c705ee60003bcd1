use std::sync::Arc;

use chrono::NaiveDate;

use rent_core::domain::{
    ContractDraft, ContractStatus, ContractType, NewAddress, NewUser, VersionDraft, VersionTerms,
};
use rent_core::repositories::Repositories;
use rent_core::services::VersionService;

use super::*;

fn address(address_type: AddressType) -> Address {
    Address::new(NewAddress {
        address_type,
        street: "Calle Hidalgo".into(),
        number: "45".into(),
        neighborhood: "Centro".into(),
        city: "Morelia".into(),
        state: "Michoacán".into(),
        zip_code: "58000".into(),
        country: "México".into(),
    })
    .unwrap()
}

fn user(user_type: UserType, address_id: Uuid) -> User {
    User::new(NewUser {
        user_type,
        address_id,
        first_name: "Sofía".into(),
        middle_name: None,
        last_name: "Torres".into(),
        email: "sofia@example.com".into(),
        phone: "443 000 0000".into(),
    })
    .unwrap()
}

fn terms(contract_id: Uuid, status: ContractStatus, rent: f64) -> VersionTerms {
    VersionTerms {
        contract_id,
        rent,
        deposit: rent,
        rent_increase_percentage: 5.0,
        business: "Local comercial".into(),
        status,
        contract_type: ContractType::Yearly,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        renewal_date: None,
        special_terms: None,
    }
}

struct Seed {
    property: Address,
    landlord: User,
    tenant: User,
}

async fn seed(store: &MemoryStore) -> Seed {
    let property = AddressRepository::create(store, &address(AddressType::Property)).await.unwrap();
    let home = AddressRepository::create(store, &address(AddressType::Tenant)).await.unwrap();
    let landlord = UserRepository::create(store, &user(UserType::Admin, home.id)).await.unwrap();
    let tenant = UserRepository::create(store, &user(UserType::Tenant, home.id)).await.unwrap();
    Seed { property, landlord, tenant }
}

async fn new_contract(store: &MemoryStore, seed: &Seed, reference_ids: Vec<Uuid>) -> Result<Contract, DomainError> {
    let (contract, references) = ContractDraft {
        landlord_id: Some(seed.landlord.id),
        tenant_id: Some(seed.tenant.id),
        address_id: Some(seed.property.id),
        reference_ids,
    }
    .into_contract()?;
    store.create_with_references(&contract, &references).await
}

fn version_draft(contract_id: Uuid) -> VersionDraft {
    VersionDraft {
        contract_id,
        rent: 1000.0,
        deposit: 1000.0,
        rent_increase_percentage: 5.0,
        business: "Local comercial".into(),
        status: "active".into(),
        contract_type: "yearly".into(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        renewal_date: None,
        special_terms: None,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_version_numbers_are_gap_free() {
    let store = Arc::new(MemoryStore::new());
    let seed = seed(&store).await;
    let contract = new_contract(&store, &seed, Vec::new()).await.unwrap();
    let other = new_contract(&store, &seed, Vec::new()).await.unwrap();
    let service = Arc::new(VersionService::new(Repositories::from_gateway(store.clone())));

    let handles: Vec<_> = (0..40)
        .map(|i| {
            let service = service.clone();
            let contract_id = if i % 2 == 0 { contract.id } else { other.id };
            tokio::spawn(async move { service.create_version(version_draft(contract_id)).await })
        })
        .collect();

    for joined in futures::future::join_all(handles).await {
        joined.unwrap().unwrap();
    }

    for contract_id in [contract.id, other.id] {
        let mut numbers: Vec<i32> = service
            .list_versions(contract_id)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.version_number)
            .collect();
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=20).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn test_unknown_reference_creates_nothing() {
    let store = MemoryStore::new();
    let seed = seed(&store).await;

    let result = new_contract(&store, &seed, vec![Uuid::new_v4()]).await;

    assert!(matches!(result, Err(DomainError::DependencyError(_))));
    assert!(ContractRepository::list(&store, &ContractFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reference_replacement() {
    let store = MemoryStore::new();
    let seed = seed(&store).await;
    let contract = new_contract(&store, &seed, vec![seed.landlord.id]).await.unwrap();

    // None keeps the set
    store.update_with_references(&contract, None).await.unwrap();
    assert_eq!(store.reference_ids(&contract.id).await.unwrap(), vec![seed.landlord.id]);

    store.update_with_references(&contract, Some(Vec::new())).await.unwrap();
    assert!(store.reference_ids(&contract.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_tombstoned_rows_hidden_from_reads_but_still_resolve() {
    let store = MemoryStore::new();
    let seed = seed(&store).await;

    assert!(UserRepository::soft_delete(&store, &seed.tenant.id).await.unwrap());
    assert!(!UserRepository::soft_delete(&store, &seed.tenant.id).await.unwrap());
    assert!(UserRepository::find_by_id(&store, &seed.tenant.id).await.unwrap().is_none());

    let batch = UserRepository::find_by_ids(&store, &[seed.tenant.id]).await.unwrap();
    assert_eq!(batch.len(), 1);

    // a tombstoned tenant still satisfies the foreign key
    assert!(new_contract(&store, &seed, Vec::new()).await.is_ok());
}

#[tokio::test]
async fn test_available_filter_and_statistics() {
    let store = MemoryStore::new();
    let seed = seed(&store).await;
    let vacant = AddressRepository::create(&store, &address(AddressType::Property)).await.unwrap();

    let mut contract = new_contract(&store, &seed, Vec::new()).await.unwrap();
    let version = store
        .insert_next(&terms(contract.id, ContractStatus::Active, 1200.0))
        .await
        .unwrap();
    contract.current_version_id = Some(version.id);
    store.update_with_references(&contract, None).await.unwrap();

    let available = AddressRepository::list(
        &store,
        &AddressFilter { available: Some(true), ..Default::default() },
    )
    .await
    .unwrap();
    assert_eq!(available.iter().map(|a| a.id).collect::<Vec<_>>(), vec![vacant.id]);

    let occupied = AddressRepository::list(
        &store,
        &AddressFilter { available: Some(false), ..Default::default() },
    )
    .await
    .unwrap();
    assert_eq!(occupied.iter().map(|a| a.id).collect::<Vec<_>>(), vec![seed.property.id]);

    let snapshot = store.snapshot().await.unwrap();
    assert_eq!(snapshot.total_contracts, 1);
    assert_eq!(snapshot.active_contracts, 1);
    assert_eq!(snapshot.total_properties, 2);
    assert_eq!(snapshot.occupied_properties, 1);
    assert_eq!(snapshot.active_tenants, 1);
    assert_eq!(snapshot.monthly_revenue, 1200.0);
    assert_eq!(snapshot.average_duration_days, Some(365.0));
}

#[tokio::test]
async fn test_version_for_deleted_contract_is_not_found() {
    let store = MemoryStore::new();
    let seed = seed(&store).await;
    let contract = new_contract(&store, &seed, Vec::new()).await.unwrap();
    ContractRepository::soft_delete(&store, &contract.id).await.unwrap();

    let result = store.insert_next(&terms(contract.id, ContractStatus::Active, 900.0)).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}
