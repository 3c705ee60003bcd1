//! End-to-end router tests against the in-memory gateway

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use rent_api::{build_router, AppState};
use rent_core::repositories::Repositories;
use rent_infrastructure::MemoryStore;

fn app() -> Router {
    let repos = Repositories::from_gateway(Arc::new(MemoryStore::new()));
    build_router(AppState::new(repos))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

async fn create_address(app: &Router, address_type: &str) -> String {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/v1/addresses",
        Some(json!({
            "type": address_type,
            "street": "Av. Juárez",
            "number": "120",
            "neighborhood": "Centro",
            "city": "Guadalajara",
            "state": "Jalisco",
            "zipCode": "44100",
            "country": "México"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    id_of(&body)
}

async fn create_user(app: &Router, user_type: &str, first_name: &str, address_id: &str) -> String {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/v1/users",
        Some(json!({
            "type": user_type,
            "addressId": address_id,
            "firstName": first_name,
            "lastName": "García",
            "email": format!("user.{}@example.com", uuid::Uuid::new_v4().simple()),
            "phone": "33 1234 5678"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    id_of(&body)
}

struct Fixture {
    property: String,
    landlord: String,
    tenant: String,
    reference: String,
}

async fn parties(app: &Router) -> Fixture {
    let property = create_address(app, "property").await;
    let landlord_home = create_address(app, "tenant").await;
    let tenant_home = create_address(app, "tenant").await;
    let reference_home = create_address(app, "reference").await;

    Fixture {
        landlord: create_user(app, "admin", "Laura", &landlord_home).await,
        tenant: create_user(app, "tenant", "Tomás", &tenant_home).await,
        reference: create_user(app, "reference", "Rosa", &reference_home).await,
        property,
    }
}

async fn create_contract(app: &Router, fixture: &Fixture, tenant: &str) -> Value {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/v1/contracts",
        Some(json!({
            "landlordId": fixture.landlord,
            "tenantId": tenant,
            "addressId": fixture.property,
            "referenceIds": [fixture.reference]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

fn version_body(contract_id: &str) -> Value {
    json!({
        "contractId": contract_id,
        "rent": 1000.0,
        "deposit": 1000.0,
        "rentIncreasePercentage": 10.0,
        "business": "Casa habitación",
        "status": "active",
        "type": "yearly",
        "startDate": "2024-01-01",
        "endDate": "2024-12-31"
    })
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle.as_bytes())
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app();
    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send_json(&app, Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_document_for_promoted_version() {
    let app = app();
    let fixture = parties(&app).await;
    let contract = create_contract(&app, &fixture, &fixture.tenant).await;
    let contract_id = id_of(&contract);
    assert!(contract["currentVersionId"].is_null());

    let (status, version) = send_json(
        &app,
        Method::POST,
        "/api/v1/contracts/versions",
        Some(version_body(&contract_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", version);
    assert_eq!(version["versionNumber"], 1);
    let version_id = id_of(&version);

    // Creating a version does not promote it
    let (_, fetched) = send_json(&app, Method::GET, &format!("/api/v1/contracts/{}", contract_id), None).await;
    assert!(fetched["currentVersionId"].is_null());

    let (status, promoted) = send_json(
        &app,
        Method::PUT,
        &format!("/api/v1/contracts/{}/current-version", contract_id),
        Some(json!({ "versionId": version_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", promoted);
    assert_eq!(promoted["currentVersionId"], version_id.as_str());
    assert_eq!(promoted["currentVersion"]["rent"], 1000.0);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/contracts/{}/document", contract_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let pdf = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    assert!(contains(&pdf, "1000.00"));
    assert!(contains(&pdf, "1 de enero de 2024"));
}

#[tokio::test]
async fn test_document_without_versions_is_conflict() {
    let app = app();
    let fixture = parties(&app).await;
    let contract_id = id_of(&create_contract(&app, &fixture, &fixture.tenant).await);

    let (status, body) = send_json(
        &app,
        Method::GET,
        &format!("/api/v1/contracts/{}/document", contract_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_empty_reference_list_clears_references() {
    let app = app();
    let fixture = parties(&app).await;
    let contract = create_contract(&app, &fixture, &fixture.tenant).await;
    let contract_id = id_of(&contract);
    assert_eq!(contract["references"].as_array().map_or(0, Vec::len), 1);

    let (status, updated) = send_json(
        &app,
        Method::PUT,
        &format!("/api/v1/contracts/{}", contract_id),
        Some(json!({ "referenceIds": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["references"].as_array().map_or(0, Vec::len), 0);
    assert_eq!(updated["landlordId"], contract["landlordId"]);
    assert_eq!(updated["tenantId"], contract["tenantId"]);
    assert_eq!(updated["addressId"], contract["addressId"]);
    assert_eq!(updated["currentVersionId"], contract["currentVersionId"]);
}

#[tokio::test]
async fn test_list_contracts_by_tenant() {
    let app = app();
    let fixture = parties(&app).await;
    let other_home = create_address(&app, "tenant").await;
    let other_tenant = create_user(&app, "tenant", "Olga", &other_home).await;

    let mine = id_of(&create_contract(&app, &fixture, &fixture.tenant).await);
    create_contract(&app, &fixture, &other_tenant).await;

    let (status, version) = send_json(
        &app,
        Method::POST,
        "/api/v1/contracts/versions",
        Some(version_body(&mine)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    send_json(
        &app,
        Method::PUT,
        &format!("/api/v1/contracts/{}/current-version", mine),
        Some(json!({ "versionId": id_of(&version) })),
    )
    .await;

    let (status, list) = send_json(
        &app,
        Method::GET,
        &format!("/api/v1/contracts?tenantId={}", fixture.tenant),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], mine.as_str());
    assert_eq!(list[0]["tenantId"], fixture.tenant.as_str());
    assert_eq!(list[0]["currentVersion"]["versionNumber"], 1);
    assert_eq!(list[0]["tenant"]["firstName"], "Tomás");
    assert!(list[0]["tenant"]["address"].is_object());
    assert_eq!(list[0]["landlord"]["id"], fixture.landlord.as_str());
}

#[tokio::test]
async fn test_versions_are_numbered_and_listed_newest_first() {
    let app = app();
    let fixture = parties(&app).await;
    let contract_id = id_of(&create_contract(&app, &fixture, &fixture.tenant).await);

    for _ in 0..3 {
        let (status, _) = send_json(
            &app,
            Method::POST,
            "/api/v1/contracts/versions",
            Some(version_body(&contract_id)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, list) = send_json(
        &app,
        Method::GET,
        &format!("/api/v1/contracts/{}/versions", contract_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let numbers: Vec<i64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["versionNumber"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![3, 2, 1]);

    let first_id = list[2]["id"].as_str().unwrap();
    let (status, single) = send_json(
        &app,
        Method::GET,
        &format!("/api/v1/contracts/versions/{}", first_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single["versionNumber"], 1);
    assert_eq!(single["startDate"], "2024-01-01");
}

#[tokio::test]
async fn test_version_of_another_contract_cannot_be_promoted() {
    let app = app();
    let fixture = parties(&app).await;
    let first = id_of(&create_contract(&app, &fixture, &fixture.tenant).await);
    let second = id_of(&create_contract(&app, &fixture, &fixture.tenant).await);

    let (_, version) = send_json(
        &app,
        Method::POST,
        "/api/v1/contracts/versions",
        Some(version_body(&second)),
    )
    .await;

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &format!("/api/v1/contracts/{}/current-version", first),
        Some(json!({ "versionId": id_of(&version) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_soft_deleted_contract_is_hidden() {
    let app = app();
    let fixture = parties(&app).await;
    let contract_id = id_of(&create_contract(&app, &fixture, &fixture.tenant).await);
    let uri = format!("/api/v1/contracts/{}", contract_id);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send_json(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send_json(&app, Method::GET, "/api/v1/contracts", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_deleted_tenant_still_hydrates_existing_contract() {
    let app = app();
    let fixture = parties(&app).await;
    let contract_id = id_of(&create_contract(&app, &fixture, &fixture.tenant).await);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/users/{}", fixture.tenant), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send_json(&app, Method::GET, &format!("/api/v1/users/{}", fixture.tenant), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, contract) = send_json(&app, Method::GET, &format!("/api/v1/contracts/{}", contract_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(contract["tenant"]["id"], fixture.tenant.as_str());
}

#[tokio::test]
async fn test_address_merge_patch_keeps_absent_fields() {
    let app = app();
    let id = create_address(&app, "property").await;
    let uri = format!("/api/v1/addresses/{}", id);
    let (_, before) = send_json(&app, Method::GET, &uri, None).await;

    let (status, after) = send_json(&app, Method::PUT, &uri, Some(json!({ "city": "Zapopan" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["city"], "Zapopan");
    for field in ["type", "street", "number", "neighborhood", "state", "zipCode", "country", "createdAt"] {
        assert_eq!(after[field], before[field], "{} changed", field);
    }
}

#[tokio::test]
async fn test_available_addresses() {
    let app = app();
    let fixture = parties(&app).await;
    let free = create_address(&app, "property").await;
    let contract_id = id_of(&create_contract(&app, &fixture, &fixture.tenant).await);

    let (_, version) = send_json(
        &app,
        Method::POST,
        "/api/v1/contracts/versions",
        Some(version_body(&contract_id)),
    )
    .await;
    send_json(
        &app,
        Method::PUT,
        &format!("/api/v1/contracts/{}/current-version", contract_id),
        Some(json!({ "versionId": id_of(&version) })),
    )
    .await;

    let (status, list) = send_json(&app, Method::GET, "/api/v1/addresses?available=true", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![free.as_str()]);

    let (_, stats) = send_json(&app, Method::GET, "/api/v1/statistics/overall", None).await;
    assert_eq!(stats["totalContracts"], 1);
    assert_eq!(stats["occupiedProperties"], 1);
    assert_eq!(stats["totalProperties"], 2);
    assert_eq!(stats["monthlyRevenue"], 1000.0);
}

#[tokio::test]
async fn test_malformed_input_is_bad_request() {
    let app = app();

    let (status, body) = send_json(&app, Method::GET, "/api/v1/contracts/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, _) = send_json(&app, Method::GET, "/api/v1/contracts?tenantId=xyz", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/addresses")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_contract_with_unknown_party_is_dependency_error() {
    let app = app();
    let fixture = parties(&app).await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/contracts",
        Some(json!({
            "landlordId": fixture.landlord,
            "tenantId": uuid::Uuid::new_v4(),
            "addressId": fixture.property
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "DEPENDENCY_ERROR");
}
