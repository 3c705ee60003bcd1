//! Contract handlers, including current-version promotion and the lease document

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use rent_core::services::ContractService;

use crate::dto::{
    parse_id, ContractQuery, ContractResponse, CreateContractRequest, DocumentQuery,
    SetCurrentVersionRequest, UpdateContractRequest,
};
use crate::error::ApiError;

pub async fn create_contract(
    State(contracts): State<Arc<ContractService>>,
    payload: Result<Json<CreateContractRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ContractResponse>), ApiError> {
    let Json(payload) = payload?;
    let contract = contracts.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ContractResponse::from(&contract))))
}

pub async fn list_contracts(
    State(contracts): State<Arc<ContractService>>,
    Query(query): Query<ContractQuery>,
) -> Result<Json<Vec<ContractResponse>>, ApiError> {
    let filter = query.into_filter()?;
    let list = contracts.list(filter).await?;
    Ok(Json(list.iter().map(ContractResponse::from).collect()))
}

pub async fn get_contract(
    State(contracts): State<Arc<ContractService>>,
    Path(id): Path<String>,
) -> Result<Json<ContractResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    let contract = contracts.get(id).await?;
    Ok(Json(ContractResponse::from(&contract)))
}

pub async fn update_contract(
    State(contracts): State<Arc<ContractService>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateContractRequest>, JsonRejection>,
) -> Result<Json<ContractResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    let Json(payload) = payload?;
    let contract = contracts.update(id, payload.into()).await?;
    Ok(Json(ContractResponse::from(&contract)))
}

pub async fn set_current_version(
    State(contracts): State<Arc<ContractService>>,
    Path(id): Path<String>,
    payload: Result<Json<SetCurrentVersionRequest>, JsonRejection>,
) -> Result<Json<ContractResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    let Json(payload) = payload?;
    let contract = contracts.set_current_version(id, payload.version_id).await?;
    Ok(Json(ContractResponse::from(&contract)))
}

pub async fn delete_contract(
    State(contracts): State<Arc<ContractService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id("id", &id)?;
    contracts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /contracts/{id}/document`: the lease as `application/pdf`
pub async fn contract_document(
    State(contracts): State<Arc<ContractService>>,
    Path(id): Path<String>,
    Query(query): Query<DocumentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id("id", &id)?;
    let version_id = query.version_id()?;
    let bytes = contracts.render_document(id, version_id).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"contrato-{}.pdf\"", id),
        ),
    ];
    Ok((headers, bytes))
}
