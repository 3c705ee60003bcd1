//! Contract version handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use rent_core::services::VersionService;

use crate::dto::{parse_id, CreateVersionRequest, VersionResponse};
use crate::error::ApiError;

pub async fn create_version(
    State(versions): State<Arc<VersionService>>,
    payload: Result<Json<CreateVersionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VersionResponse>), ApiError> {
    let Json(payload) = payload?;
    let version = versions.create_version(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(VersionResponse::from(&version))))
}

pub async fn get_version(
    State(versions): State<Arc<VersionService>>,
    Path(id): Path<String>,
) -> Result<Json<VersionResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    let version = versions.get_version(id).await?;
    Ok(Json(VersionResponse::from(&version)))
}

/// Newest first
pub async fn list_versions(
    State(versions): State<Arc<VersionService>>,
    Path(contract_id): Path<String>,
) -> Result<Json<Vec<VersionResponse>>, ApiError> {
    let contract_id = parse_id("id", &contract_id)?;
    let list = versions.list_versions(contract_id).await?;
    Ok(Json(list.iter().map(VersionResponse::from).collect()))
}
