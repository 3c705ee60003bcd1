//! Address handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::dto::{parse_id, AddressQuery, AddressResponse, CreateAddressRequest, UpdateAddressRequest};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create_address(
    State(state): State<AppState>,
    payload: Result<Json<CreateAddressRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AddressResponse>), ApiError> {
    let Json(payload) = payload?;
    let address = state.addresses.create(payload.into_domain()?).await?;
    Ok((StatusCode::CREATED, Json(AddressResponse::from(&address))))
}

pub async fn list_addresses(
    State(state): State<AppState>,
    Query(query): Query<AddressQuery>,
) -> Result<Json<Vec<AddressResponse>>, ApiError> {
    let addresses = state.addresses.list(query.into_filter()?).await?;
    Ok(Json(addresses.iter().map(AddressResponse::from).collect()))
}

pub async fn get_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AddressResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    let address = state.addresses.get(id).await?;
    Ok(Json(AddressResponse::from(&address)))
}

pub async fn update_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAddressRequest>, JsonRejection>,
) -> Result<Json<AddressResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    let Json(payload) = payload?;
    let address = state.addresses.update(id, payload.into_domain()?).await?;
    Ok(Json(AddressResponse::from(&address)))
}

pub async fn delete_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id("id", &id)?;
    state.addresses.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
