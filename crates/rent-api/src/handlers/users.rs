//! User handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::dto::{parse_id, CreateUserRequest, UpdateUserRequest, UserQuery, UserResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(payload) = payload?;
    let user = state.users.create(payload.into_domain()?).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.list(query.into_filter()?).await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    let user = state.users.get(id).await?;
    Ok(Json(UserResponse::from(&user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    let Json(payload) = payload?;
    let user = state.users.update(id, payload.into_domain()?).await?;
    Ok(Json(UserResponse::from(&user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id("id", &id)?;
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
