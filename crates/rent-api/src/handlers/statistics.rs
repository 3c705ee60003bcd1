use axum::{extract::State, Json};

use rent_core::domain::OverallStatistics;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn overall_statistics(
    State(state): State<AppState>,
) -> Result<Json<OverallStatistics>, ApiError> {
    Ok(Json(state.statistics.overall().await?))
}
