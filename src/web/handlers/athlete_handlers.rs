use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::models::{Athlete, AthleteId, PagedData, ResponseSchema};
use crate::web::responses::AppError;
use crate::web::router::AppState;

/// Pagination query parameters shared by the listing endpoints
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/v1/athletes
pub async fn list_athletes(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<ResponseSchema<PagedData<Athlete>>>, AppError> {
    let paged = state
        .athlete_service()
        .list_athletes(params.page, params.limit)
        .await?;

    Ok(Json(ResponseSchema::success("Athletes retrieved", paged)))
}

/// GET /api/v1/athletes/:id
pub async fn get_athlete(
    State(state): State<AppState>,
    Path(id): Path<AthleteId>,
) -> Result<Json<ResponseSchema<Athlete>>, AppError> {
    let athlete = state.athlete_service().get_athlete(id).await?;

    Ok(Json(ResponseSchema::success("Athlete retrieved", athlete)))
}

/// DELETE /api/v1/athletes/:id
///
/// Soft delete; the row stays for audit history.
pub async fn deactivate_athlete(
    State(state): State<AppState>,
    Path(id): Path<AthleteId>,
) -> Result<Json<ResponseSchema<serde_json::Value>>, AppError> {
    state.athlete_service().deactivate_athlete(id).await?;

    Ok(Json(ResponseSchema::success(
        "Athlete deactivated",
        serde_json::json!({ "id": id }),
    )))
}
