use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::athlete_handlers::PageParams;
use crate::models::{PagedData, Representative, RepresentativeId, ResponseSchema};
use crate::web::responses::AppError;
use crate::web::router::AppState;

/// GET /api/v1/representatives
pub async fn list_representatives(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<ResponseSchema<PagedData<Representative>>>, AppError> {
    let paged = state
        .representative_service()
        .list_representatives(params.page, params.limit)
        .await?;

    Ok(Json(ResponseSchema::success(
        "Representatives retrieved",
        paged,
    )))
}

/// GET /api/v1/representatives/:id
pub async fn get_representative(
    State(state): State<AppState>,
    Path(id): Path<RepresentativeId>,
) -> Result<Json<ResponseSchema<Representative>>, AppError> {
    let representative = state
        .representative_service()
        .get_representative(id)
        .await?;

    Ok(Json(ResponseSchema::success(
        "Representative retrieved",
        representative,
    )))
}
