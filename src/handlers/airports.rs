use axum::{
    extract::{Path, Query, State},
    Json,
};
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::airport;
use crate::error::{AppError, AppResult};
use crate::handlers::airlines::ListParams;
use crate::search::paginate::Pagination;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct AirportListResponse {
    pub status: bool,
    pub message: String,
    pub data: Vec<airport::Model>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct AirportResponse {
    pub status: bool,
    pub message: String,
    pub data: airport::Model,
}

/// List airports, paginated. The rows come from the seed migration and are
/// read-only at runtime.
pub async fn list_airports(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<AirportListResponse>> {
    let window = params.window()?;

    let total_items = airport::Entity::find().count(&state.db).await?;
    let airports = airport::Entity::find()
        .order_by_asc(airport::Column::Code)
        .offset(window.offset())
        .limit(window.limit)
        .all(&state.db)
        .await?;

    let pagination = Pagination::build(window, total_items, airports.len());

    Ok(Json(AirportListResponse {
        status: true,
        message: "All airport data retrieved successfully".to_string(),
        data: airports,
        pagination,
    }))
}

/// Fetch one airport by id.
pub async fn get_airport(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AirportResponse>> {
    let found = airport::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Airport not found".to_string()))?;

    Ok(Json(AirportResponse {
        status: true,
        message: "Airport data retrieved successfully".to_string(),
        data: found,
    }))
}
