use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{airline, flight};
use crate::error::{AppError, AppResult};
use crate::search::paginate::{PageWindow, Pagination};
use crate::AppState;

/// Fallback logo for airlines created without one.
const DEFAULT_AIRLINE_IMAGE: &str = "https://placehold.co/600x400";

/// Raw `page`/`limit` values shared by the paginated listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    pub fn window(&self) -> AppResult<PageWindow> {
        PageWindow::from_raw(
            self.page.as_deref().filter(|text| !text.is_empty()),
            self.limit.as_deref().filter(|text| !text.is_empty()),
        )
    }
}

// ============ Airline Listing ============

#[derive(Debug, Serialize)]
pub struct AirlineListResponse {
    pub status: bool,
    pub message: String,
    pub data: Vec<airline::Model>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct AirlineResponse {
    pub status: bool,
    pub message: String,
    pub data: airline::Model,
}

/// List airlines, paginated.
pub async fn list_airlines(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<AirlineListResponse>> {
    let window = params.window()?;

    let total_items = airline::Entity::find().count(&state.db).await?;
    let airlines = airline::Entity::find()
        .order_by_asc(airline::Column::Name)
        .offset(window.offset())
        .limit(window.limit)
        .all(&state.db)
        .await?;

    let pagination = Pagination::build(window, total_items, airlines.len());

    Ok(Json(AirlineListResponse {
        status: true,
        message: "all Airline data retrieved successfully".to_string(),
        data: airlines,
        pagination,
    }))
}

/// Fetch one airline by id.
pub async fn get_airline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AirlineResponse>> {
    let found = airline::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Airline not found".to_string()))?;

    Ok(Json(AirlineResponse {
        status: true,
        message: "Airline data retrieved successfully".to_string(),
        data: found,
    }))
}

// ============ Airline Management ============

#[derive(Debug, Deserialize)]
pub struct CreateAirlineRequest {
    pub name: String,
    pub code: String,
    pub image: Option<String>,
    pub terminal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAirlineRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub image: Option<String>,
    pub terminal: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AirlineDeleteResponse {
    pub status: bool,
    pub message: String,
}

/// Create an airline. Codes are normalized to upper-case.
pub async fn create_airline(
    State(state): State<AppState>,
    Json(payload): Json<CreateAirlineRequest>,
) -> AppResult<(StatusCode, Json<AirlineResponse>)> {
    let code = payload.code.trim().to_uppercase();
    if code.is_empty() || payload.name.trim().is_empty() {
        return Err(AppError::Validation(
            "name and code must not be empty".to_string(),
        ));
    }

    ensure_code_free(&state, &code, None).await?;

    let model = airline::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        code: Set(code),
        image: Set(payload
            .image
            .unwrap_or_else(|| DEFAULT_AIRLINE_IMAGE.to_string())),
        terminal: Set(payload.terminal),
    };

    let created = model.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(AirlineResponse {
            status: true,
            message: "Airline created successfully".to_string(),
            data: created,
        }),
    ))
}

/// Update an airline.
pub async fn update_airline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAirlineRequest>,
) -> AppResult<Json<AirlineResponse>> {
    let found = airline::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Airline not found".to_string()))?;

    let mut active: airline::ActiveModel = found.into();

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }
        active.name = Set(name);
    }
    if let Some(code) = payload.code {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(AppError::Validation("code must not be empty".to_string()));
        }
        ensure_code_free(&state, &code, Some(id)).await?;
        active.code = Set(code);
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    if let Some(terminal) = payload.terminal {
        active.terminal = Set(Some(terminal));
    }

    let updated = active.update(&state.db).await?;

    Ok(Json(AirlineResponse {
        status: true,
        message: "Airline updated successfully".to_string(),
        data: updated,
    }))
}

/// Delete an airline. Refused while flights still reference it.
pub async fn delete_airline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AirlineDeleteResponse>> {
    airline::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Airline not found".to_string()))?;

    let in_use = flight::Entity::find()
        .filter(flight::Column::PlaneId.eq(id))
        .count(&state.db)
        .await?;
    if in_use > 0 {
        return Err(AppError::Conflict(
            "Airline still has scheduled flights".to_string(),
        ));
    }

    airline::Entity::delete_by_id(id).exec(&state.db).await?;

    Ok(Json(AirlineDeleteResponse {
        status: true,
        message: "Airline deleted successfully".to_string(),
    }))
}

/// Airline codes are unique. A clash is reported as a conflict, not a
/// database error.
async fn ensure_code_free(state: &AppState, code: &str, own_id: Option<Uuid>) -> AppResult<()> {
    let mut select = airline::Entity::find().filter(airline::Column::Code.eq(code));
    if let Some(id) = own_id {
        select = select.filter(airline::Column::Id.ne(id));
    }

    if select.one(&state.db).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Airline code {} is already in use",
            code
        )));
    }
    Ok(())
}
