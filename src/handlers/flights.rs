use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::flight_seat::SeatType;
use crate::entities::{airline, airport, flight};
use crate::error::{AppError, AppResult};
use crate::repository::FlightRepository;
use crate::search::filter::{build_filters, FilterExpr};
use crate::search::formatter::{
    build_result, format_flight, FlightRecord, FormattedFlight, SearchResult,
};
use crate::search::paginate::Pagination;
use crate::search::price_range::PriceRanges;
use crate::search::query::{RawSearchParams, SearchQuery};
use crate::search::sort::sort_results;
use crate::AppState;

// ============ Flight Search ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFlightsResponse {
    pub status: bool,
    pub message: String,
    pub total_items: u64,
    pub sorted_by: String,
    pub pagination: Pagination,
    pub price_ranges: PriceRanges,
    pub data: Vec<FormattedFlight>,
    pub return_flights: Option<Vec<FormattedFlight>>,
}

/// Search flights with filtering, sorting, pagination, and per-class price
/// ranges. Passing `returnDate` turns the request into a round trip and
/// adds the matching return flights to the response.
pub async fn search_flights(
    State(state): State<AppState>,
    Query(params): Query<RawSearchParams>,
) -> AppResult<Json<SearchFlightsResponse>> {
    let query = SearchQuery::from_raw(params)?;
    let (outbound_filter, return_filter) = build_filters(&query);

    let repo = FlightRepository::new(&state.db);
    let deadline = Duration::from_secs(state.config.search_timeout_secs);

    let fan_out = async {
        tokio::try_join!(
            repo.search(&outbound_filter, query.sort, query.window),
            repo.count(&outbound_filter),
            repo.price_ranges(query.price_bounds()),
            search_return_leg(&repo, return_filter.as_ref(), &query),
        )
    };

    let (outbound, total_items, price_ranges, return_records) =
        tokio::time::timeout(deadline, fan_out)
            .await
            .map_err(|_| AppError::ServiceUnavailable("Flight search timed out".to_string()))??;

    let data = format_leg(&outbound, &query);
    let return_flights = return_records.map(|records| format_leg(&records, &query));
    let pagination = Pagination::build(query.window, total_items, data.len());

    Ok(Json(SearchFlightsResponse {
        status: true,
        message: "All flight data retrieved successfully".to_string(),
        total_items,
        sorted_by: query.sorted_by().to_string(),
        pagination,
        price_ranges,
        data,
        return_flights,
    }))
}

/// Runs the return-leg query inside the same fan-out when one was requested.
/// The return leg shares the outbound page window; its metadata does not
/// feed the pagination block.
async fn search_return_leg(
    repo: &FlightRepository<'_>,
    filter: Option<&FilterExpr>,
    query: &SearchQuery,
) -> AppResult<Option<Vec<FlightRecord>>> {
    match filter {
        Some(filter) => Ok(Some(repo.search(filter, query.sort, query.window).await?)),
        None => Ok(None),
    }
}

/// Formats one leg and applies the requested ordering to the finished page.
fn format_leg(records: &[FlightRecord], query: &SearchQuery) -> Vec<FormattedFlight> {
    let mut results: Vec<SearchResult> = records
        .iter()
        .map(|record| build_result(record, query.seat_class))
        .collect();

    if let Some(mode) = query.sort {
        sort_results(&mut results, mode);
    }

    results.into_iter().map(|result| result.formatted).collect()
}

// ============ Flight Detail ============

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDetailParams {
    pub seat_class: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FlightDetailResponse {
    pub status: bool,
    pub message: String,
    pub data: FormattedFlight,
}

/// Fetch one flight by id. `seatClass` narrows the class breakdown to a
/// single record.
pub async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<FlightDetailParams>,
) -> AppResult<Json<FlightDetailResponse>> {
    let seat_filter = match params.seat_class.as_deref().filter(|text| !text.is_empty()) {
        Some(token) => Some(SeatType::parse(token).ok_or_else(|| {
            AppError::Validation("seatClass must be one of ECONOMY, BUSINESS, FIRST".to_string())
        })?),
        None => None,
    };

    let record = FlightRepository::new(&state.db)
        .find_record(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    Ok(Json(FlightDetailResponse {
        status: true,
        message: "Flight data retrieved successfully".to_string(),
        data: format_flight(&record, seat_filter),
    }))
}

// ============ Flight Management ============

#[derive(Debug, Deserialize)]
pub struct CreateFlightRequest {
    pub plane_id: Uuid,
    pub departure_airport_id: Uuid,
    pub destination_airport_id: Uuid,
    pub transit_airport_id: Option<Uuid>,
    pub departure_date: DateTime<FixedOffset>,
    pub arrival_date: DateTime<FixedOffset>,
    pub transit_arrival_date: Option<DateTime<FixedOffset>>,
    pub transit_departure_date: Option<DateTime<FixedOffset>>,
    pub capacity: i32,
    pub price: Decimal,
    pub discount: Option<i32>,
    pub facilities: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFlightRequest {
    pub departure_airport_id: Option<Uuid>,
    pub destination_airport_id: Option<Uuid>,
    pub transit_airport_id: Option<Uuid>,
    pub departure_date: Option<DateTime<FixedOffset>>,
    pub arrival_date: Option<DateTime<FixedOffset>>,
    pub transit_arrival_date: Option<DateTime<FixedOffset>>,
    pub transit_departure_date: Option<DateTime<FixedOffset>>,
    pub capacity: Option<i32>,
    pub price: Option<Decimal>,
    pub discount: Option<i32>,
    pub facilities: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FlightMutationResponse {
    pub status: bool,
    pub message: String,
    pub data: flight::Model,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightUpdateData {
    pub before_update: flight::Model,
    pub after_update: flight::Model,
}

#[derive(Debug, Serialize)]
pub struct FlightUpdateResponse {
    pub status: bool,
    pub message: String,
    pub data: FlightUpdateData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDeleteResponse {
    pub status: bool,
    pub message: String,
    pub deleted_data: flight::Model,
}

/// Create a flight. The code is derived from the airline and departure
/// airport codes plus a per-prefix running number.
pub async fn create_flight(
    State(state): State<AppState>,
    Json(payload): Json<CreateFlightRequest>,
) -> AppResult<(StatusCode, Json<FlightMutationResponse>)> {
    let plane = airline::Entity::find_by_id(payload.plane_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid plane_id".to_string()))?;

    let departure = airport::Entity::find_by_id(payload.departure_airport_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid departure_airport_id".to_string()))?;

    ensure_airport(&state.db, payload.destination_airport_id, "destination_airport_id").await?;

    if let Some(transit_id) = payload.transit_airport_id {
        ensure_airport(&state.db, transit_id, "transit_airport_id").await?;
    }

    validate_flight(&FlightChecks::from(&payload))?;

    let prefix = format!("{}-{}", plane.code, departure.code);
    let number = FlightRepository::new(&state.db)
        .next_code_number(&prefix)
        .await?;

    let model = flight::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(format!("{}-{}", prefix, number)),
        plane_id: Set(payload.plane_id),
        departure_airport_id: Set(payload.departure_airport_id),
        destination_airport_id: Set(payload.destination_airport_id),
        transit_airport_id: Set(payload.transit_airport_id),
        departure_date: Set(payload.departure_date),
        arrival_date: Set(payload.arrival_date),
        transit_arrival_date: Set(payload.transit_arrival_date),
        transit_departure_date: Set(payload.transit_departure_date),
        capacity: Set(payload.capacity),
        price: Set(payload.price),
        discount: Set(payload.discount),
        facilities: Set(payload.facilities),
        ..Default::default()
    };

    let created = model.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(FlightMutationResponse {
            status: true,
            message: "Flight created successfully".to_string(),
            data: created,
        }),
    ))
}

/// Update a flight. The airline cannot change once the code is issued.
pub async fn update_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFlightRequest>,
) -> AppResult<Json<FlightUpdateResponse>> {
    let before = flight::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    let mut merged = before.clone();

    if let Some(airport_id) = payload.departure_airport_id {
        ensure_airport(&state.db, airport_id, "departure_airport_id").await?;
        merged.departure_airport_id = airport_id;
    }
    if let Some(airport_id) = payload.destination_airport_id {
        ensure_airport(&state.db, airport_id, "destination_airport_id").await?;
        merged.destination_airport_id = airport_id;
    }
    if let Some(airport_id) = payload.transit_airport_id {
        ensure_airport(&state.db, airport_id, "transit_airport_id").await?;
        merged.transit_airport_id = Some(airport_id);
    }
    if let Some(date) = payload.departure_date {
        merged.departure_date = date;
    }
    if let Some(date) = payload.arrival_date {
        merged.arrival_date = date;
    }
    if let Some(date) = payload.transit_arrival_date {
        merged.transit_arrival_date = Some(date);
    }
    if let Some(date) = payload.transit_departure_date {
        merged.transit_departure_date = Some(date);
    }
    if let Some(capacity) = payload.capacity {
        merged.capacity = capacity;
    }
    if let Some(price) = payload.price {
        merged.price = price;
    }
    if let Some(discount) = payload.discount {
        merged.discount = Some(discount);
    }
    if let Some(facilities) = payload.facilities {
        merged.facilities = facilities;
    }

    validate_flight(&FlightChecks::from(&merged))?;

    let mut active: flight::ActiveModel = merged.clone().into();
    active.departure_airport_id = Set(merged.departure_airport_id);
    active.destination_airport_id = Set(merged.destination_airport_id);
    active.transit_airport_id = Set(merged.transit_airport_id);
    active.departure_date = Set(merged.departure_date);
    active.arrival_date = Set(merged.arrival_date);
    active.transit_arrival_date = Set(merged.transit_arrival_date);
    active.transit_departure_date = Set(merged.transit_departure_date);
    active.capacity = Set(merged.capacity);
    active.price = Set(merged.price);
    active.discount = Set(merged.discount);
    active.facilities = Set(merged.facilities);

    let after = active.update(&state.db).await?;

    Ok(Json(FlightUpdateResponse {
        status: true,
        message: "Flight updated successfully".to_string(),
        data: FlightUpdateData {
            before_update: before,
            after_update: after,
        },
    }))
}

/// Delete a flight. Its seats go with it through the cascade.
pub async fn delete_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FlightDeleteResponse>> {
    let flight = flight::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))?;

    flight::Entity::delete_by_id(id).exec(&state.db).await?;

    Ok(Json(FlightDeleteResponse {
        status: true,
        message: "Flight deleted successfully".to_string(),
        deleted_data: flight,
    }))
}

/// FK existence checks run before any write; a missing reference is a 400,
/// not a database error.
async fn ensure_airport(db: &DatabaseConnection, id: Uuid, field: &str) -> AppResult<()> {
    airport::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Invalid {}", field)))?;
    Ok(())
}

/// The fields covered by the schedule and pricing checks.
struct FlightChecks {
    departure_date: DateTime<FixedOffset>,
    arrival_date: DateTime<FixedOffset>,
    transit_airport_id: Option<Uuid>,
    transit_arrival_date: Option<DateTime<FixedOffset>>,
    transit_departure_date: Option<DateTime<FixedOffset>>,
    capacity: i32,
    price: Decimal,
    discount: Option<i32>,
}

impl From<&CreateFlightRequest> for FlightChecks {
    fn from(payload: &CreateFlightRequest) -> Self {
        Self {
            departure_date: payload.departure_date,
            arrival_date: payload.arrival_date,
            transit_airport_id: payload.transit_airport_id,
            transit_arrival_date: payload.transit_arrival_date,
            transit_departure_date: payload.transit_departure_date,
            capacity: payload.capacity,
            price: payload.price,
            discount: payload.discount,
        }
    }
}

impl From<&flight::Model> for FlightChecks {
    fn from(flight: &flight::Model) -> Self {
        Self {
            departure_date: flight.departure_date,
            arrival_date: flight.arrival_date,
            transit_airport_id: flight.transit_airport_id,
            transit_arrival_date: flight.transit_arrival_date,
            transit_departure_date: flight.transit_departure_date,
            capacity: flight.capacity,
            price: flight.price,
            discount: flight.discount,
        }
    }
}

/// Cross-field checks shared by create and update, run after merging.
fn validate_flight(checks: &FlightChecks) -> AppResult<()> {
    if checks.arrival_date <= checks.departure_date {
        return Err(AppError::Validation(
            "arrival_date must be after departure_date".to_string(),
        ));
    }

    match (
        checks.transit_airport_id,
        checks.transit_arrival_date,
        checks.transit_departure_date,
    ) {
        (None, None, None) => {}
        (Some(_), Some(transit_arrival), Some(transit_departure)) => {
            if transit_arrival <= checks.departure_date
                || transit_departure < transit_arrival
                || checks.arrival_date <= transit_departure
            {
                return Err(AppError::Validation(
                    "transit times must fall between departure and arrival".to_string(),
                ));
            }
        }
        _ => {
            return Err(AppError::Validation(
                "transit airport and transit times must be provided together".to_string(),
            ));
        }
    }

    if checks.capacity < 0 {
        return Err(AppError::Validation(
            "capacity must not be negative".to_string(),
        ));
    }

    if checks.price <= Decimal::ZERO {
        return Err(AppError::Validation("price must be positive".to_string()));
    }

    if let Some(discount) = checks.discount {
        if !(0..=100).contains(&discount) {
            return Err(AppError::Validation(
                "discount must be between 0 and 100".to_string(),
            ));
        }
    }

    Ok(())
}
