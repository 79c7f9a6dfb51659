use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{airlines, airports, flights};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Flight search and management
    let flight_routes = Router::new()
        .route("/", get(flights::search_flights))
        .route("/", post(flights::create_flight))
        .route("/{id}", get(flights::get_flight))
        .route("/{id}", put(flights::update_flight))
        .route("/{id}", delete(flights::delete_flight));

    // Airline reference and management
    let airline_routes = Router::new()
        .route("/", get(airlines::list_airlines))
        .route("/", post(airlines::create_airline))
        .route("/{id}", get(airlines::get_airline))
        .route("/{id}", put(airlines::update_airline))
        .route("/{id}", delete(airlines::delete_airline));

    // Airport reference data, read-only
    let airport_routes = Router::new()
        .route("/", get(airports::list_airports))
        .route("/{id}", get(airports::get_airport));

    Router::new()
        .nest("/api/flights", flight_routes)
        .nest("/api/airlines", airline_routes)
        .nest("/api/airports", airport_routes)
        .with_state(state)
}
