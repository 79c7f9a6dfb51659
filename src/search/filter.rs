use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

use crate::entities::flight_seat::SeatType;
use crate::utils::time::{day_after, day_start};

use super::query::SearchQuery;

/// Storage-agnostic filter expression. Built here from validated query
/// parameters, lowered to SQL by the repository adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    Equals {
        field: FilterField,
        value: FilterValue,
        case_insensitive: bool,
    },
    Contains {
        field: FilterField,
        value: String,
        case_insensitive: bool,
    },
    Range {
        field: FilterField,
        min: Option<RangeBound>,
        max: Option<RangeBound>,
    },
    And(Vec<FilterExpr>),
    Or(Vec<FilterExpr>),
    Not(Box<FilterExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    DepartureAirportCode,
    DepartureAirportCity,
    DestinationAirportCode,
    DestinationAirportCity,
    AirlineName,
    AirlineCode,
    DepartureDate,
    Price,
    Capacity,
    Discount,
    TransitAirport,
    Facilities,
    AvailableSeat,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Null,
    Text(String),
    Int(i32),
    Price(Decimal),
    Time(DateTime<FixedOffset>),
    Seat(SeatType),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeBound {
    pub value: FilterValue,
    pub inclusive: bool,
}

impl RangeBound {
    pub fn inclusive(value: FilterValue) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub fn exclusive(value: FilterValue) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

/// Which directional portion of the trip a filter targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegRole {
    Outbound,
    Return,
}

/// The outbound filter, plus the mirrored return filter when a return date
/// was supplied.
pub fn build_filters(query: &SearchQuery) -> (FilterExpr, Option<FilterExpr>) {
    let outbound = build_leg_filter(query, LegRole::Outbound);
    let return_leg = query
        .return_date
        .map(|_| build_leg_filter(query, LegRole::Return));
    (outbound, return_leg)
}

/// Conjunction of every supplied criterion for one leg. The return leg keeps
/// all non-airport constraints and swaps the airport roles, with its day
/// window taken from the return date.
pub fn build_leg_filter(query: &SearchQuery, role: LegRole) -> FilterExpr {
    let mut clauses = Vec::new();

    let (origin, destination) = match role {
        LegRole::Outbound => (&query.departure_airport, &query.arrival_airport),
        LegRole::Return => (&query.arrival_airport, &query.departure_airport),
    };

    if let Some(token) = origin {
        clauses.push(airport_matches(
            FilterField::DepartureAirportCode,
            FilterField::DepartureAirportCity,
            token,
        ));
    }
    if let Some(token) = destination {
        clauses.push(airport_matches(
            FilterField::DestinationAirportCode,
            FilterField::DestinationAirportCity,
            token,
        ));
    }

    let travel_date = match role {
        LegRole::Outbound => query.departure_date,
        LegRole::Return => query.return_date,
    };
    if let Some(date) = travel_date {
        clauses.push(FilterExpr::Range {
            field: FilterField::DepartureDate,
            min: Some(RangeBound::inclusive(FilterValue::Time(day_start(date)))),
            max: Some(RangeBound::exclusive(FilterValue::Time(day_after(date)))),
        });
    }

    if !query.airline_tokens.is_empty() {
        clauses.push(FilterExpr::Or(
            query
                .airline_tokens
                .iter()
                .map(|token| airline_matches(token))
                .collect(),
        ));
    }

    if let Some(seat_class) = query.seat_class {
        clauses.push(FilterExpr::Equals {
            field: FilterField::AvailableSeat,
            value: FilterValue::Seat(seat_class),
            case_insensitive: false,
        });
    }

    match query.has_transit {
        Some(true) => clauses.push(FilterExpr::Not(Box::new(null_check(
            FilterField::TransitAirport,
        )))),
        Some(false) => clauses.push(null_check(FilterField::TransitAirport)),
        None => {}
    }

    match query.has_discount {
        Some(true) => clauses.push(FilterExpr::Not(Box::new(null_check(FilterField::Discount)))),
        Some(false) => clauses.push(null_check(FilterField::Discount)),
        None => {}
    }

    if query.min_price.is_some() || query.max_price.is_some() {
        clauses.push(FilterExpr::Range {
            field: FilterField::Price,
            min: query
                .min_price
                .map(|price| RangeBound::inclusive(FilterValue::Price(price))),
            max: query
                .max_price
                .map(|price| RangeBound::inclusive(FilterValue::Price(price))),
        });
    }

    // Every facility token must be contained, case-sensitively.
    for facility in &query.facility_tokens {
        clauses.push(FilterExpr::Contains {
            field: FilterField::Facilities,
            value: facility.clone(),
            case_insensitive: false,
        });
    }

    clauses.push(FilterExpr::Range {
        field: FilterField::Capacity,
        min: Some(RangeBound::inclusive(FilterValue::Int(query.passengers))),
        max: None,
    });

    FilterExpr::And(clauses)
}

/// Airport inputs match the code exactly (ignoring case) or the city as a
/// case-insensitive substring.
fn airport_matches(code_field: FilterField, city_field: FilterField, token: &str) -> FilterExpr {
    FilterExpr::Or(vec![
        FilterExpr::Equals {
            field: code_field,
            value: FilterValue::Text(token.to_string()),
            case_insensitive: true,
        },
        FilterExpr::Contains {
            field: city_field,
            value: token.to_string(),
            case_insensitive: true,
        },
    ])
}

/// Airline tokens match the carrier name as a substring or its code exactly.
fn airline_matches(token: &str) -> FilterExpr {
    FilterExpr::Or(vec![
        FilterExpr::Contains {
            field: FilterField::AirlineName,
            value: token.to_string(),
            case_insensitive: true,
        },
        FilterExpr::Equals {
            field: FilterField::AirlineCode,
            value: FilterValue::Text(token.to_string()),
            case_insensitive: true,
        },
    ])
}

fn null_check(field: FilterField) -> FilterExpr {
    FilterExpr::Equals {
        field,
        value: FilterValue::Null,
        case_insensitive: false,
    }
}
