use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::entities::flight_seat::SeatType;
use crate::entities::{airline, airport, flight, flight_seat};
use crate::utils::format::{format_date, format_time};

use super::duration::flight_duration;

/// One flight with every joined row the presentation layer needs.
#[derive(Debug, Clone)]
pub struct FlightRecord {
    pub flight: flight::Model,
    pub plane: airline::Model,
    pub departure_airport: airport::Model,
    pub destination_airport: airport::Model,
    pub transit_airport: Option<airport::Model>,
    pub seats: Vec<flight_seat::Model>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportSummary {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub country: String,
    pub city: String,
    pub continent: String,
    pub image: String,
}

impl From<&airport::Model> for AirportSummary {
    fn from(model: &airport::Model) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            code: model.code.clone(),
            country: model.country.clone(),
            city: model.city.clone(),
            continent: model.continent.clone(),
            image: model.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaneSummary {
    pub name: String,
    pub code: String,
    pub image: String,
    pub terminal: Option<String>,
}

impl From<&airline::Model> for PlaneSummary {
    fn from(model: &airline::Model) -> Self {
        Self {
            name: model.name.clone(),
            code: model.code.clone(),
            image: model.image.clone(),
            terminal: model.terminal.clone(),
        }
    }
}

/// Transit leg of a flight, discriminated by the `present` wire field.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitBlock {
    None,
    Stop {
        arrival_date: String,
        arrival_time: String,
        departure_date: String,
        departure_time: String,
        airport: AirportSummary,
    },
}

impl Serialize for TransitBlock {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TransitBlock::None => {
                let mut state = serializer.serialize_struct("TransitBlock", 1)?;
                state.serialize_field("present", &false)?;
                state.end()
            }
            TransitBlock::Stop {
                arrival_date,
                arrival_time,
                departure_date,
                departure_time,
                airport,
            } => {
                let mut state = serializer.serialize_struct("TransitBlock", 6)?;
                state.serialize_field("present", &true)?;
                state.serialize_field("arrivalDate", arrival_date)?;
                state.serialize_field("arrivalTime", arrival_time)?;
                state.serialize_field("departureDate", departure_date)?;
                state.serialize_field("departureTime", departure_time)?;
                state.serialize_field("transitAirport", airport)?;
                state.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatClassInfo {
    pub seat_class: SeatType,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub seat_price: Option<Decimal>,
}

/// Seat-class projection: a single record when a class filter is active,
/// otherwise one entry per class in a fixed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ClassInfo {
    Single(SeatClassInfo),
    All(Vec<SeatClassInfo>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedFlight {
    pub id: Uuid,
    pub plane_id: Uuid,
    pub plane: PlaneSummary,
    pub departure_date: String,
    pub departure_time: String,
    pub code: String,
    pub departure_airport: AirportSummary,
    pub transit: TransitBlock,
    pub arrival_date: String,
    pub arrival_time: String,
    pub destination_airport: AirportSummary,
    pub capacity: i32,
    pub discount: Option<i32>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub facilities: String,
    pub duration: String,
    pub class_info: ClassInfo,
}

/// A formatted flight plus the raw keys the sorter compares on. Ordering
/// never re-parses presentation strings.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub formatted: FormattedFlight,
    pub departure: DateTime<FixedOffset>,
    pub arrival: DateTime<FixedOffset>,
    pub price: Decimal,
    pub duration_minutes: i64,
}

/// Maps one joined flight row to the client-facing shape. The same mapping
/// serves outbound results, return results, and the detail endpoint.
pub fn format_flight(record: &FlightRecord, seat_filter: Option<SeatType>) -> FormattedFlight {
    let flight = &record.flight;

    FormattedFlight {
        id: flight.id,
        plane_id: flight.plane_id,
        plane: PlaneSummary::from(&record.plane),
        departure_date: format_date(flight.departure_date),
        departure_time: format_time(flight.departure_date),
        code: flight.code.clone(),
        departure_airport: AirportSummary::from(&record.departure_airport),
        transit: transit_block(record),
        arrival_date: format_date(flight.arrival_date),
        arrival_time: format_time(flight.arrival_date),
        destination_airport: AirportSummary::from(&record.destination_airport),
        capacity: flight.capacity,
        discount: flight.discount,
        price: flight.price,
        facilities: flight.facilities.clone(),
        duration: flight_duration(flight.departure_date, flight.arrival_date).text,
        class_info: class_info(&record.seats, seat_filter),
    }
}

pub fn build_result(record: &FlightRecord, seat_filter: Option<SeatType>) -> SearchResult {
    let flight = &record.flight;

    SearchResult {
        departure: flight.departure_date,
        arrival: flight.arrival_date,
        price: flight.price,
        duration_minutes: flight_duration(flight.departure_date, flight.arrival_date).minutes,
        formatted: format_flight(record, seat_filter),
    }
}

// Transit fields are written all-or-none; a partial pair renders as no transit.
fn transit_block(record: &FlightRecord) -> TransitBlock {
    let stop = record.transit_airport.as_ref().zip(
        record
            .flight
            .transit_arrival_date
            .zip(record.flight.transit_departure_date),
    );

    match stop {
        Some((airport, (arrival, departure))) => TransitBlock::Stop {
            arrival_date: format_date(arrival),
            arrival_time: format_time(arrival),
            departure_date: format_date(departure),
            departure_time: format_time(departure),
            airport: AirportSummary::from(airport),
        },
        None => TransitBlock::None,
    }
}

fn class_info(seats: &[flight_seat::Model], seat_filter: Option<SeatType>) -> ClassInfo {
    match seat_filter {
        Some(wanted) => ClassInfo::Single(seat_entry(seats, wanted)),
        None => ClassInfo::All(
            [SeatType::Economy, SeatType::Business, SeatType::First]
                .into_iter()
                .map(|class| seat_entry(seats, class))
                .collect(),
        ),
    }
}

fn seat_entry(seats: &[flight_seat::Model], class: SeatType) -> SeatClassInfo {
    let seat = seats.iter().find(|seat| seat.seat_type == class);
    SeatClassInfo {
        seat_class: class,
        seat_price: seat.map(|seat| seat.price),
    }
}
