use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Func, IntoColumnRef, IntoCondition, Query, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityName, Value};

use crate::entities::flight_seat::{SeatStatus, SeatType};
use crate::entities::{airline, airport, flight, flight_seat};
use crate::error::{AppError, AppResult};
use crate::search::filter::{FilterExpr, FilterField, FilterValue, RangeBound};

/// Lowers a filter expression to a sea-orm condition over the flight table.
/// Joined reference tables are matched through correlated EXISTS lookups;
/// the outer query stays single-table and paginates cleanly.
pub fn to_condition(expr: &FilterExpr) -> AppResult<Condition> {
    match expr {
        FilterExpr::And(children) => {
            let mut condition = Condition::all();
            for child in children {
                condition = condition.add(to_condition(child)?);
            }
            Ok(condition)
        }
        FilterExpr::Or(children) => {
            let mut condition = Condition::any();
            for child in children {
                condition = condition.add(to_condition(child)?);
            }
            Ok(condition)
        }
        FilterExpr::Not(inner) => Ok(to_condition(inner)?.not()),
        FilterExpr::Equals {
            field,
            value,
            case_insensitive,
        } => lower_equals(*field, value, *case_insensitive),
        FilterExpr::Contains {
            field,
            value,
            case_insensitive,
        } => lower_contains(*field, value, *case_insensitive),
        FilterExpr::Range { field, min, max } => lower_range(*field, min.as_ref(), max.as_ref()),
    }
}

fn lower_equals(
    field: FilterField,
    value: &FilterValue,
    case_insensitive: bool,
) -> AppResult<Condition> {
    let condition = match (field, value) {
        (FilterField::TransitAirport, FilterValue::Null) => {
            flight::Column::TransitAirportId.is_null().into_condition()
        }
        (FilterField::Discount, FilterValue::Null) => {
            flight::Column::Discount.is_null().into_condition()
        }
        (FilterField::AvailableSeat, FilterValue::Seat(seat_type)) => {
            available_seat(*seat_type).into_condition()
        }
        (FilterField::DepartureAirportCode, FilterValue::Text(code)) if case_insensitive => {
            airport_exists(flight::Column::DepartureAirportId, airport_code_equals(code))
                .into_condition()
        }
        (FilterField::DestinationAirportCode, FilterValue::Text(code)) if case_insensitive => {
            airport_exists(flight::Column::DestinationAirportId, airport_code_equals(code))
                .into_condition()
        }
        (FilterField::AirlineCode, FilterValue::Text(code)) if case_insensitive => airline_exists(
            upper_equals((airline::Entity, airline::Column::Code), code),
        )
        .into_condition(),
        _ => return Err(shape_error(field)),
    };
    Ok(condition)
}

fn lower_contains(field: FilterField, value: &str, case_insensitive: bool) -> AppResult<Condition> {
    let condition = match field {
        FilterField::DepartureAirportCity if case_insensitive => {
            airport_exists(flight::Column::DepartureAirportId, airport_city_contains(value))
                .into_condition()
        }
        FilterField::DestinationAirportCity if case_insensitive => {
            airport_exists(flight::Column::DestinationAirportId, airport_city_contains(value))
                .into_condition()
        }
        FilterField::AirlineName if case_insensitive => airline_exists(
            Expr::col((airline::Entity, airline::Column::Name)).ilike(like_pattern(value)),
        )
        .into_condition(),
        FilterField::Facilities if !case_insensitive => {
            Expr::col((flight::Entity, flight::Column::Facilities))
                .like(like_pattern(value))
                .into_condition()
        }
        _ => return Err(shape_error(field)),
    };
    Ok(condition)
}

fn lower_range(
    field: FilterField,
    min: Option<&RangeBound>,
    max: Option<&RangeBound>,
) -> AppResult<Condition> {
    let column = match field {
        FilterField::DepartureDate => flight::Column::DepartureDate,
        FilterField::Price => flight::Column::Price,
        FilterField::Capacity => flight::Column::Capacity,
        _ => return Err(shape_error(field)),
    };

    let mut condition = Condition::all();
    if let Some(bound) = min {
        let value = bound_value(&bound.value)?;
        condition = condition.add(if bound.inclusive {
            column.gte(value)
        } else {
            column.gt(value)
        });
    }
    if let Some(bound) = max {
        let value = bound_value(&bound.value)?;
        condition = condition.add(if bound.inclusive {
            column.lte(value)
        } else {
            column.lt(value)
        });
    }
    Ok(condition)
}

fn bound_value(value: &FilterValue) -> AppResult<Value> {
    match value {
        FilterValue::Int(v) => Ok((*v).into()),
        FilterValue::Price(v) => Ok((*v).into()),
        FilterValue::Time(v) => Ok((*v).into()),
        FilterValue::Null | FilterValue::Text(_) | FilterValue::Seat(_) => Err(
            AppError::Internal("Range bounds must be numeric or temporal".to_string()),
        ),
    }
}

fn shape_error(field: FilterField) -> AppError {
    AppError::Internal(format!("Unsupported filter shape for {:?}", field))
}

fn airport_exists(link: flight::Column, matches: SimpleExpr) -> SimpleExpr {
    let lookup = Query::select()
        .expr(Expr::val(1))
        .from(airport::Entity.table_ref())
        .and_where(Expr::col((airport::Entity, airport::Column::Id)).equals((flight::Entity, link)))
        .and_where(matches)
        .to_owned();
    Expr::exists(lookup)
}

fn airline_exists(matches: SimpleExpr) -> SimpleExpr {
    let lookup = Query::select()
        .expr(Expr::val(1))
        .from(airline::Entity.table_ref())
        .and_where(
            Expr::col((airline::Entity, airline::Column::Id))
                .equals((flight::Entity, flight::Column::PlaneId)),
        )
        .and_where(matches)
        .to_owned();
    Expr::exists(lookup)
}

fn available_seat(seat_type: SeatType) -> SimpleExpr {
    let lookup = Query::select()
        .expr(Expr::val(1))
        .from(flight_seat::Entity.table_ref())
        .and_where(
            Expr::col((flight_seat::Entity, flight_seat::Column::FlightId))
                .equals((flight::Entity, flight::Column::Id)),
        )
        .and_where(flight_seat::Column::SeatType.eq(seat_type))
        .and_where(flight_seat::Column::Status.eq(SeatStatus::Available))
        .to_owned();
    Expr::exists(lookup)
}

fn airport_code_equals(code: &str) -> SimpleExpr {
    upper_equals((airport::Entity, airport::Column::Code), code)
}

fn airport_city_contains(city: &str) -> SimpleExpr {
    Expr::col((airport::Entity, airport::Column::City)).ilike(like_pattern(city))
}

fn upper_equals<C>(column: C, value: &str) -> SimpleExpr
where
    C: IntoColumnRef,
{
    Expr::expr(Func::upper(Expr::col(column))).eq(value.to_uppercase())
}

// Backslash-escape LIKE metacharacters; user input only ever matches
// literally.
fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::filter::{LegRole, build_leg_filter};
    use crate::search::query::{RawSearchParams, SearchQuery};
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn sql_for(expr: &FilterExpr) -> String {
        flight::Entity::find()
            .filter(to_condition(expr).unwrap())
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_airport_code_compares_upper_cased() {
        let sql = sql_for(&FilterExpr::Equals {
            field: FilterField::DepartureAirportCode,
            value: FilterValue::Text("cgk".to_string()),
            case_insensitive: true,
        });

        assert!(sql.contains("EXISTS"));
        assert!(sql.contains("UPPER"));
        assert!(sql.contains("'CGK'"));
    }

    #[test]
    fn test_city_matches_case_insensitive_substring() {
        let sql = sql_for(&FilterExpr::Contains {
            field: FilterField::DestinationAirportCity,
            value: "Jakarta".to_string(),
            case_insensitive: true,
        });

        assert!(sql.contains("EXISTS"));
        assert!(sql.contains("ILIKE"));
        assert!(sql.contains("%Jakarta%"));
    }

    #[test]
    fn test_facilities_match_case_sensitively() {
        let sql = sql_for(&FilterExpr::Contains {
            field: FilterField::Facilities,
            value: "Wifi".to_string(),
            case_insensitive: false,
        });

        assert!(sql.contains("\"facilities\" LIKE"));
        assert!(!sql.contains("\"facilities\" ILIKE"));
        assert!(sql.contains("%Wifi%"));
    }

    #[test]
    fn test_transit_flag_lowers_to_null_checks() {
        let absent = sql_for(&FilterExpr::Equals {
            field: FilterField::TransitAirport,
            value: FilterValue::Null,
            case_insensitive: false,
        });
        assert!(absent.contains("\"transit_airport_id\" IS NULL"));

        let present = sql_for(&FilterExpr::Not(Box::new(FilterExpr::Equals {
            field: FilterField::TransitAirport,
            value: FilterValue::Null,
            case_insensitive: false,
        })));
        assert!(present.contains("NOT"));
        assert!(present.contains("\"transit_airport_id\" IS NULL"));
    }

    #[test]
    fn test_seat_lookup_requires_available_status() {
        let sql = sql_for(&FilterExpr::Equals {
            field: FilterField::AvailableSeat,
            value: FilterValue::Seat(SeatType::Business),
            case_insensitive: false,
        });

        assert!(sql.contains("\"flight_seat\""));
        assert!(sql.contains("BUSINESS"));
        assert!(sql.contains("AVAILABLE"));
    }

    #[test]
    fn test_date_window_is_half_open() {
        let query = SearchQuery::from_raw(RawSearchParams {
            departure_date: Some("2024-06-12".to_string()),
            ..Default::default()
        })
        .unwrap();
        let sql = sql_for(&build_leg_filter(&query, LegRole::Outbound));

        assert!(sql.contains("\"departure_date\" >="));
        assert!(sql.contains("\"departure_date\" <"));
        assert!(!sql.contains("\"departure_date\" <="));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let sql = sql_for(&FilterExpr::Range {
            field: FilterField::Price,
            min: Some(RangeBound::inclusive(FilterValue::Price(500_000.into()))),
            max: Some(RangeBound::inclusive(FilterValue::Price(1_500_000.into()))),
        });

        assert!(sql.contains("\"price\" >="));
        assert!(sql.contains("\"price\" <="));
    }

    #[test]
    fn test_full_leg_filter_composes() {
        let query = SearchQuery::from_raw(RawSearchParams {
            departure_airport: Some("CGK".to_string()),
            arrival_airport: Some("Denpasar".to_string()),
            airline_name: Some("Garuda".to_string()),
            adult: Some("2".to_string()),
            ..Default::default()
        })
        .unwrap();
        let sql = sql_for(&build_leg_filter(&query, LegRole::Outbound));

        assert!(sql.contains("EXISTS"));
        assert!(sql.contains("\"capacity\" >= 2"));
        assert!(sql.contains("'CGK'"));
        assert!(sql.contains("%Garuda%"));
    }

    #[test]
    fn test_unsupported_shapes_are_rejected() {
        let result = to_condition(&FilterExpr::Range {
            field: FilterField::Facilities,
            min: None,
            max: None,
        });
        assert!(result.is_err());
    }
}
