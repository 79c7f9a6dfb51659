pub mod adapter;

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Statement,
};
use uuid::Uuid;

use crate::entities::flight_seat::SeatType;
use crate::entities::{airline, airport, flight, flight_seat};
use crate::error::{AppError, AppResult};
use crate::search::filter::FilterExpr;
use crate::search::formatter::FlightRecord;
use crate::search::paginate::PageWindow;
use crate::search::price_range::{PriceRange, PriceRanges};
use crate::search::sort::SortMode;

// Upserts the per-prefix counter and hands back the new ordinal in one
// statement.
const NEXT_CODE_NUMBER_SQL: &str = r#"INSERT INTO "flight_sequence" ("code_prefix", "last_number")
VALUES ($1, 1)
ON CONFLICT ("code_prefix")
DO UPDATE SET "last_number" = "flight_sequence"."last_number" + 1
RETURNING "last_number""#;

/// Read side of flight search. Owns every query the engine issues against
/// the store; the search core stays free of storage concerns.
pub struct FlightRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> FlightRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// One page of matching flights with their joined rows. The SQL ordering
    /// mirrors the requested sort mode; the pagination window lines up with
    /// the final in-memory ordering.
    pub async fn search(
        &self,
        filter: &FilterExpr,
        sort: Option<SortMode>,
        window: PageWindow,
    ) -> AppResult<Vec<FlightRecord>> {
        let select = apply_order(
            flight::Entity::find().filter(adapter::to_condition(filter)?),
            sort,
        );

        let flights = select
            .offset(window.offset())
            .limit(window.limit)
            .all(self.db)
            .await?;

        self.assemble(flights).await
    }

    pub async fn count(&self, filter: &FilterExpr) -> AppResult<u64> {
        let total = flight::Entity::find()
            .filter(adapter::to_condition(filter)?)
            .count(self.db)
            .await?;
        Ok(total)
    }

    /// Per-class price spans. The three aggregates run concurrently, and if
    /// any of them fails the whole lookup fails rather than reporting a
    /// partial set.
    pub async fn price_ranges(&self, bounds: (Decimal, Decimal)) -> AppResult<PriceRanges> {
        let (economy, business, first) = tokio::try_join!(
            self.aggregate_price(SeatType::Economy, bounds),
            self.aggregate_price(SeatType::Business, bounds),
            self.aggregate_price(SeatType::First, bounds),
        )?;

        Ok(PriceRanges {
            economy: PriceRange::from_bounds(economy),
            business: PriceRange::from_bounds(business),
            first: PriceRange::from_bounds(first),
        })
    }

    /// Min and max price across seats of one class priced inside `bounds`.
    pub async fn aggregate_price(
        &self,
        seat_type: SeatType,
        bounds: (Decimal, Decimal),
    ) -> AppResult<Option<(Decimal, Decimal)>> {
        #[derive(FromQueryResult)]
        struct Bounds {
            min_price: Option<Decimal>,
            max_price: Option<Decimal>,
        }

        let (min_bound, max_bound) = bounds;
        let row = flight_seat::Entity::find()
            .select_only()
            .expr_as(flight_seat::Column::Price.min(), "min_price")
            .expr_as(flight_seat::Column::Price.max(), "max_price")
            .filter(flight_seat::Column::SeatType.eq(seat_type))
            .filter(flight_seat::Column::Price.gte(min_bound))
            .filter(flight_seat::Column::Price.lte(max_bound))
            .into_model::<Bounds>()
            .one(self.db)
            .await?;

        Ok(row.and_then(|bounds| bounds.min_price.zip(bounds.max_price)))
    }

    pub async fn find_record(&self, id: Uuid) -> AppResult<Option<FlightRecord>> {
        let Some(found) = flight::Entity::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };
        let mut records = self.assemble(vec![found]).await?;
        Ok(records.pop())
    }

    /// Reserves the next ordinal for a route-scoped flight code. The counter
    /// row is upserted atomically; concurrent writers never share a number.
    pub async fn next_code_number(&self, code_prefix: &str) -> AppResult<i32> {
        let statement = Statement::from_sql_and_values(
            DbBackend::Postgres,
            NEXT_CODE_NUMBER_SQL,
            [code_prefix.into()],
        );

        let row = self
            .db
            .query_one(statement)
            .await?
            .ok_or_else(|| AppError::Internal("Flight code sequence returned no row".to_string()))?;
        Ok(row.try_get::<i32>("", "last_number")?)
    }

    // One round trip per joined table, not one per flight.
    async fn assemble(&self, flights: Vec<flight::Model>) -> AppResult<Vec<FlightRecord>> {
        if flights.is_empty() {
            return Ok(Vec::new());
        }

        let airline_ids: Vec<Uuid> = flights.iter().map(|found| found.plane_id).collect();
        let flight_ids: Vec<Uuid> = flights.iter().map(|found| found.id).collect();
        let mut airport_ids: Vec<Uuid> = Vec::new();
        for found in &flights {
            airport_ids.push(found.departure_airport_id);
            airport_ids.push(found.destination_airport_id);
            if let Some(transit_id) = found.transit_airport_id {
                airport_ids.push(transit_id);
            }
        }

        let airlines: HashMap<Uuid, airline::Model> = airline::Entity::find()
            .filter(airline::Column::Id.is_in(airline_ids))
            .all(self.db)
            .await?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();
        let airports: HashMap<Uuid, airport::Model> = airport::Entity::find()
            .filter(airport::Column::Id.is_in(airport_ids))
            .all(self.db)
            .await?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();

        let mut seats_by_flight: HashMap<Uuid, Vec<flight_seat::Model>> = HashMap::new();
        for seat in flight_seat::Entity::find()
            .filter(flight_seat::Column::FlightId.is_in(flight_ids))
            .all(self.db)
            .await?
        {
            seats_by_flight.entry(seat.flight_id).or_default().push(seat);
        }

        let mut records = Vec::with_capacity(flights.len());
        for found in flights {
            let plane = airlines
                .get(&found.plane_id)
                .cloned()
                .ok_or_else(|| join_fault("airline", found.id))?;
            let departure_airport = airports
                .get(&found.departure_airport_id)
                .cloned()
                .ok_or_else(|| join_fault("departure airport", found.id))?;
            let destination_airport = airports
                .get(&found.destination_airport_id)
                .cloned()
                .ok_or_else(|| join_fault("destination airport", found.id))?;
            let transit_airport = match found.transit_airport_id {
                Some(transit_id) => Some(
                    airports
                        .get(&transit_id)
                        .cloned()
                        .ok_or_else(|| join_fault("transit airport", found.id))?,
                ),
                None => None,
            };
            let seats = seats_by_flight.remove(&found.id).unwrap_or_default();

            records.push(FlightRecord {
                flight: found,
                plane,
                departure_airport,
                destination_airport,
                transit_airport,
                seats,
            });
        }
        Ok(records)
    }
}

fn apply_order(select: Select<flight::Entity>, sort: Option<SortMode>) -> Select<flight::Entity> {
    let select = match sort {
        Some(SortMode::ShortestDuration) => select
            .order_by_asc(
                Expr::col(flight::Column::ArrivalDate).sub(Expr::col(flight::Column::DepartureDate)),
            )
            .order_by_asc(flight::Column::DepartureDate),
        Some(SortMode::EarliestDeparture) => select.order_by_asc(flight::Column::DepartureDate),
        Some(SortMode::LatestDeparture) => select.order_by_desc(flight::Column::DepartureDate),
        Some(SortMode::EarliestArrival) => select.order_by_asc(flight::Column::ArrivalDate),
        Some(SortMode::LatestArrival) => select.order_by_desc(flight::Column::ArrivalDate),
        Some(SortMode::LowestPrice) => select.order_by_asc(flight::Column::Price),
        // No mode requested: keep a stable insertion order.
        None => select.order_by_asc(flight::Column::CreatedAt),
    };
    select.order_by_asc(flight::Column::Id)
}

fn join_fault(kind: &str, flight_id: Uuid) -> AppError {
    AppError::Internal(format!("Flight {} is missing its joined {}", flight_id, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::QueryTrait;

    fn order_sql(sort: Option<SortMode>) -> String {
        apply_order(flight::Entity::find(), sort)
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_duration_order_uses_timestamp_difference() {
        let sql = order_sql(Some(SortMode::ShortestDuration));

        assert!(sql.contains("ORDER BY"));
        assert!(sql.contains("\"arrival_date\" - \"departure_date\""));
        assert!(sql.contains("\"departure_date\" ASC"));
    }

    #[test]
    fn test_each_mode_orders_its_column() {
        assert!(order_sql(Some(SortMode::LowestPrice)).contains("\"price\" ASC"));
        assert!(order_sql(Some(SortMode::LatestDeparture)).contains("\"departure_date\" DESC"));
        assert!(order_sql(Some(SortMode::EarliestArrival)).contains("\"arrival_date\" ASC"));
        assert!(order_sql(Some(SortMode::LatestArrival)).contains("\"arrival_date\" DESC"));
        assert!(order_sql(None).contains("\"created_at\" ASC"));
    }

    #[test]
    fn test_ties_always_break_on_id() {
        for sort in [None, Some(SortMode::LowestPrice), Some(SortMode::EarliestDeparture)] {
            assert!(order_sql(sort).ends_with("\"id\" ASC"));
        }
    }

    #[test]
    fn test_code_sequence_increments_in_one_statement() {
        assert!(NEXT_CODE_NUMBER_SQL.contains(r#"ON CONFLICT ("code_prefix")"#));
        assert!(NEXT_CODE_NUMBER_SQL.contains(r#""last_number" + 1"#));
        assert!(NEXT_CODE_NUMBER_SQL.contains(r#"RETURNING "last_number""#));
    }
}
