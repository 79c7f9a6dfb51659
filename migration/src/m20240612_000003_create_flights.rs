use sea_orm_migration::{prelude::*, schema::*};

use super::m20240612_000001_create_airports::Airport;
use super::m20240612_000002_create_airlines::Airline;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Flight::Table)
                    .if_not_exists()
                    .col(uuid(Flight::Id).primary_key())
                    .col(string_len(Flight::Code, 20).not_null().unique_key())
                    .col(uuid(Flight::PlaneId).not_null())
                    .col(uuid(Flight::DepartureAirportId).not_null())
                    .col(uuid(Flight::DestinationAirportId).not_null())
                    .col(uuid_null(Flight::TransitAirportId))
                    .col(timestamp_with_time_zone(Flight::DepartureDate).not_null())
                    .col(timestamp_with_time_zone(Flight::ArrivalDate).not_null())
                    .col(timestamp_with_time_zone_null(Flight::TransitArrivalDate))
                    .col(timestamp_with_time_zone_null(Flight::TransitDepartureDate))
                    .col(integer(Flight::Capacity).not_null())
                    .col(decimal_len(Flight::Price, 12, 2).not_null())
                    .col(integer_null(Flight::Discount))
                    .col(text(Flight::Facilities).not_null())
                    .col(
                        timestamp_with_time_zone(Flight::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flight_plane")
                            .from(Flight::Table, Flight::PlaneId)
                            .to(Airline::Table, Airline::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flight_departure_airport")
                            .from(Flight::Table, Flight::DepartureAirportId)
                            .to(Airport::Table, Airport::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flight_destination_airport")
                            .from(Flight::Table, Flight::DestinationAirportId)
                            .to(Airport::Table, Airport::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flight_transit_airport")
                            .from(Flight::Table, Flight::TransitAirportId)
                            .to(Airport::Table, Airport::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Search hot path filters on the departure day window
        manager
            .create_index(
                Index::create()
                    .name("idx_flight_departure_date")
                    .table(Flight::Table)
                    .col(Flight::DepartureDate)
                    .to_owned(),
            )
            .await?;

        // Route-scoped counters backing flight code generation
        manager
            .create_table(
                Table::create()
                    .table(FlightSequence::Table)
                    .if_not_exists()
                    .col(string_len(FlightSequence::CodePrefix, 20).primary_key())
                    .col(integer(FlightSequence::LastNumber).not_null().default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FlightSequence::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Flight::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Flight {
    Table,
    Id,
    Code,
    PlaneId,
    DepartureAirportId,
    DestinationAirportId,
    TransitAirportId,
    DepartureDate,
    ArrivalDate,
    TransitArrivalDate,
    TransitDepartureDate,
    Capacity,
    Price,
    Discount,
    Facilities,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum FlightSequence {
    Table,
    CodePrefix,
    LastNumber,
}
