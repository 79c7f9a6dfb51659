use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20240612_000003_create_flights::Flight;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create seat class and status enums
        manager
            .create_type(
                Type::create()
                    .as_enum(SeatType::Enum)
                    .values([SeatType::Economy, SeatType::Business, SeatType::First])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(SeatStatus::Enum)
                    .values([SeatStatus::Available, SeatStatus::Booked])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FlightSeat::Table)
                    .if_not_exists()
                    .col(uuid(FlightSeat::Id).primary_key())
                    .col(uuid(FlightSeat::FlightId).not_null())
                    .col(
                        ColumnDef::new(FlightSeat::Type)
                            .custom(SeatType::Enum)
                            .not_null(),
                    )
                    .col(decimal_len(FlightSeat::Price, 12, 2).not_null())
                    .col(
                        ColumnDef::new(FlightSeat::Status)
                            .custom(SeatStatus::Enum)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flight_seat_flight")
                            .from(FlightSeat::Table, FlightSeat::FlightId)
                            .to(Flight::Table, Flight::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one seat row per class on a flight
        manager
            .create_index(
                Index::create()
                    .name("idx_flight_seat_flight_type")
                    .table(FlightSeat::Table)
                    .col(FlightSeat::FlightId)
                    .col(FlightSeat::Type)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FlightSeat::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(SeatStatus::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(SeatType::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum FlightSeat {
    Table,
    Id,
    FlightId,
    Type,
    Price,
    Status,
}

#[derive(DeriveIden)]
pub enum SeatType {
    #[sea_orm(iden = "seat_type")]
    Enum,
    #[sea_orm(iden = "ECONOMY")]
    Economy,
    #[sea_orm(iden = "BUSINESS")]
    Business,
    #[sea_orm(iden = "FIRST")]
    First,
}

#[derive(DeriveIden)]
pub enum SeatStatus {
    #[sea_orm(iden = "seat_status")]
    Enum,
    #[sea_orm(iden = "AVAILABLE")]
    Available,
    #[sea_orm(iden = "BOOKED")]
    Booked,
}
