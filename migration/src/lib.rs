pub use sea_orm_migration::prelude::*;

mod m20240612_000001_create_airports;
mod m20240612_000002_create_airlines;
mod m20240612_000003_create_flights;
mod m20240612_000004_create_flight_seats;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240612_000001_create_airports::Migration),
            Box::new(m20240612_000002_create_airlines::Migration),
            Box::new(m20240612_000003_create_flights::Migration),
            Box::new(m20240612_000004_create_flight_seats::Migration),
        ]
    }
}
