use sea_orm_migration::{prelude::*, schema::*};
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Airport::Table)
                    .if_not_exists()
                    .col(uuid(Airport::Id).primary_key())
                    .col(string_len(Airport::Code, 10).not_null().unique_key())
                    .col(string_len(Airport::Name, 100).not_null())
                    .col(string_len(Airport::City, 100).not_null())
                    .col(string_len(Airport::Country, 100).not_null())
                    .col(string_len(Airport::Continent, 50).not_null())
                    .col(string(Airport::Image).not_null())
                    .to_owned(),
            )
            .await?;

        // Seed reference airports
        let airports = [
            ("CGK", "Soekarno-Hatta International Airport", "Jakarta", "Indonesia", "Asia"),
            ("DPS", "I Gusti Ngurah Rai International Airport", "Denpasar", "Indonesia", "Asia"),
            ("SUB", "Juanda International Airport", "Surabaya", "Indonesia", "Asia"),
            ("KNO", "Kualanamu International Airport", "Medan", "Indonesia", "Asia"),
            ("UPG", "Sultan Hasanuddin International Airport", "Makassar", "Indonesia", "Asia"),
            ("YIA", "Yogyakarta International Airport", "Yogyakarta", "Indonesia", "Asia"),
            ("SIN", "Changi International Airport", "Singapore", "Singapore", "Asia"),
            ("KUL", "Kuala Lumpur International Airport", "Kuala Lumpur", "Malaysia", "Asia"),
            ("HND", "Haneda International Airport", "Tokyo", "Japan", "Asia"),
            ("SYD", "Kingsford Smith International Airport", "Sydney", "Australia", "Australia"),
            ("AMS", "Amsterdam Airport Schiphol", "Amsterdam", "Netherlands", "Europe"),
            ("JED", "King Abdulaziz International Airport", "Jeddah", "Saudi Arabia", "Asia"),
        ];

        let mut insert = Query::insert()
            .into_table(Airport::Table)
            .columns([
                Airport::Id,
                Airport::Code,
                Airport::Name,
                Airport::City,
                Airport::Country,
                Airport::Continent,
                Airport::Image,
            ])
            .to_owned();

        for (code, name, city, country, continent) in airports {
            insert.values_panic([
                Uuid::new_v4().into(),
                code.into(),
                name.into(),
                city.into(),
                country.into(),
                continent.into(),
                format!("https://placehold.co/600x400?text={}", code).into(),
            ]);
        }

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Airport::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Airport {
    Table,
    Id,
    Code,
    Name,
    City,
    Country,
    Continent,
    Image,
}
