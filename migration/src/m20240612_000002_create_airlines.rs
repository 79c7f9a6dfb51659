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
                    .table(Airline::Table)
                    .if_not_exists()
                    .col(uuid(Airline::Id).primary_key())
                    .col(string_len(Airline::Name, 100).not_null())
                    .col(string_len(Airline::Code, 10).not_null().unique_key())
                    .col(string(Airline::Image).not_null())
                    .col(string_len_null(Airline::Terminal, 50))
                    .to_owned(),
            )
            .await?;

        // Seed reference airlines
        let airlines = [
            ("Garuda Indonesia", "GA", "Terminal 3"),
            ("Lion Air", "JT", "Terminal 1A"),
            ("Citilink", "QG", "Terminal 1B"),
            ("Batik Air", "ID", "Terminal 1C"),
            ("Singapore Airlines", "SQ", "Terminal 3"),
            ("AirAsia Indonesia", "QZ", "Terminal 2"),
        ];

        let mut insert = Query::insert()
            .into_table(Airline::Table)
            .columns([
                Airline::Id,
                Airline::Name,
                Airline::Code,
                Airline::Image,
                Airline::Terminal,
            ])
            .to_owned();

        for (name, code, terminal) in airlines {
            insert.values_panic([
                Uuid::new_v4().into(),
                name.into(),
                code.into(),
                format!("https://placehold.co/600x400?text={}", code).into(),
                terminal.into(),
            ]);
        }

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Airline::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Airline {
    Table,
    Id,
    Name,
    Code,
    Image,
    Terminal,
}
