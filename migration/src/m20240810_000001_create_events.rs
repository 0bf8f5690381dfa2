use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per (gameweek, player, statistic identifier)
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Events::Gw).integer().not_null())
                    .col(ColumnDef::new(Events::PlayerId).integer().not_null())
                    .col(ColumnDef::new(Events::Identifier).string_len(64).not_null())
                    .col(ColumnDef::new(Events::Value).integer().not_null())
                    .col(ColumnDef::new(Events::Points).integer().not_null())
                    .col(ColumnDef::new(Events::Fixture).integer().not_null())
                    .col(ColumnDef::new(Events::Minutes).integer().not_null())
                    .col(ColumnDef::new(Events::TotalPoints).integer().not_null())
                    .col(
                        ColumnDef::new(Events::EventDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Events::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(Events::Gw)
                            .col(Events::PlayerId)
                            .col(Events::Identifier),
                    )
                    .to_owned(),
            )
            .await?;

        // League event feeds read newest-first within a gameweek
        manager
            .create_index(
                Index::create()
                    .name("idx_events_gw_updated_at")
                    .table(Events::Table)
                    .col(Events::Gw)
                    .col(Events::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Events {
    Table,
    Gw,
    PlayerId,
    Identifier,
    Value,
    Points,
    Fixture,
    Minutes,
    TotalPoints,
    EventDate,
    UpdatedAt,
}
