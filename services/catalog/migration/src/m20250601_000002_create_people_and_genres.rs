use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Genres::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Genres::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Genres::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Genres::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Genres::Description).text())
                    .col(
                        ColumnDef::new(Genres::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        for table in [People::Actors, People::Directors] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(ColumnDef::new(People::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(People::Name).string().not_null())
                        .col(ColumnDef::new(People::BirthDate).date())
                        .col(ColumnDef::new(People::Nationality).string())
                        .col(ColumnDef::new(People::Bio).string_len(2000))
                        .col(ColumnDef::new(People::PhotoUrl).string())
                        .col(
                            ColumnDef::new(People::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(People::Directors).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(People::Actors).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genres::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Genres {
    Table,
    Id,
    Name,
    Slug,
    Description,
    CreatedAt,
}

/// Actors and directors share one column layout.
#[derive(Iden, Clone, Copy)]
enum People {
    Actors,
    Directors,
    Id,
    Name,
    BirthDate,
    Nationality,
    Bio,
    PhotoUrl,
    CreatedAt,
}
