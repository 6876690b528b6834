use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Watchlists::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Watchlists::UserId).uuid().not_null())
                    .col(ColumnDef::new(Watchlists::MovieId).uuid().not_null())
                    .col(
                        ColumnDef::new(Watchlists::AddedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(Watchlists::UserId)
                            .col(Watchlists::MovieId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Watchlists::Table, Watchlists::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Watchlists::Table, Watchlists::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Lists::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Lists::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Lists::UserId).uuid().not_null())
                    .col(ColumnDef::new(Lists::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Lists::Description).string_len(500))
                    .col(
                        ColumnDef::new(Lists::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Lists::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Lists::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Lists::Table, Lists::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ListMovies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ListMovies::ListId).uuid().not_null())
                    .col(ColumnDef::new(ListMovies::MovieId).uuid().not_null())
                    .col(
                        ColumnDef::new(ListMovies::AddedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(ListMovies::ListId)
                            .col(ListMovies::MovieId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ListMovies::Table, ListMovies::ListId)
                            .to(Lists::Table, Lists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ListMovies::Table, ListMovies::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ListMovies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Lists::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Watchlists::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Watchlists {
    Table,
    UserId,
    MovieId,
    AddedAt,
}

#[derive(Iden)]
enum Lists {
    Table,
    Id,
    UserId,
    Name,
    Description,
    IsPublic,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ListMovies {
    Table,
    ListId,
    MovieId,
    AddedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Movies {
    Table,
    Id,
}
