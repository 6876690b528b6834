use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Movies::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Movies::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Movies::Description).string_len(2000).not_null())
                    .col(ColumnDef::new(Movies::ReleaseYear).integer().not_null())
                    .col(ColumnDef::new(Movies::Duration).integer().not_null())
                    .col(ColumnDef::new(Movies::PosterUrl).string())
                    .col(ColumnDef::new(Movies::TrailerUrl).string())
                    .col(ColumnDef::new(Movies::Country).string())
                    .col(ColumnDef::new(Movies::Language).string())
                    .col(
                        ColumnDef::new(Movies::AverageRating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Movies::TotalRatings)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Movies::TotalReviews)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Movies::Views).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Movies::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Movies::CreatedBy).uuid())
                    .col(
                        ColumnDef::new(Movies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Movies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Movies::Table, Movies::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        for (table, column, target) in [
            (Link::MovieGenres, Link::GenreId, Link::Genres),
            (Link::MovieActors, Link::ActorId, Link::Actors),
            (Link::MovieDirectors, Link::DirectorId, Link::Directors),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(ColumnDef::new(Link::MovieId).uuid().not_null())
                        .col(ColumnDef::new(column).uuid().not_null())
                        .primary_key(Index::create().col(Link::MovieId).col(column))
                        .foreign_key(
                            ForeignKey::create()
                                .from(table, Link::MovieId)
                                .to(Movies::Table, Movies::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .from(table, column)
                                .to(target, Link::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [Link::MovieDirectors, Link::MovieActors, Link::MovieGenres] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        manager
            .drop_table(Table::drop().table(Movies::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Movies {
    Table,
    Id,
    Title,
    Description,
    ReleaseYear,
    Duration,
    PosterUrl,
    TrailerUrl,
    Country,
    Language,
    AverageRating,
    TotalRatings,
    TotalReviews,
    Views,
    IsActive,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

/// Join tables between movies and genres / actors / directors.
#[derive(Iden, Clone, Copy)]
enum Link {
    MovieGenres,
    MovieActors,
    MovieDirectors,
    Genres,
    Actors,
    Directors,
    Id,
    MovieId,
    GenreId,
    ActorId,
    DirectorId,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
