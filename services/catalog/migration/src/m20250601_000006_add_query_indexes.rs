use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[(&str, Tbl, &[Col])] = &[
    ("idx_movies_active_views", Tbl::Movies, &[Col::IsActive, Col::Views]),
    (
        "idx_movies_active_average_rating",
        Tbl::Movies,
        &[Col::IsActive, Col::AverageRating],
    ),
    ("idx_movies_created_at", Tbl::Movies, &[Col::CreatedAt]),
    ("idx_ratings_movie_score", Tbl::Ratings, &[Col::MovieId, Col::Score]),
    ("idx_reviews_movie_helpful", Tbl::Reviews, &[Col::MovieId, Col::HelpfulVotes]),
    ("idx_watchlists_user_added", Tbl::Watchlists, &[Col::UserId, Col::AddedAt]),
    ("idx_lists_user_id", Tbl::Lists, &[Col::UserId]),
    ("idx_movie_genres_genre_id", Tbl::MovieGenres, &[Col::GenreId]),
    ("idx_movie_actors_actor_id", Tbl::MovieActors, &[Col::ActorId]),
    ("idx_movie_directors_director_id", Tbl::MovieDirectors, &[Col::DirectorId]),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for &(name, table, cols) in INDEXES {
            let mut index = Index::create();
            index.table(table).name(name);
            for &col in cols {
                index.col(col);
            }
            manager.create_index(index.to_owned()).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for &(name, _, _) in INDEXES.iter().rev() {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden, Clone, Copy)]
enum Tbl {
    Movies,
    Ratings,
    Reviews,
    Watchlists,
    Lists,
    MovieGenres,
    MovieActors,
    MovieDirectors,
}

#[derive(Iden, Clone, Copy)]
enum Col {
    IsActive,
    Views,
    AverageRating,
    CreatedAt,
    MovieId,
    Score,
    HelpfulVotes,
    UserId,
    AddedAt,
    GenreId,
    ActorId,
    DirectorId,
}
