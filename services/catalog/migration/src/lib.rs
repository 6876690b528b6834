pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users;
mod m20250601_000002_create_people_and_genres;
mod m20250601_000003_create_movies;
mod m20250601_000004_create_ratings_and_reviews;
mod m20250601_000005_create_watchlists_and_lists;
mod m20250601_000006_add_query_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users::Migration),
            Box::new(m20250601_000002_create_people_and_genres::Migration),
            Box::new(m20250601_000003_create_movies::Migration),
            Box::new(m20250601_000004_create_ratings_and_reviews::Migration),
            Box::new(m20250601_000005_create_watchlists_and_lists::Migration),
            Box::new(m20250601_000006_add_query_indexes::Migration),
        ]
    }
}
