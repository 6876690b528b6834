use sea_orm::entity::prelude::*;

/// Catalog entry. `average_rating`, `total_ratings` and `total_reviews` are
/// derived and only written by the rating aggregator.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub release_year: i32,
    /// Minutes.
    pub duration: i32,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub average_rating: f64,
    pub total_ratings: i64,
    pub total_reviews: i64,
    pub views: i64,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_genres::Entity")]
    MovieGenres,
    #[sea_orm(has_many = "super::movie_actors::Entity")]
    MovieActors,
    #[sea_orm(has_many = "super::movie_directors::Entity")]
    MovieDirectors,
    #[sea_orm(has_many = "super::ratings::Entity")]
    Ratings,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
}

impl Related<super::movie_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieGenres.def()
    }
}

impl Related<super::movie_actors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieActors.def()
    }
}

impl Related<super::movie_directors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieDirectors.def()
    }
}

impl Related<super::ratings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
