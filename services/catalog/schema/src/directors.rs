use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "directors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub birth_date: Option<chrono::NaiveDate>,
    pub nationality: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_directors::Entity")]
    MovieDirectors,
}

impl Related<super::movie_directors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieDirectors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
