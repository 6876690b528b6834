use std::collections::HashMap;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, FromQueryResult, IntoActiveModel as _, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, SqlErr, TransactionTrait,
    sea_query::SimpleExpr,
};
use uuid::Uuid;

use filmrate_catalog_schema::{
    actors, directors, genres, list_movies, lists, movie_actors, movie_directors, movie_genres,
    movies, ratings, review_votes, reviews, users, watchlists,
};
use filmrate_core::sea_ext::contains_ci;
use filmrate_domain::pagination::{PageRequest, Sort};
use filmrate_domain::rating::{Distribution, RatingSummary, Score};
use filmrate_domain::user::UserRole;
use filmrate_domain::vote::VoteType;

use crate::domain::filter::{MovieFilter, MovieQuery, MovieSort, SortField};
use crate::domain::repository::{
    CatalogRepository, ListRepository, MovieRepository, RatingRepository, ReviewRepository,
    ReviewVoteRepository, UserRepository, WatchlistRepository,
};
use crate::domain::types::{
    Credentials, Genre, ListEntry, ListFilter, Movie, MovieList, MovieRef, MovieUpdate, NamedRef,
    NewMovie, Person, PersonKind, RatedMovie, Rating, RatingSortBy, RefKind, Review, ReviewFilter,
    ReviewSortBy, ReviewVote, User, UserFilter, UserStats, WatchlistEntry, YearRange,
};
use crate::error::{CatalogError, map_txn_err, map_write_err};

fn order(sort: Sort) -> Order {
    match sort {
        Sort::Asc => Order::Asc,
        Sort::Desc => Order::Desc,
    }
}

// ── Movie repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMovieRepository {
    pub db: DatabaseConnection,
}

/// `movies.id IN (SELECT movie_id FROM <link> WHERE <ref> IN (ids))`
fn linked_to(kind: RefKind, ids: &[Uuid]) -> SimpleExpr {
    let ids = ids.to_vec();
    let subquery = match kind {
        RefKind::Genre => Query::select()
            .column(movie_genres::Column::MovieId)
            .from(movie_genres::Entity)
            .and_where(movie_genres::Column::GenreId.is_in(ids))
            .to_owned(),
        RefKind::Actor => Query::select()
            .column(movie_actors::Column::MovieId)
            .from(movie_actors::Entity)
            .and_where(movie_actors::Column::ActorId.is_in(ids))
            .to_owned(),
        RefKind::Director => Query::select()
            .column(movie_directors::Column::MovieId)
            .from(movie_directors::Entity)
            .and_where(movie_directors::Column::DirectorId.is_in(ids))
            .to_owned(),
    };
    movies::Column::Id.in_subquery(subquery)
}

/// Translate a [`MovieFilter`] into a SQL condition.
pub fn movie_condition(filter: &MovieFilter) -> Condition {
    let mut cond = Condition::all();
    if filter.active_only {
        cond = cond.add(movies::Column::IsActive.eq(true));
    }
    if !filter.exclude_ids.is_empty() {
        cond = cond.add(movies::Column::Id.is_not_in(filter.exclude_ids.clone()));
    }
    if let Some(text) = &filter.text {
        cond = cond.add(
            Condition::any()
                .add(contains_ci(movies::Column::Title, text))
                .add(contains_ci(movies::Column::Description, text)),
        );
    }
    if let Some(title) = &filter.title {
        cond = cond.add(contains_ci(movies::Column::Title, title));
    }
    if let Some(ids) = &filter.genre_ids {
        cond = cond.add(linked_to(RefKind::Genre, ids));
    }
    if let Some(ids) = &filter.actor_ids {
        cond = cond.add(linked_to(RefKind::Actor, ids));
    }
    if let Some(ids) = &filter.director_ids {
        cond = cond.add(linked_to(RefKind::Director, ids));
    }
    if let Some((genre_ids, director_ids)) = &filter.genre_or_director {
        cond = cond.add(
            Condition::any()
                .add(linked_to(RefKind::Genre, genre_ids))
                .add(linked_to(RefKind::Director, director_ids)),
        );
    }
    if let Some(year) = filter.year_from {
        cond = cond.add(movies::Column::ReleaseYear.gte(year));
    }
    if let Some(year) = filter.year_to {
        cond = cond.add(movies::Column::ReleaseYear.lte(year));
    }
    if let Some(rating) = filter.rating_from {
        cond = cond.add(movies::Column::AverageRating.gte(rating));
    }
    if let Some(rating) = filter.rating_to {
        cond = cond.add(movies::Column::AverageRating.lte(rating));
    }
    if let Some(country) = &filter.country {
        cond = cond.add(contains_ci(movies::Column::Country, country));
    }
    if let Some(language) = &filter.language {
        cond = cond.add(contains_ci(movies::Column::Language, language));
    }
    if let Some(min) = filter.min_total_ratings {
        cond = cond.add(movies::Column::TotalRatings.gte(min));
    }
    cond
}

fn sort_movies(mut query: Select<movies::Entity>, sort: MovieSort) -> Select<movies::Entity> {
    for (field, dir) in sort.keys() {
        let col = match field {
            SortField::CreatedAt => movies::Column::CreatedAt,
            SortField::AverageRating => movies::Column::AverageRating,
            SortField::TotalRatings => movies::Column::TotalRatings,
            SortField::TotalReviews => movies::Column::TotalReviews,
            SortField::Views => movies::Column::Views,
            SortField::Title => movies::Column::Title,
            SortField::ReleaseYear => movies::Column::ReleaseYear,
        };
        query = query.order_by(col, order(dir));
    }
    query.order_by_asc(movies::Column::Id)
}

fn group_refs(
    rows: impl IntoIterator<Item = (Uuid, Option<NamedRef>)>,
) -> HashMap<Uuid, Vec<NamedRef>> {
    let mut map: HashMap<Uuid, Vec<NamedRef>> = HashMap::new();
    for (movie_id, named) in rows {
        if let Some(named) = named {
            map.entry(movie_id).or_default().push(named);
        }
    }
    for refs in map.values_mut() {
        refs.sort_by(|a, b| a.name.cmp(&b.name));
    }
    map
}

/// Resolve genre, director and actor names for a batch of movie rows.
async fn load_movies<C: ConnectionTrait>(
    db: &C,
    models: Vec<movies::Model>,
) -> Result<Vec<Movie>, CatalogError> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();

    let mut genres = group_refs(
        movie_genres::Entity::find()
            .filter(movie_genres::Column::MovieId.is_in(ids.clone()))
            .find_also_related(genres::Entity)
            .all(db)
            .await
            .context("load movie genres")?
            .into_iter()
            .map(|(link, g)| (link.movie_id, g.map(|g| NamedRef { id: g.id, name: g.name }))),
    );
    let mut actors = group_refs(
        movie_actors::Entity::find()
            .filter(movie_actors::Column::MovieId.is_in(ids.clone()))
            .find_also_related(actors::Entity)
            .all(db)
            .await
            .context("load movie actors")?
            .into_iter()
            .map(|(link, a)| (link.movie_id, a.map(|a| NamedRef { id: a.id, name: a.name }))),
    );
    let mut directors = group_refs(
        movie_directors::Entity::find()
            .filter(movie_directors::Column::MovieId.is_in(ids))
            .find_also_related(directors::Entity)
            .all(db)
            .await
            .context("load movie directors")?
            .into_iter()
            .map(|(link, d)| (link.movie_id, d.map(|d| NamedRef { id: d.id, name: d.name }))),
    );

    Ok(models
        .into_iter()
        .map(|model| {
            let id = model.id;
            movie_from_model(
                model,
                genres.remove(&id).unwrap_or_default(),
                directors.remove(&id).unwrap_or_default(),
                actors.remove(&id).unwrap_or_default(),
            )
        })
        .collect())
}

fn movie_from_model(
    model: movies::Model,
    genres: Vec<NamedRef>,
    directors: Vec<NamedRef>,
    actors: Vec<NamedRef>,
) -> Movie {
    Movie {
        id: model.id,
        title: model.title,
        description: model.description,
        release_year: model.release_year,
        duration: model.duration,
        poster_url: model.poster_url,
        trailer_url: model.trailer_url,
        country: model.country,
        language: model.language,
        genres,
        directors,
        actors,
        average_rating: model.average_rating,
        total_ratings: model.total_ratings,
        total_reviews: model.total_reviews,
        views: model.views,
        is_active: model.is_active,
        created_by: model.created_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn movie_ref_from_model(model: movies::Model) -> MovieRef {
    MovieRef {
        id: model.id,
        title: model.title,
        poster_url: model.poster_url,
        release_year: model.release_year,
    }
}

/// Replace the reference rows of one kind for a movie.
async fn replace_links<C: ConnectionTrait>(
    db: &C,
    kind: RefKind,
    movie_id: Uuid,
    ids: &[Uuid],
) -> Result<(), DbErr> {
    match kind {
        RefKind::Genre => {
            movie_genres::Entity::delete_many()
                .filter(movie_genres::Column::MovieId.eq(movie_id))
                .exec(db)
                .await?;
            if !ids.is_empty() {
                movie_genres::Entity::insert_many(ids.iter().map(|&genre_id| {
                    movie_genres::ActiveModel {
                        movie_id: Set(movie_id),
                        genre_id: Set(genre_id),
                    }
                }))
                .exec_without_returning(db)
                .await?;
            }
        }
        RefKind::Actor => {
            movie_actors::Entity::delete_many()
                .filter(movie_actors::Column::MovieId.eq(movie_id))
                .exec(db)
                .await?;
            if !ids.is_empty() {
                movie_actors::Entity::insert_many(ids.iter().map(|&actor_id| {
                    movie_actors::ActiveModel {
                        movie_id: Set(movie_id),
                        actor_id: Set(actor_id),
                    }
                }))
                .exec_without_returning(db)
                .await?;
            }
        }
        RefKind::Director => {
            movie_directors::Entity::delete_many()
                .filter(movie_directors::Column::MovieId.eq(movie_id))
                .exec(db)
                .await?;
            if !ids.is_empty() {
                movie_directors::Entity::insert_many(ids.iter().map(|&director_id| {
                    movie_directors::ActiveModel {
                        movie_id: Set(movie_id),
                        director_id: Set(director_id),
                    }
                }))
                .exec_without_returning(db)
                .await?;
            }
        }
    }
    Ok(())
}

#[derive(Debug, FromQueryResult)]
struct YearRow {
    min_year: Option<i32>,
    max_year: Option<i32>,
}

impl DbMovieRepository {
    async fn distinct_text(
        &self,
        col: movies::Column,
        context: &'static str,
    ) -> Result<Vec<String>, CatalogError> {
        let values = movies::Entity::find()
            .select_only()
            .column(col)
            .distinct()
            .filter(movies::Column::IsActive.eq(true))
            .filter(col.is_not_null())
            .filter(col.ne(""))
            .order_by_asc(col)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .context(context)?;
        Ok(values)
    }
}

impl MovieRepository for DbMovieRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>, CatalogError> {
        let model = movies::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find movie by id")?;
        match model {
            Some(model) => Ok(load_movies(&self.db, vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Movie>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = movies::Entity::find()
            .filter(movies::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .context("find movies by ids")?;
        load_movies(&self.db, models).await
    }

    async fn find(&self, query: &MovieQuery) -> Result<Vec<Movie>, CatalogError> {
        if query.filter.is_unsatisfiable() || query.limit == 0 {
            return Ok(Vec::new());
        }
        let select = movies::Entity::find().filter(movie_condition(&query.filter));
        let models = sort_movies(select, query.sort)
            .offset(query.offset)
            .limit(query.limit)
            .all(&self.db)
            .await
            .context("find movies")?;
        load_movies(&self.db, models).await
    }

    async fn count(&self, filter: &MovieFilter) -> Result<u64, CatalogError> {
        if filter.is_unsatisfiable() {
            return Ok(0);
        }
        let total = movies::Entity::find()
            .filter(movie_condition(filter))
            .count(&self.db)
            .await
            .context("count movies")?;
        Ok(total)
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), CatalogError> {
        movies::Entity::update_many()
            .col_expr(
                movies::Column::Views,
                Expr::col(movies::Column::Views).add(1),
            )
            .filter(movies::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("increment movie views")?;
        Ok(())
    }

    async fn update_rating_summary(
        &self,
        id: Uuid,
        summary: RatingSummary,
        total_reviews: u64,
    ) -> Result<(), CatalogError> {
        movies::Entity::update_many()
            .col_expr(
                movies::Column::AverageRating,
                Expr::value(summary.average_rating),
            )
            .col_expr(
                movies::Column::TotalRatings,
                Expr::value(summary.total_ratings),
            )
            .col_expr(
                movies::Column::TotalReviews,
                Expr::value(total_reviews as i64),
            )
            .filter(movies::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update movie rating summary")?;
        Ok(())
    }

    async fn create(&self, movie: &NewMovie) -> Result<(), CatalogError> {
        let movie = movie.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    movies::ActiveModel {
                        id: Set(movie.id),
                        title: Set(movie.title),
                        description: Set(movie.description),
                        release_year: Set(movie.release_year),
                        duration: Set(movie.duration),
                        poster_url: Set(movie.poster_url),
                        trailer_url: Set(movie.trailer_url),
                        country: Set(movie.country),
                        language: Set(movie.language),
                        average_rating: Set(0.0),
                        total_ratings: Set(0),
                        total_reviews: Set(0),
                        views: Set(0),
                        is_active: Set(true),
                        created_by: Set(Some(movie.created_by)),
                        created_at: Set(movie.created_at),
                        updated_at: Set(movie.created_at),
                    }
                    .insert(txn)
                    .await?;
                    replace_links(txn, RefKind::Genre, movie.id, &movie.genre_ids).await?;
                    replace_links(txn, RefKind::Actor, movie.id, &movie.actor_ids).await?;
                    replace_links(txn, RefKind::Director, movie.id, &movie.director_ids).await?;
                    Ok(())
                })
            })
            .await
            .context("create movie")?;
        Ok(())
    }

    async fn update(&self, id: Uuid, update: &MovieUpdate) -> Result<bool, CatalogError> {
        let update = update.clone();
        let found = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    let Some(model) = movies::Entity::find_by_id(id).one(txn).await? else {
                        return Ok(false);
                    };
                    let mut am = model.into_active_model();
                    if let Some(title) = update.title {
                        am.title = Set(title);
                    }
                    if let Some(description) = update.description {
                        am.description = Set(description);
                    }
                    if let Some(year) = update.release_year {
                        am.release_year = Set(year);
                    }
                    if let Some(duration) = update.duration {
                        am.duration = Set(duration);
                    }
                    if let Some(url) = update.poster_url {
                        am.poster_url = Set(Some(url));
                    }
                    if let Some(url) = update.trailer_url {
                        am.trailer_url = Set(Some(url));
                    }
                    if let Some(country) = update.country {
                        am.country = Set(Some(country));
                    }
                    if let Some(language) = update.language {
                        am.language = Set(Some(language));
                    }
                    if let Some(is_active) = update.is_active {
                        am.is_active = Set(is_active);
                    }
                    am.updated_at = Set(Utc::now());
                    am.update(txn).await?;

                    if let Some(ids) = &update.genre_ids {
                        replace_links(txn, RefKind::Genre, id, ids).await?;
                    }
                    if let Some(ids) = &update.actor_ids {
                        replace_links(txn, RefKind::Actor, id, ids).await?;
                    }
                    if let Some(ids) = &update.director_ids {
                        replace_links(txn, RefKind::Director, id, ids).await?;
                    }
                    Ok(true)
                })
            })
            .await
            .context("update movie")?;
        Ok(found)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        let result = movies::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete movie")?;
        Ok(result.rows_affected > 0)
    }

    async fn year_range(&self) -> Result<Option<YearRange>, CatalogError> {
        let row = movies::Entity::find()
            .select_only()
            .column_as(movies::Column::ReleaseYear.min(), "min_year")
            .column_as(movies::Column::ReleaseYear.max(), "max_year")
            .filter(movies::Column::IsActive.eq(true))
            .into_model::<YearRow>()
            .one(&self.db)
            .await
            .context("movie year range")?;
        Ok(row.and_then(|r| match (r.min_year, r.max_year) {
            (Some(min_year), Some(max_year)) => Some(YearRange { min_year, max_year }),
            _ => None,
        }))
    }

    async fn distinct_countries(&self) -> Result<Vec<String>, CatalogError> {
        self.distinct_text(movies::Column::Country, "distinct movie countries")
            .await
    }

    async fn distinct_languages(&self) -> Result<Vec<String>, CatalogError> {
        self.distinct_text(movies::Column::Language, "distinct movie languages")
            .await
    }

    async fn count_all(&self) -> Result<u64, CatalogError> {
        let total = movies::Entity::find()
            .count(&self.db)
            .await
            .context("count all movies")?;
        Ok(total)
    }
}

// ── Rating repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRatingRepository {
    pub db: DatabaseConnection,
}

fn rating_from_model(model: ratings::Model) -> Rating {
    Rating {
        user_id: model.user_id,
        movie_id: model.movie_id,
        score: model.score,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// Insert the pair's rating or overwrite its score.
async fn upsert_rating<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    movie_id: Uuid,
    score: i16,
) -> Result<(), DbErr> {
    let now = Utc::now();
    ratings::Entity::insert(ratings::ActiveModel {
        user_id: Set(user_id),
        movie_id: Set(movie_id),
        score: Set(score),
        created_at: Set(now),
        updated_at: Set(now),
    })
    .on_conflict(
        OnConflict::columns([ratings::Column::UserId, ratings::Column::MovieId])
            .update_columns([ratings::Column::Score, ratings::Column::UpdatedAt])
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;
    Ok(())
}

impl RatingRepository for DbRatingRepository {
    async fn scores_for_movie(&self, movie_id: Uuid) -> Result<Vec<i16>, CatalogError> {
        let scores = ratings::Entity::find()
            .select_only()
            .column(ratings::Column::Score)
            .filter(ratings::Column::MovieId.eq(movie_id))
            .into_tuple::<i16>()
            .all(&self.db)
            .await
            .context("list movie scores")?;
        Ok(scores)
    }

    async fn distribution(&self, movie_id: Uuid) -> Result<Distribution, CatalogError> {
        let groups: Vec<(i16, i64)> = ratings::Entity::find()
            .select_only()
            .column(ratings::Column::Score)
            .column_as(ratings::Column::Score.count(), "count")
            .filter(ratings::Column::MovieId.eq(movie_id))
            .group_by(ratings::Column::Score)
            .into_tuple()
            .all(&self.db)
            .await
            .context("rating distribution")?;
        Ok(Distribution::from_counts(
            groups
                .into_iter()
                .map(|(score, count)| (score, count.max(0) as u64)),
        ))
    }

    async fn find(&self, user_id: Uuid, movie_id: Uuid) -> Result<Option<Rating>, CatalogError> {
        let model = ratings::Entity::find_by_id((user_id, movie_id))
            .one(&self.db)
            .await
            .context("find rating")?;
        Ok(model.map(rating_from_model))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        sort_by: RatingSortBy,
        page: PageRequest,
    ) -> Result<Vec<RatedMovie>, CatalogError> {
        let (col, dir) = match sort_by {
            RatingSortBy::CreatedAt(dir) => (ratings::Column::CreatedAt, dir),
            RatingSortBy::Score(dir) => (ratings::Column::Score, dir),
        };
        let rows = ratings::Entity::find()
            .filter(ratings::Column::UserId.eq(user_id))
            .order_by(col, order(dir))
            .order_by_asc(ratings::Column::MovieId)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .find_also_related(movies::Entity)
            .all(&self.db)
            .await
            .context("list user ratings")?;
        Ok(rows
            .into_iter()
            .filter_map(|(rating, movie)| {
                movie.map(|movie| RatedMovie {
                    rating: rating_from_model(rating),
                    movie: movie_ref_from_model(movie),
                })
            })
            .collect())
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, CatalogError> {
        let total = ratings::Entity::find()
            .filter(ratings::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .context("count user ratings")?;
        Ok(total)
    }

    async fn movie_ids_by_user(
        &self,
        user_id: Uuid,
        min_score: Option<i16>,
    ) -> Result<Vec<Uuid>, CatalogError> {
        let mut query = ratings::Entity::find()
            .select_only()
            .column(ratings::Column::MovieId)
            .filter(ratings::Column::UserId.eq(user_id));
        if let Some(min) = min_score {
            query = query.filter(ratings::Column::Score.gte(min));
        }
        let ids = query
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .context("list rated movie ids")?;
        Ok(ids)
    }

    async fn create(&self, rating: &Rating) -> Result<(), CatalogError> {
        ratings::Entity::insert(ratings::ActiveModel {
            user_id: Set(rating.user_id),
            movie_id: Set(rating.movie_id),
            score: Set(rating.score),
            created_at: Set(rating.created_at),
            updated_at: Set(rating.updated_at),
        })
        .exec_without_returning(&self.db)
        .await
        .map_err(|e| map_write_err(e, CatalogError::RatingAlreadyExists, "create rating"))?;
        Ok(())
    }

    async fn update_score(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
        score: Score,
    ) -> Result<bool, CatalogError> {
        let result = ratings::Entity::update_many()
            .col_expr(ratings::Column::Score, Expr::value(score.get()))
            .col_expr(ratings::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(ratings::Column::UserId.eq(user_id))
            .filter(ratings::Column::MovieId.eq(movie_id))
            .exec(&self.db)
            .await
            .context("update rating score")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, user_id: Uuid, movie_id: Uuid) -> Result<bool, CatalogError> {
        let result = ratings::Entity::delete_many()
            .filter(ratings::Column::UserId.eq(user_id))
            .filter(ratings::Column::MovieId.eq(movie_id))
            .exec(&self.db)
            .await
            .context("delete rating")?;
        Ok(result.rows_affected > 0)
    }

    async fn count_all(&self) -> Result<u64, CatalogError> {
        let total = ratings::Entity::find()
            .count(&self.db)
            .await
            .context("count all ratings")?;
        Ok(total)
    }
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

fn review_from_model(model: reviews::Model) -> Review {
    Review {
        id: model.id,
        user_id: model.user_id,
        movie_id: model.movie_id,
        rating: model.rating,
        content: model.content,
        helpful_votes: model.helpful_votes,
        unhelpful_votes: model.unhelpful_votes,
        is_hidden: model.is_hidden,
        is_edited: model.is_edited,
        edited_at: model.edited_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn review_condition(filter: ReviewFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(movie_id) = filter.movie_id {
        cond = cond.add(reviews::Column::MovieId.eq(movie_id));
    }
    if let Some(user_id) = filter.user_id {
        cond = cond.add(reviews::Column::UserId.eq(user_id));
    }
    if let Some(hidden) = filter.is_hidden {
        cond = cond.add(reviews::Column::IsHidden.eq(hidden));
    }
    cond
}

impl ReviewRepository for DbReviewRepository {
    async fn count_for_movie(&self, movie_id: Uuid) -> Result<u64, CatalogError> {
        let total = reviews::Entity::find()
            .filter(reviews::Column::MovieId.eq(movie_id))
            .count(&self.db)
            .await
            .context("count movie reviews")?;
        Ok(total)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, CatalogError> {
        let model = reviews::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find review by id")?;
        Ok(model.map(review_from_model))
    }

    async fn list(
        &self,
        filter: ReviewFilter,
        sort_by: ReviewSortBy,
        page: PageRequest,
    ) -> Result<Vec<Review>, CatalogError> {
        let (col, dir) = match sort_by {
            ReviewSortBy::HelpfulVotes(dir) => (reviews::Column::HelpfulVotes, dir),
            ReviewSortBy::CreatedAt(dir) => (reviews::Column::CreatedAt, dir),
            ReviewSortBy::Rating(dir) => (reviews::Column::Rating, dir),
        };
        let models = reviews::Entity::find()
            .filter(review_condition(filter))
            .order_by(col, order(dir))
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_asc(reviews::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list reviews")?;
        Ok(models.into_iter().map(review_from_model).collect())
    }

    async fn count(&self, filter: ReviewFilter) -> Result<u64, CatalogError> {
        let total = reviews::Entity::find()
            .filter(review_condition(filter))
            .count(&self.db)
            .await
            .context("count reviews")?;
        Ok(total)
    }

    async fn movie_ids_by_author(&self, user_id: Uuid) -> Result<Vec<Uuid>, CatalogError> {
        let ids = reviews::Entity::find()
            .select_only()
            .column(reviews::Column::MovieId)
            .filter(reviews::Column::UserId.eq(user_id))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .context("list reviewed movie ids")?;
        Ok(ids)
    }

    async fn create_with_rating(&self, review: &Review) -> Result<(), CatalogError> {
        let review = review.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    reviews::Entity::insert(reviews::ActiveModel {
                        id: Set(review.id),
                        user_id: Set(review.user_id),
                        movie_id: Set(review.movie_id),
                        rating: Set(review.rating),
                        content: Set(review.content),
                        helpful_votes: Set(0),
                        unhelpful_votes: Set(0),
                        is_hidden: Set(false),
                        is_edited: Set(false),
                        edited_at: Set(None),
                        created_at: Set(review.created_at),
                        updated_at: Set(review.updated_at),
                    })
                    .exec_without_returning(txn)
                    .await?;
                    upsert_rating(txn, review.user_id, review.movie_id, review.rating).await
                })
            })
            .await
            .map_err(|e| map_txn_err(e, CatalogError::ReviewAlreadyExists, "create review"))
    }

    async fn update_with_rating(&self, review: &Review) -> Result<(), CatalogError> {
        let review = review.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    reviews::Entity::update_many()
                        .col_expr(reviews::Column::Rating, Expr::value(review.rating))
                        .col_expr(reviews::Column::Content, Expr::value(review.content))
                        .col_expr(reviews::Column::IsEdited, Expr::value(review.is_edited))
                        .col_expr(reviews::Column::EditedAt, Expr::value(review.edited_at))
                        .col_expr(reviews::Column::UpdatedAt, Expr::value(review.updated_at))
                        .filter(reviews::Column::Id.eq(review.id))
                        .exec(txn)
                        .await?;
                    upsert_rating(txn, review.user_id, review.movie_id, review.rating).await
                })
            })
            .await
            .context("update review")?;
        Ok(())
    }

    async fn delete_with_rating(&self, review: &Review) -> Result<bool, CatalogError> {
        let (id, user_id, movie_id) = (review.id, review.user_id, review.movie_id);
        let deleted = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    let result = reviews::Entity::delete_by_id(id).exec(txn).await?;
                    if result.rows_affected == 0 {
                        return Ok(false);
                    }
                    ratings::Entity::delete_many()
                        .filter(ratings::Column::UserId.eq(user_id))
                        .filter(ratings::Column::MovieId.eq(movie_id))
                        .exec(txn)
                        .await?;
                    Ok(true)
                })
            })
            .await
            .context("delete review")?;
        Ok(deleted)
    }

    async fn set_hidden(&self, id: Uuid, hidden: bool) -> Result<bool, CatalogError> {
        let result = reviews::Entity::update_many()
            .col_expr(reviews::Column::IsHidden, Expr::value(hidden))
            .filter(reviews::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set review visibility")?;
        Ok(result.rows_affected > 0)
    }

    async fn count_all(&self) -> Result<u64, CatalogError> {
        let total = reviews::Entity::find()
            .count(&self.db)
            .await
            .context("count all reviews")?;
        Ok(total)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<Review>, CatalogError> {
        let models = reviews::Entity::find()
            .order_by_desc(reviews::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recent reviews")?;
        Ok(models.into_iter().map(review_from_model).collect())
    }
}

// ── Review vote repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewVoteRepository {
    pub db: DatabaseConnection,
}

fn vote_counter(vote_type: VoteType) -> reviews::Column {
    match vote_type {
        VoteType::Helpful => reviews::Column::HelpfulVotes,
        VoteType::Unhelpful => reviews::Column::UnhelpfulVotes,
    }
}

impl ReviewVoteRepository for DbReviewVoteRepository {
    async fn create_and_count(&self, vote: &ReviewVote) -> Result<(), CatalogError> {
        let vote = vote.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    review_votes::Entity::insert(review_votes::ActiveModel {
                        user_id: Set(vote.user_id),
                        review_id: Set(vote.review_id),
                        vote_type: Set(vote.vote_type.as_str().to_owned()),
                        created_at: Set(vote.created_at),
                    })
                    .exec_without_returning(txn)
                    .await?;
                    let counter = vote_counter(vote.vote_type);
                    reviews::Entity::update_many()
                        .col_expr(counter, Expr::col(counter).add(1))
                        .filter(reviews::Column::Id.eq(vote.review_id))
                        .exec(txn)
                        .await?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| map_txn_err(e, CatalogError::VoteAlreadyExists, "create review vote"))
    }

    async fn delete_and_count(
        &self,
        user_id: Uuid,
        review_id: Uuid,
    ) -> Result<Option<VoteType>, CatalogError> {
        let removed = self
            .db
            .transaction::<_, Option<VoteType>, DbErr>(|txn| {
                Box::pin(async move {
                    let Some(vote) = review_votes::Entity::find_by_id((user_id, review_id))
                        .one(txn)
                        .await?
                    else {
                        return Ok(None);
                    };
                    let vote_type = VoteType::from_str_opt(&vote.vote_type).ok_or_else(|| {
                        DbErr::Custom(format!("unknown vote type {:?}", vote.vote_type))
                    })?;
                    review_votes::Entity::delete_by_id((user_id, review_id))
                        .exec(txn)
                        .await?;
                    let counter = vote_counter(vote_type);
                    reviews::Entity::update_many()
                        .col_expr(counter, Expr::col(counter).sub(1))
                        .filter(reviews::Column::Id.eq(review_id))
                        .filter(counter.gt(0))
                        .exec(txn)
                        .await?;
                    Ok(Some(vote_type))
                })
            })
            .await
            .context("delete review vote")?;
        Ok(removed)
    }
}

// ── Watchlist repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbWatchlistRepository {
    pub db: DatabaseConnection,
}

impl WatchlistRepository for DbWatchlistRepository {
    async fn list(&self, user_id: Uuid) -> Result<Vec<WatchlistEntry>, CatalogError> {
        let rows = watchlists::Entity::find()
            .filter(watchlists::Column::UserId.eq(user_id))
            .order_by_desc(watchlists::Column::AddedAt)
            .find_also_related(movies::Entity)
            .all(&self.db)
            .await
            .context("list watchlist")?;
        Ok(rows
            .into_iter()
            .filter_map(|(entry, movie)| {
                movie.map(|movie| WatchlistEntry {
                    movie: movie_ref_from_model(movie),
                    added_at: entry.added_at,
                })
            })
            .collect())
    }

    async fn movie_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, CatalogError> {
        let ids = watchlists::Entity::find()
            .select_only()
            .column(watchlists::Column::MovieId)
            .filter(watchlists::Column::UserId.eq(user_id))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .context("list watchlist movie ids")?;
        Ok(ids)
    }

    async fn add(&self, user_id: Uuid, movie_id: Uuid) -> Result<(), CatalogError> {
        watchlists::Entity::insert(watchlists::ActiveModel {
            user_id: Set(user_id),
            movie_id: Set(movie_id),
            added_at: Set(Utc::now()),
        })
        .exec_without_returning(&self.db)
        .await
        .map_err(|e| map_write_err(e, CatalogError::AlreadyInWatchlist, "add to watchlist"))?;
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, movie_id: Uuid) -> Result<bool, CatalogError> {
        let result = watchlists::Entity::delete_many()
            .filter(watchlists::Column::UserId.eq(user_id))
            .filter(watchlists::Column::MovieId.eq(movie_id))
            .exec(&self.db)
            .await
            .context("remove from watchlist")?;
        Ok(result.rows_affected > 0)
    }
}

// ── List repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbListRepository {
    pub db: DatabaseConnection,
}

fn list_condition(filter: ListFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(owner_id) = filter.owner_id {
        cond = cond.add(lists::Column::UserId.eq(owner_id));
    }
    if filter.public_only {
        cond = cond.add(lists::Column::IsPublic.eq(true));
    }
    cond
}

impl DbListRepository {
    /// Attach entries (newest first) to a batch of list rows.
    async fn with_entries(
        &self,
        models: Vec<lists::Model>,
    ) -> Result<Vec<MovieList>, CatalogError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let rows = list_movies::Entity::find()
            .filter(list_movies::Column::ListId.is_in(ids))
            .order_by_desc(list_movies::Column::AddedAt)
            .find_also_related(movies::Entity)
            .all(&self.db)
            .await
            .context("load list entries")?;
        let mut entries: HashMap<Uuid, Vec<ListEntry>> = HashMap::new();
        for (link, movie) in rows {
            if let Some(movie) = movie {
                entries.entry(link.list_id).or_default().push(ListEntry {
                    movie: movie_ref_from_model(movie),
                    added_at: link.added_at,
                });
            }
        }
        Ok(models
            .into_iter()
            .map(|model| MovieList {
                movies: entries.remove(&model.id).unwrap_or_default(),
                id: model.id,
                user_id: model.user_id,
                name: model.name,
                description: model.description,
                is_public: model.is_public,
                created_at: model.created_at,
                updated_at: model.updated_at,
            })
            .collect())
    }
}

impl ListRepository for DbListRepository {
    async fn create(&self, list: &MovieList) -> Result<(), CatalogError> {
        lists::ActiveModel {
            id: Set(list.id),
            user_id: Set(list.user_id),
            name: Set(list.name.clone()),
            description: Set(list.description.clone()),
            is_public: Set(list.is_public),
            created_at: Set(list.created_at),
            updated_at: Set(list.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create list")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MovieList>, CatalogError> {
        let Some(model) = lists::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find list by id")?
        else {
            return Ok(None);
        };
        Ok(self.with_entries(vec![model]).await?.pop())
    }

    async fn list(
        &self,
        filter: ListFilter,
        page: PageRequest,
    ) -> Result<Vec<MovieList>, CatalogError> {
        let models = lists::Entity::find()
            .filter(list_condition(filter))
            .order_by_desc(lists::Column::CreatedAt)
            .order_by_asc(lists::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list lists")?;
        self.with_entries(models).await
    }

    async fn count(&self, filter: ListFilter) -> Result<u64, CatalogError> {
        let total = lists::Entity::find()
            .filter(list_condition(filter))
            .count(&self.db)
            .await
            .context("count lists")?;
        Ok(total)
    }

    async fn update(&self, list: &MovieList) -> Result<(), CatalogError> {
        lists::Entity::update_many()
            .col_expr(lists::Column::Name, Expr::value(list.name.clone()))
            .col_expr(
                lists::Column::Description,
                Expr::value(list.description.clone()),
            )
            .col_expr(lists::Column::IsPublic, Expr::value(list.is_public))
            .col_expr(lists::Column::UpdatedAt, Expr::value(list.updated_at))
            .filter(lists::Column::Id.eq(list.id))
            .exec(&self.db)
            .await
            .context("update list")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        let result = lists::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete list")?;
        Ok(result.rows_affected > 0)
    }

    async fn add_movie(&self, list_id: Uuid, movie_id: Uuid) -> Result<(), CatalogError> {
        list_movies::Entity::insert(list_movies::ActiveModel {
            list_id: Set(list_id),
            movie_id: Set(movie_id),
            added_at: Set(Utc::now()),
        })
        .exec_without_returning(&self.db)
        .await
        .map_err(|e| map_write_err(e, CatalogError::MovieAlreadyInList, "add movie to list"))?;
        Ok(())
    }

    async fn remove_movie(&self, list_id: Uuid, movie_id: Uuid) -> Result<bool, CatalogError> {
        let result = list_movies::Entity::delete_many()
            .filter(list_movies::Column::ListId.eq(list_id))
            .filter(list_movies::Column::MovieId.eq(movie_id))
            .exec(&self.db)
            .await
            .context("remove movie from list")?;
        Ok(result.rows_affected > 0)
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, CatalogError> {
        let total = lists::Entity::find()
            .filter(lists::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .context("count user lists")?;
        Ok(total)
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        role: model.role.parse().unwrap_or_default(),
        bio: model.bio,
        avatar: model.avatar,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// Unique violations on `users` name the constraint (`users_email_key` or
/// `users_username_key`); tell the two apart for the conflict message.
fn map_user_insert_err(err: DbErr) -> CatalogError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("email") => {
            CatalogError::EmailTaken
        }
        Some(SqlErr::UniqueConstraintViolation(_)) => CatalogError::UsernameTaken,
        _ => CatalogError::Internal(anyhow::Error::new(err).context("create user")),
    }
}

fn user_condition(filter: &UserFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        cond = cond.add(
            Condition::any()
                .add(contains_ci(users::Column::Username, search))
                .add(contains_ci(users::Column::Email, search)),
        );
    }
    if let Some(role) = filter.role {
        cond = cond.add(users::Column::Role.eq(role.as_str()));
    }
    if let Some(is_active) = filter.is_active {
        cond = cond.add(users::Column::IsActive.eq(is_active));
    }
    cond
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, CatalogError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, CatalogError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, CatalogError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(|model| {
            let password_hash = model.password_hash.clone();
            Credentials {
                user: user_from_model(model),
                password_hash,
            }
        }))
    }

    async fn create(&self, user: &User, password_hash: &str) -> Result<(), CatalogError> {
        users::Entity::insert(users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(password_hash.to_owned()),
            role: Set(user.role.as_str().to_owned()),
            bio: Set(user.bio.clone()),
            avatar: Set(user.avatar.clone()),
            is_active: Set(user.is_active),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        })
        .exec_without_returning(&self.db)
        .await
        .map_err(map_user_insert_err)?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        username: Option<&str>,
        bio: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<bool, CatalogError> {
        let Some(model) = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user for profile update")?
        else {
            return Ok(false);
        };
        let mut am = model.into_active_model();
        if let Some(username) = username {
            am.username = Set(username.to_owned());
        }
        if let Some(bio) = bio {
            am.bio = Set(Some(bio.to_owned()));
        }
        if let Some(avatar) = avatar {
            am.avatar = Set(Some(avatar.to_owned()));
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.db)
            .await
            .map_err(|e| map_write_err(e, CatalogError::UsernameTaken, "update user profile"))?;
        Ok(true)
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> Result<Vec<User>, CatalogError> {
        let models = users::Entity::find()
            .filter(user_condition(filter))
            .order_by_desc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, CatalogError> {
        let total = users::Entity::find()
            .filter(user_condition(filter))
            .count(&self.db)
            .await
            .context("count users")?;
        Ok(total)
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<bool, CatalogError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Role, Expr::value(role.as_str()))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set user role")?;
        Ok(result.rows_affected > 0)
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<bool, CatalogError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::IsActive, Expr::value(is_active))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set user active flag")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        // Ratings, reviews, watchlist, lists and votes cascade; the vote
        // counters on other users' reviews do not.
        let deleted = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    let votes = review_votes::Entity::find()
                        .filter(review_votes::Column::UserId.eq(id))
                        .all(txn)
                        .await?;
                    for vote in votes {
                        let Some(vote_type) = VoteType::from_str_opt(&vote.vote_type) else {
                            continue;
                        };
                        let counter = vote_counter(vote_type);
                        reviews::Entity::update_many()
                            .col_expr(counter, Expr::col(counter).sub(1))
                            .filter(reviews::Column::Id.eq(vote.review_id))
                            .filter(counter.gt(0))
                            .exec(txn)
                            .await?;
                    }
                    let result = users::Entity::delete_by_id(id).exec(txn).await?;
                    Ok(result.rows_affected > 0)
                })
            })
            .await
            .context("delete user")?;
        Ok(deleted)
    }

    async fn count_all(&self) -> Result<u64, CatalogError> {
        let total = users::Entity::find()
            .count(&self.db)
            .await
            .context("count all users")?;
        Ok(total)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<User>, CatalogError> {
        let models = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recent users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn stats(&self, id: Uuid) -> Result<UserStats, CatalogError> {
        let total_reviews = reviews::Entity::find()
            .filter(reviews::Column::UserId.eq(id))
            .count(&self.db)
            .await
            .context("count user reviews")?;
        let total_ratings = ratings::Entity::find()
            .filter(ratings::Column::UserId.eq(id))
            .count(&self.db)
            .await
            .context("count user ratings")?;
        let total_lists = lists::Entity::find()
            .filter(lists::Column::UserId.eq(id))
            .count(&self.db)
            .await
            .context("count user lists")?;
        Ok(UserStats {
            total_reviews,
            total_ratings,
            total_lists,
        })
    }
}

// ── Catalog repository (genres, actors, directors) ───────────────────────────

#[derive(Clone)]
pub struct DbCatalogRepository {
    pub db: DatabaseConnection,
}

fn genre_from_model(model: genres::Model) -> Genre {
    Genre {
        id: model.id,
        name: model.name,
        slug: model.slug,
        description: model.description,
    }
}

fn person_from_actor(model: actors::Model) -> Person {
    Person {
        id: model.id,
        name: model.name,
        birth_date: model.birth_date,
        nationality: model.nationality,
        bio: model.bio,
        photo_url: model.photo_url,
    }
}

fn person_from_director(model: directors::Model) -> Person {
    Person {
        id: model.id,
        name: model.name,
        birth_date: model.birth_date,
        nationality: model.nationality,
        bio: model.bio,
        photo_url: model.photo_url,
    }
}

impl CatalogRepository for DbCatalogRepository {
    async fn list_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let models = genres::Entity::find()
            .order_by_asc(genres::Column::Name)
            .all(&self.db)
            .await
            .context("list genres")?;
        Ok(models.into_iter().map(genre_from_model).collect())
    }

    async fn find_genre(&self, id: Uuid) -> Result<Option<Genre>, CatalogError> {
        let model = genres::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find genre by id")?;
        Ok(model.map(genre_from_model))
    }

    async fn create_genre(&self, genre: &Genre) -> Result<(), CatalogError> {
        genres::Entity::insert(genres::ActiveModel {
            id: Set(genre.id),
            name: Set(genre.name.clone()),
            slug: Set(genre.slug.clone()),
            description: Set(genre.description.clone()),
            created_at: Set(Utc::now()),
        })
        .exec_without_returning(&self.db)
        .await
        .map_err(|e| map_write_err(e, CatalogError::GenreAlreadyExists, "create genre"))?;
        Ok(())
    }

    async fn create_person(&self, kind: PersonKind, person: &Person) -> Result<(), CatalogError> {
        let now = Utc::now();
        match kind {
            PersonKind::Actor => {
                actors::Entity::insert(actors::ActiveModel {
                    id: Set(person.id),
                    name: Set(person.name.clone()),
                    birth_date: Set(person.birth_date),
                    nationality: Set(person.nationality.clone()),
                    bio: Set(person.bio.clone()),
                    photo_url: Set(person.photo_url.clone()),
                    created_at: Set(now),
                })
                .exec_without_returning(&self.db)
                .await
                .context("create actor")?;
            }
            PersonKind::Director => {
                directors::Entity::insert(directors::ActiveModel {
                    id: Set(person.id),
                    name: Set(person.name.clone()),
                    birth_date: Set(person.birth_date),
                    nationality: Set(person.nationality.clone()),
                    bio: Set(person.bio.clone()),
                    photo_url: Set(person.photo_url.clone()),
                    created_at: Set(now),
                })
                .exec_without_returning(&self.db)
                .await
                .context("create director")?;
            }
        }
        Ok(())
    }

    async fn search_people(
        &self,
        kind: PersonKind,
        needle: &str,
        limit: Option<u64>,
    ) -> Result<Vec<Person>, CatalogError> {
        let people = match kind {
            PersonKind::Actor => {
                let mut query = actors::Entity::find()
                    .filter(contains_ci(actors::Column::Name, needle))
                    .order_by_asc(actors::Column::Name);
                if let Some(limit) = limit {
                    query = query.limit(limit);
                }
                query
                    .all(&self.db)
                    .await
                    .context("search actors")?
                    .into_iter()
                    .map(person_from_actor)
                    .collect()
            }
            PersonKind::Director => {
                let mut query = directors::Entity::find()
                    .filter(contains_ci(directors::Column::Name, needle))
                    .order_by_asc(directors::Column::Name);
                if let Some(limit) = limit {
                    query = query.limit(limit);
                }
                query
                    .all(&self.db)
                    .await
                    .context("search directors")?
                    .into_iter()
                    .map(person_from_director)
                    .collect()
            }
        };
        Ok(people)
    }

    async fn search_genres(&self, needle: &str, limit: u64) -> Result<Vec<Genre>, CatalogError> {
        let models = genres::Entity::find()
            .filter(contains_ci(genres::Column::Name, needle))
            .order_by_asc(genres::Column::Name)
            .limit(limit)
            .all(&self.db)
            .await
            .context("search genres")?;
        Ok(models.into_iter().map(genre_from_model).collect())
    }

    async fn existing_ids(&self, kind: RefKind, ids: &[Uuid]) -> Result<Vec<Uuid>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = ids.to_vec();
        let found = match kind {
            RefKind::Genre => {
                genres::Entity::find()
                    .select_only()
                    .column(genres::Column::Id)
                    .filter(genres::Column::Id.is_in(ids))
                    .into_tuple::<Uuid>()
                    .all(&self.db)
                    .await
            }
            RefKind::Actor => {
                actors::Entity::find()
                    .select_only()
                    .column(actors::Column::Id)
                    .filter(actors::Column::Id.is_in(ids))
                    .into_tuple::<Uuid>()
                    .all(&self.db)
                    .await
            }
            RefKind::Director => {
                directors::Entity::find()
                    .select_only()
                    .column(directors::Column::Id)
                    .filter(directors::Column::Id.is_in(ids))
                    .into_tuple::<Uuid>()
                    .all(&self.db)
                    .await
            }
        }
        .context("check reference ids")?;
        Ok(found)
    }
}
