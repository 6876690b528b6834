//! Candidate movie lists derived from genre/director overlap and the
//! materialized popularity fields.

use std::collections::BTreeSet;

use tracing::debug;
use uuid::Uuid;

use crate::domain::filter::{MovieFilter, MovieQuery, MovieSort};
use crate::domain::repository::{
    CatalogRepository, MovieRepository, RatingRepository, WatchlistRepository,
};
use crate::domain::types::{Homepage, Movie};
use crate::error::CatalogError;

pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_MIN_RATINGS: i64 = 10;
pub const BY_GENRE_LIMIT: u64 = 20;
/// Scores at or above this count as "liked" for personalization.
pub const LIKED_MIN_SCORE: i16 = 7;
pub const PERSONALIZED_MIN_RATINGS: i64 = 5;

pub async fn trending<M: MovieRepository>(
    movies: &M,
    limit: u64,
) -> Result<Vec<Movie>, CatalogError> {
    movies
        .find(&MovieQuery::top(
            MovieFilter::active(),
            MovieSort::Trending,
            limit,
        ))
        .await
}

pub async fn top_rated<M: MovieRepository>(
    movies: &M,
    limit: u64,
    min_ratings: i64,
) -> Result<Vec<Movie>, CatalogError> {
    let filter = MovieFilter::active().min_total_ratings(min_ratings);
    movies
        .find(&MovieQuery::top(filter, MovieSort::TopRated, limit))
        .await
}

pub async fn recently_added<M: MovieRepository>(
    movies: &M,
    limit: u64,
) -> Result<Vec<Movie>, CatalogError> {
    movies
        .find(&MovieQuery::top(
            MovieFilter::active(),
            MovieSort::newest(),
            limit,
        ))
        .await
}

/// Genre-affinity suggestions from the user's liked movies. Users with no
/// liked movies get the trending list instead.
pub async fn personalized<M, R, W>(
    movies: &M,
    ratings: &R,
    watchlist: &W,
    user_id: Uuid,
    limit: u64,
) -> Result<Vec<Movie>, CatalogError>
where
    M: MovieRepository,
    R: RatingRepository,
    W: WatchlistRepository,
{
    let liked = ratings
        .movie_ids_by_user(user_id, Some(LIKED_MIN_SCORE))
        .await?;
    if liked.is_empty() {
        debug!(%user_id, "no liked movies, falling back to trending");
        return trending(movies, limit).await;
    }

    let genres: BTreeSet<Uuid> = movies
        .find_by_ids(&liked)
        .await?
        .iter()
        .flat_map(Movie::genre_ids)
        .collect();
    let rated = ratings.movie_ids_by_user(user_id, None).await?;
    let watchlisted = watchlist.movie_ids(user_id).await?;

    let filter = MovieFilter::active()
        .any_genre(genres.into_iter().collect())
        .exclude(rated)
        .exclude(watchlisted)
        .min_total_ratings(PERSONALIZED_MIN_RATINGS);
    movies
        .find(&MovieQuery::top(filter, MovieSort::TopRated, limit))
        .await
}

// ── GetTrending ──────────────────────────────────────────────────────────────

pub struct GetTrendingMoviesUseCase<M: MovieRepository> {
    pub movies: M,
}

impl<M: MovieRepository> GetTrendingMoviesUseCase<M> {
    pub async fn execute(&self, limit: u64) -> Result<Vec<Movie>, CatalogError> {
        trending(&self.movies, limit).await
    }
}

// ── GetTopRated ──────────────────────────────────────────────────────────────

pub struct GetTopRatedMoviesUseCase<M: MovieRepository> {
    pub movies: M,
}

impl<M: MovieRepository> GetTopRatedMoviesUseCase<M> {
    pub async fn execute(&self, limit: u64, min_ratings: i64) -> Result<Vec<Movie>, CatalogError> {
        top_rated(&self.movies, limit, min_ratings).await
    }
}

// ── GetSimilar ───────────────────────────────────────────────────────────────

pub struct GetSimilarMoviesUseCase<M: MovieRepository> {
    pub movies: M,
}

impl<M: MovieRepository> GetSimilarMoviesUseCase<M> {
    pub async fn execute(&self, movie_id: Uuid, limit: u64) -> Result<Vec<Movie>, CatalogError> {
        let movie = self
            .movies
            .find_by_id(movie_id)
            .await?
            .ok_or(CatalogError::MovieNotFound)?;
        let filter = MovieFilter::active()
            .any_genre(movie.genre_ids())
            .exclude([movie.id]);
        self.movies
            .find(&MovieQuery::top(filter, MovieSort::default(), limit))
            .await
    }
}

// ── GetPersonalized ──────────────────────────────────────────────────────────

pub struct GetPersonalizedUseCase<M: MovieRepository, R: RatingRepository, W: WatchlistRepository>
{
    pub movies: M,
    pub ratings: R,
    pub watchlist: W,
}

impl<M: MovieRepository, R: RatingRepository, W: WatchlistRepository>
    GetPersonalizedUseCase<M, R, W>
{
    pub async fn execute(&self, user_id: Uuid, limit: u64) -> Result<Vec<Movie>, CatalogError> {
        personalized(&self.movies, &self.ratings, &self.watchlist, user_id, limit).await
    }
}

// ── GetBecauseYouWatched ─────────────────────────────────────────────────────

pub struct GetBecauseYouWatchedUseCase<M: MovieRepository, R: RatingRepository> {
    pub movies: M,
    pub ratings: R,
}

impl<M: MovieRepository, R: RatingRepository> GetBecauseYouWatchedUseCase<M, R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
        limit: u64,
    ) -> Result<Vec<Movie>, CatalogError> {
        let movie = self
            .movies
            .find_by_id(movie_id)
            .await?
            .ok_or(CatalogError::MovieNotFound)?;
        let rated = self.ratings.movie_ids_by_user(user_id, None).await?;
        let filter = MovieFilter::active()
            .genre_or_director(movie.genre_ids(), movie.director_ids())
            .exclude(rated)
            .exclude([movie.id]);
        self.movies
            .find(&MovieQuery::top(filter, MovieSort::default(), limit))
            .await
    }
}

// ── GetHomepage ──────────────────────────────────────────────────────────────

pub struct GetHomepageUseCase<M: MovieRepository, R: RatingRepository, W: WatchlistRepository> {
    pub movies: M,
    pub ratings: R,
    pub watchlist: W,
}

impl<M: MovieRepository, R: RatingRepository, W: WatchlistRepository> GetHomepageUseCase<M, R, W> {
    pub async fn execute(&self, user_id: Option<Uuid>) -> Result<Homepage, CatalogError> {
        let trending = trending(&self.movies, DEFAULT_LIMIT).await?;
        let top_rated = top_rated(&self.movies, DEFAULT_LIMIT, DEFAULT_MIN_RATINGS).await?;
        let recently_added = recently_added(&self.movies, DEFAULT_LIMIT).await?;
        let for_you = match user_id {
            Some(user_id) => Some(
                personalized(
                    &self.movies,
                    &self.ratings,
                    &self.watchlist,
                    user_id,
                    DEFAULT_LIMIT,
                )
                .await?,
            ),
            None => None,
        };
        Ok(Homepage {
            trending,
            top_rated,
            recently_added,
            for_you,
        })
    }
}

// ── GetMoviesByGenre ─────────────────────────────────────────────────────────

pub struct GetMoviesByGenreUseCase<M: MovieRepository, C: CatalogRepository> {
    pub movies: M,
    pub catalog: C,
}

impl<M: MovieRepository, C: CatalogRepository> GetMoviesByGenreUseCase<M, C> {
    pub async fn execute(
        &self,
        genre_id: Uuid,
        sort: MovieSort,
        limit: u64,
    ) -> Result<Vec<Movie>, CatalogError> {
        if self.catalog.find_genre(genre_id).await?.is_none() {
            return Err(CatalogError::GenreNotFound);
        }
        let filter = MovieFilter::active().any_genre(vec![genre_id]);
        self.movies
            .find(&MovieQuery::top(filter, sort, limit))
            .await
    }
}
