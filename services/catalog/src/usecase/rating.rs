use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use filmrate_domain::pagination::{PageRequest, Paginated};
use filmrate_domain::rating::{Distribution, RatingSummary};

use crate::domain::repository::{MovieRepository, RatingRepository, ReviewRepository};
use crate::domain::types::{RatedMovie, Rating, RatingSortBy};
use crate::domain::validate;
use crate::error::CatalogError;

/// Recompute a movie's derived rating fields from its rating rows and its
/// review count, and write them back in one update.
///
/// Store failures are prefixed with "Error calculating average rating"; the
/// movie keeps its previous values when any step fails.
pub async fn recalculate_movie_rating<M, R, V>(
    movies: &M,
    ratings: &R,
    reviews: &V,
    movie_id: Uuid,
) -> Result<RatingSummary, CatalogError>
where
    M: MovieRepository,
    R: RatingRepository,
    V: ReviewRepository,
{
    let recalculate = async {
        let scores = ratings.scores_for_movie(movie_id).await?;
        let summary = RatingSummary::from_scores(&scores);
        let total_reviews = reviews.count_for_movie(movie_id).await?;
        movies
            .update_rating_summary(movie_id, summary, total_reviews)
            .await?;
        debug!(
            %movie_id,
            average_rating = summary.average_rating,
            total_ratings = summary.total_ratings,
            total_reviews,
            "recalculated movie rating"
        );
        Ok::<_, CatalogError>(summary)
    };
    recalculate
        .await
        .map_err(|e| e.context("Error calculating average rating"))
}

// ── GetRatingDistribution ────────────────────────────────────────────────────

pub struct GetRatingDistributionUseCase<R: RatingRepository> {
    pub ratings: R,
}

impl<R: RatingRepository> GetRatingDistributionUseCase<R> {
    pub async fn execute(&self, movie_id: Uuid) -> Result<Distribution, CatalogError> {
        self.ratings.distribution(movie_id).await
    }
}

// ── GetUserRating ────────────────────────────────────────────────────────────

pub struct GetUserRatingUseCase<R: RatingRepository> {
    pub ratings: R,
}

impl<R: RatingRepository> GetUserRatingUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, movie_id: Uuid) -> Result<Rating, CatalogError> {
        self.ratings
            .find(user_id, movie_id)
            .await?
            .ok_or(CatalogError::RatingNotFound)
    }
}

// ── GetUserRatings ───────────────────────────────────────────────────────────

pub struct GetUserRatingsUseCase<R: RatingRepository> {
    pub ratings: R,
}

impl<R: RatingRepository> GetUserRatingsUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        sort_by: RatingSortBy,
        page: PageRequest,
    ) -> Result<Paginated<RatedMovie>, CatalogError> {
        let items = self.ratings.list_by_user(user_id, sort_by, page).await?;
        let total = self.ratings.count_by_user(user_id).await?;
        Ok(Paginated::new(items, page, total))
    }
}

// ── GetRatingStats ───────────────────────────────────────────────────────────

/// Stored aggregate plus the live distribution.
#[derive(Debug, Clone)]
pub struct RatingStats {
    pub average_rating: f64,
    pub total_ratings: i64,
    pub distribution: Distribution,
}

pub struct GetRatingStatsUseCase<M: MovieRepository, R: RatingRepository> {
    pub movies: M,
    pub ratings: R,
}

impl<M: MovieRepository, R: RatingRepository> GetRatingStatsUseCase<M, R> {
    pub async fn execute(&self, movie_id: Uuid) -> Result<RatingStats, CatalogError> {
        let movie = self
            .movies
            .find_by_id(movie_id)
            .await?
            .ok_or(CatalogError::MovieNotFound)?;
        let distribution = self.ratings.distribution(movie_id).await?;
        Ok(RatingStats {
            average_rating: movie.average_rating,
            total_ratings: movie.total_ratings,
            distribution,
        })
    }
}

// ── CreateRating ─────────────────────────────────────────────────────────────

pub struct CreateRatingUseCase<M: MovieRepository, R: RatingRepository, V: ReviewRepository> {
    pub movies: M,
    pub ratings: R,
    pub reviews: V,
}

impl<M: MovieRepository, R: RatingRepository, V: ReviewRepository> CreateRatingUseCase<M, R, V> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
        score: i64,
    ) -> Result<Rating, CatalogError> {
        let score = validate::required_score("score", score)?;

        match self.movies.find_by_id(movie_id).await? {
            Some(movie) if movie.is_active => {}
            _ => return Err(CatalogError::MovieNotFound),
        }

        let now = Utc::now();
        let rating = Rating {
            user_id,
            movie_id,
            score: score.get(),
            created_at: now,
            updated_at: now,
        };
        self.ratings.create(&rating).await?;
        info!(%user_id, %movie_id, score = score.get(), "rating created");

        recalculate_movie_rating(&self.movies, &self.ratings, &self.reviews, movie_id).await?;
        Ok(rating)
    }
}

// ── UpdateRating ─────────────────────────────────────────────────────────────

pub struct UpdateRatingUseCase<M: MovieRepository, R: RatingRepository, V: ReviewRepository> {
    pub movies: M,
    pub ratings: R,
    pub reviews: V,
}

impl<M: MovieRepository, R: RatingRepository, V: ReviewRepository> UpdateRatingUseCase<M, R, V> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
        score: i64,
    ) -> Result<Rating, CatalogError> {
        let score = validate::required_score("score", score)?;

        if !self.ratings.update_score(user_id, movie_id, score).await? {
            return Err(CatalogError::RatingNotFound);
        }
        info!(%user_id, %movie_id, score = score.get(), "rating updated");

        recalculate_movie_rating(&self.movies, &self.ratings, &self.reviews, movie_id).await?;
        self.ratings
            .find(user_id, movie_id)
            .await?
            .ok_or(CatalogError::RatingNotFound)
    }
}

// ── DeleteRating ─────────────────────────────────────────────────────────────

pub struct DeleteRatingUseCase<M: MovieRepository, R: RatingRepository, V: ReviewRepository> {
    pub movies: M,
    pub ratings: R,
    pub reviews: V,
}

impl<M: MovieRepository, R: RatingRepository, V: ReviewRepository> DeleteRatingUseCase<M, R, V> {
    pub async fn execute(&self, user_id: Uuid, movie_id: Uuid) -> Result<(), CatalogError> {
        if !self.ratings.delete(user_id, movie_id).await? {
            return Err(CatalogError::RatingNotFound);
        }
        info!(%user_id, %movie_id, "rating deleted");

        recalculate_movie_rating(&self.movies, &self.ratings, &self.reviews, movie_id).await?;
        Ok(())
    }
}
