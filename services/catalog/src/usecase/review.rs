use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use filmrate_core::error::FieldError;
use filmrate_domain::pagination::{PageRequest, Paginated, Sort};
use filmrate_domain::vote::VoteType;

use crate::domain::repository::{
    MovieRepository, RatingRepository, ReviewRepository, ReviewVoteRepository,
};
use crate::domain::types::{Review, ReviewFilter, ReviewSortBy, ReviewVote};
use crate::domain::validate;
use crate::error::CatalogError;
use crate::usecase::rating::recalculate_movie_rating;

async fn list_page<V: ReviewRepository>(
    reviews: &V,
    filter: ReviewFilter,
    sort_by: ReviewSortBy,
    page: PageRequest,
) -> Result<Paginated<Review>, CatalogError> {
    let items = reviews.list(filter, sort_by, page).await?;
    let total = reviews.count(filter).await?;
    Ok(Paginated::new(items, page, total))
}

// ── CreateReview ─────────────────────────────────────────────────────────────

pub struct CreateReviewInput {
    pub rating: i64,
    pub content: String,
}

pub struct CreateReviewUseCase<M: MovieRepository, R: RatingRepository, V: ReviewRepository> {
    pub movies: M,
    pub ratings: R,
    pub reviews: V,
}

impl<M: MovieRepository, R: RatingRepository, V: ReviewRepository> CreateReviewUseCase<M, R, V> {
    /// Insert the review and set the author's rating to the review's score.
    pub async fn execute(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
        input: CreateReviewInput,
    ) -> Result<Review, CatalogError> {
        let mut errors = Vec::new();
        let rating = validate::score("rating", input.rating, &mut errors);
        validate::review_content(&input.content, &mut errors);
        validate::into_result(errors)?;
        let rating =
            rating.ok_or_else(|| CatalogError::invalid("rating", validate::SCORE_MESSAGE))?;

        match self.movies.find_by_id(movie_id).await? {
            Some(movie) if movie.is_active => {}
            _ => return Err(CatalogError::MovieNotFound),
        }

        let now = Utc::now();
        let review = Review {
            id: Uuid::now_v7(),
            user_id,
            movie_id,
            rating: rating.get(),
            content: input.content.trim().to_owned(),
            helpful_votes: 0,
            unhelpful_votes: 0,
            is_hidden: false,
            is_edited: false,
            edited_at: None,
            created_at: now,
            updated_at: now,
        };
        self.reviews.create_with_rating(&review).await?;
        info!(review_id = %review.id, %user_id, %movie_id, rating = review.rating, "review created");

        recalculate_movie_rating(&self.movies, &self.ratings, &self.reviews, movie_id).await?;
        Ok(review)
    }
}

// ── GetReview ────────────────────────────────────────────────────────────────

pub struct GetReviewUseCase<V: ReviewRepository> {
    pub reviews: V,
}

impl<V: ReviewRepository> GetReviewUseCase<V> {
    /// Hidden reviews are only returned when `include_hidden` is set.
    pub async fn execute(&self, review_id: Uuid, include_hidden: bool) -> Result<Review, CatalogError> {
        match self.reviews.find_by_id(review_id).await? {
            Some(review) if include_hidden || !review.is_hidden => Ok(review),
            _ => Err(CatalogError::ReviewNotFound),
        }
    }
}

// ── ListMovieReviews ─────────────────────────────────────────────────────────

pub struct ListMovieReviewsUseCase<M: MovieRepository, V: ReviewRepository> {
    pub movies: M,
    pub reviews: V,
}

impl<M: MovieRepository, V: ReviewRepository> ListMovieReviewsUseCase<M, V> {
    pub async fn execute(
        &self,
        movie_id: Uuid,
        sort_by: ReviewSortBy,
        page: PageRequest,
    ) -> Result<Paginated<Review>, CatalogError> {
        if self.movies.find_by_id(movie_id).await?.is_none() {
            return Err(CatalogError::MovieNotFound);
        }
        let filter = ReviewFilter {
            movie_id: Some(movie_id),
            is_hidden: Some(false),
            ..ReviewFilter::default()
        };
        list_page(&self.reviews, filter, sort_by, page).await
    }
}

// ── ListUserReviews ──────────────────────────────────────────────────────────

pub struct ListUserReviewsUseCase<V: ReviewRepository> {
    pub reviews: V,
}

impl<V: ReviewRepository> ListUserReviewsUseCase<V> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Paginated<Review>, CatalogError> {
        let filter = ReviewFilter {
            user_id: Some(user_id),
            is_hidden: Some(false),
            ..ReviewFilter::default()
        };
        list_page(
            &self.reviews,
            filter,
            ReviewSortBy::CreatedAt(Sort::Desc),
            page,
        )
        .await
    }
}

// ── ListReviews (admin) ──────────────────────────────────────────────────────

pub struct ListReviewsUseCase<V: ReviewRepository> {
    pub reviews: V,
}

impl<V: ReviewRepository> ListReviewsUseCase<V> {
    pub async fn execute(
        &self,
        filter: ReviewFilter,
        page: PageRequest,
    ) -> Result<Paginated<Review>, CatalogError> {
        list_page(
            &self.reviews,
            filter,
            ReviewSortBy::CreatedAt(Sort::Desc),
            page,
        )
        .await
    }
}

// ── UpdateReview ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct UpdateReviewInput {
    pub rating: Option<i64>,
    pub content: Option<String>,
}

pub struct UpdateReviewUseCase<M: MovieRepository, R: RatingRepository, V: ReviewRepository> {
    pub movies: M,
    pub ratings: R,
    pub reviews: V,
}

impl<M: MovieRepository, R: RatingRepository, V: ReviewRepository> UpdateReviewUseCase<M, R, V> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        review_id: Uuid,
        input: UpdateReviewInput,
    ) -> Result<Review, CatalogError> {
        let mut errors = Vec::new();
        if input.rating.is_none() && input.content.is_none() {
            errors.push(FieldError::new("body", "Provide a rating or content to update"));
        }
        let rating = match input.rating {
            Some(rating) => validate::score("rating", rating, &mut errors),
            None => None,
        };
        if let Some(content) = &input.content {
            validate::review_content(content, &mut errors);
        }
        validate::into_result(errors)?;

        let mut review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or(CatalogError::ReviewNotFound)?;
        if review.user_id != user_id {
            return Err(CatalogError::Forbidden);
        }

        let rating_changed = rating.is_some_and(|r| r.get() != review.rating);
        if let Some(rating) = rating {
            review.rating = rating.get();
        }
        if let Some(content) = input.content {
            review.content = content.trim().to_owned();
        }
        let now = Utc::now();
        review.is_edited = true;
        review.edited_at = Some(now);
        review.updated_at = now;

        self.reviews.update_with_rating(&review).await?;
        info!(%review_id, %user_id, rating_changed, "review updated");

        if rating_changed {
            recalculate_movie_rating(&self.movies, &self.ratings, &self.reviews, review.movie_id)
                .await?;
        }
        Ok(review)
    }
}

// ── DeleteReview ─────────────────────────────────────────────────────────────

pub struct DeleteReviewUseCase<M: MovieRepository, R: RatingRepository, V: ReviewRepository> {
    pub movies: M,
    pub ratings: R,
    pub reviews: V,
}

impl<M: MovieRepository, R: RatingRepository, V: ReviewRepository> DeleteReviewUseCase<M, R, V> {
    /// Owners delete their own reviews; admins may delete any. The author's
    /// rating for the movie is removed with the review.
    pub async fn execute(
        &self,
        actor_id: Uuid,
        is_admin: bool,
        review_id: Uuid,
    ) -> Result<(), CatalogError> {
        let review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or(CatalogError::ReviewNotFound)?;
        if review.user_id != actor_id && !is_admin {
            return Err(CatalogError::Forbidden);
        }
        if !self.reviews.delete_with_rating(&review).await? {
            return Err(CatalogError::ReviewNotFound);
        }
        info!(%review_id, %actor_id, is_admin, "review deleted");

        recalculate_movie_rating(&self.movies, &self.ratings, &self.reviews, review.movie_id)
            .await?;
        Ok(())
    }
}

// ── SetReviewVisibility (admin) ──────────────────────────────────────────────

pub struct SetReviewVisibilityUseCase<V: ReviewRepository> {
    pub reviews: V,
}

impl<V: ReviewRepository> SetReviewVisibilityUseCase<V> {
    pub async fn execute(&self, review_id: Uuid, hidden: bool) -> Result<Review, CatalogError> {
        if !self.reviews.set_hidden(review_id, hidden).await? {
            return Err(CatalogError::ReviewNotFound);
        }
        info!(%review_id, hidden, "review visibility changed");
        self.reviews
            .find_by_id(review_id)
            .await?
            .ok_or(CatalogError::ReviewNotFound)
    }
}

// ── VoteReview ───────────────────────────────────────────────────────────────

pub struct VoteReviewUseCase<V: ReviewRepository, T: ReviewVoteRepository> {
    pub reviews: V,
    pub votes: T,
}

impl<V: ReviewRepository, T: ReviewVoteRepository> VoteReviewUseCase<V, T> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        review_id: Uuid,
        vote_type: VoteType,
    ) -> Result<Review, CatalogError> {
        let review = match self.reviews.find_by_id(review_id).await? {
            Some(review) if !review.is_hidden => review,
            _ => return Err(CatalogError::ReviewNotFound),
        };
        if review.user_id == user_id {
            return Err(CatalogError::CannotVoteOwnReview);
        }
        let vote = ReviewVote {
            user_id,
            review_id,
            vote_type,
            created_at: Utc::now(),
        };
        self.votes.create_and_count(&vote).await?;
        info!(%review_id, %user_id, vote_type = vote_type.as_str(), "review vote recorded");

        self.reviews
            .find_by_id(review_id)
            .await?
            .ok_or(CatalogError::ReviewNotFound)
    }
}

// ── RemoveVote ───────────────────────────────────────────────────────────────

pub struct RemoveVoteUseCase<V: ReviewRepository, T: ReviewVoteRepository> {
    pub reviews: V,
    pub votes: T,
}

impl<V: ReviewRepository, T: ReviewVoteRepository> RemoveVoteUseCase<V, T> {
    pub async fn execute(&self, user_id: Uuid, review_id: Uuid) -> Result<Review, CatalogError> {
        let removed = self
            .votes
            .delete_and_count(user_id, review_id)
            .await?
            .ok_or(CatalogError::VoteNotFound)?;
        info!(%review_id, %user_id, vote_type = removed.as_str(), "review vote removed");

        self.reviews
            .find_by_id(review_id)
            .await?
            .ok_or(CatalogError::ReviewNotFound)
    }
}
