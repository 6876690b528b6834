#![allow(async_fn_in_trait)]

use uuid::Uuid;

use filmrate_domain::pagination::PageRequest;
use filmrate_domain::rating::{Distribution, RatingSummary, Score};
use filmrate_domain::user::UserRole;
use filmrate_domain::vote::VoteType;

use crate::domain::filter::{MovieFilter, MovieQuery};
use crate::domain::types::{
    Credentials, Genre, ListFilter, Movie, MovieList, MovieUpdate, NewMovie, Person, PersonKind,
    RatedMovie, Rating, RatingSortBy, RefKind, Review, ReviewFilter, ReviewSortBy, ReviewVote,
    User, UserFilter, UserStats, WatchlistEntry, YearRange,
};
use crate::error::CatalogError;

/// Repository for movies and their derived rating fields.
pub trait MovieRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>, CatalogError>;

    /// Movies whose id is in `ids`, in no particular order.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Movie>, CatalogError>;

    async fn find(&self, query: &MovieQuery) -> Result<Vec<Movie>, CatalogError>;

    async fn count(&self, filter: &MovieFilter) -> Result<u64, CatalogError>;

    async fn increment_views(&self, id: Uuid) -> Result<(), CatalogError>;

    /// Write the aggregator output back in a single update.
    async fn update_rating_summary(
        &self,
        id: Uuid,
        summary: RatingSummary,
        total_reviews: u64,
    ) -> Result<(), CatalogError>;

    /// Insert the movie and its reference rows atomically.
    async fn create(&self, movie: &NewMovie) -> Result<(), CatalogError>;

    /// Returns `false` when no movie has this id.
    async fn update(&self, id: Uuid, update: &MovieUpdate) -> Result<bool, CatalogError>;

    /// Returns `false` when no movie has this id.
    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError>;

    /// Min/max release year over active movies; `None` when there are none.
    async fn year_range(&self) -> Result<Option<YearRange>, CatalogError>;

    async fn distinct_countries(&self) -> Result<Vec<String>, CatalogError>;

    async fn distinct_languages(&self) -> Result<Vec<String>, CatalogError>;

    async fn count_all(&self) -> Result<u64, CatalogError>;
}

/// Repository for per-user movie ratings.
pub trait RatingRepository: Send + Sync {
    async fn scores_for_movie(&self, movie_id: Uuid) -> Result<Vec<i16>, CatalogError>;

    async fn distribution(&self, movie_id: Uuid) -> Result<Distribution, CatalogError>;

    async fn find(&self, user_id: Uuid, movie_id: Uuid) -> Result<Option<Rating>, CatalogError>;

    async fn list_by_user(
        &self,
        user_id: Uuid,
        sort_by: RatingSortBy,
        page: PageRequest,
    ) -> Result<Vec<RatedMovie>, CatalogError>;

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, CatalogError>;

    /// Ids of movies the user rated, optionally only those scored `>= min_score`.
    async fn movie_ids_by_user(
        &self,
        user_id: Uuid,
        min_score: Option<i16>,
    ) -> Result<Vec<Uuid>, CatalogError>;

    /// Fails with `RatingAlreadyExists` when the pair is already rated.
    async fn create(&self, rating: &Rating) -> Result<(), CatalogError>;

    /// Returns `false` when the pair has no rating.
    async fn update_score(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
        score: Score,
    ) -> Result<bool, CatalogError>;

    /// Returns `false` when the pair has no rating.
    async fn delete(&self, user_id: Uuid, movie_id: Uuid) -> Result<bool, CatalogError>;

    async fn count_all(&self) -> Result<u64, CatalogError>;
}

/// Repository for reviews. Writes keep the author's rating row in step.
pub trait ReviewRepository: Send + Sync {
    async fn count_for_movie(&self, movie_id: Uuid) -> Result<u64, CatalogError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, CatalogError>;

    async fn list(
        &self,
        filter: ReviewFilter,
        sort_by: ReviewSortBy,
        page: PageRequest,
    ) -> Result<Vec<Review>, CatalogError>;

    async fn count(&self, filter: ReviewFilter) -> Result<u64, CatalogError>;

    /// Ids of movies the user has reviewed, hidden reviews included.
    async fn movie_ids_by_author(&self, user_id: Uuid) -> Result<Vec<Uuid>, CatalogError>;

    /// Insert the review and upsert the author's rating with the review's
    /// score, in one transaction. Fails with `ReviewAlreadyExists`.
    async fn create_with_rating(&self, review: &Review) -> Result<(), CatalogError>;

    /// Persist edited content/score and sync the author's rating.
    async fn update_with_rating(&self, review: &Review) -> Result<(), CatalogError>;

    /// Delete the review and the author's rating for the same movie.
    /// Returns `false` when the review does not exist.
    async fn delete_with_rating(&self, review: &Review) -> Result<bool, CatalogError>;

    async fn set_hidden(&self, id: Uuid, hidden: bool) -> Result<bool, CatalogError>;

    async fn count_all(&self) -> Result<u64, CatalogError>;

    async fn recent(&self, limit: u64) -> Result<Vec<Review>, CatalogError>;
}

/// Repository for helpful/unhelpful votes on reviews.
pub trait ReviewVoteRepository: Send + Sync {
    /// Insert the vote and bump the matching review counter atomically.
    /// Fails with `VoteAlreadyExists`.
    async fn create_and_count(&self, vote: &ReviewVote) -> Result<(), CatalogError>;

    /// Delete the vote and decrement its counter. Returns the removed vote
    /// type, or `None` when there was no vote.
    async fn delete_and_count(
        &self,
        user_id: Uuid,
        review_id: Uuid,
    ) -> Result<Option<VoteType>, CatalogError>;
}

/// Repository for watchlist entries.
pub trait WatchlistRepository: Send + Sync {
    /// Entries newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<WatchlistEntry>, CatalogError>;

    async fn movie_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, CatalogError>;

    /// Fails with `AlreadyInWatchlist`.
    async fn add(&self, user_id: Uuid, movie_id: Uuid) -> Result<(), CatalogError>;

    async fn remove(&self, user_id: Uuid, movie_id: Uuid) -> Result<bool, CatalogError>;
}

/// Repository for user-curated lists.
pub trait ListRepository: Send + Sync {
    async fn create(&self, list: &MovieList) -> Result<(), CatalogError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MovieList>, CatalogError>;

    async fn list(
        &self,
        filter: ListFilter,
        page: PageRequest,
    ) -> Result<Vec<MovieList>, CatalogError>;

    async fn count(&self, filter: ListFilter) -> Result<u64, CatalogError>;

    /// Overwrite name, description and visibility.
    async fn update(&self, list: &MovieList) -> Result<(), CatalogError>;

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError>;

    /// Fails with `MovieAlreadyInList`.
    async fn add_movie(&self, list_id: Uuid, movie_id: Uuid) -> Result<(), CatalogError>;

    async fn remove_movie(&self, list_id: Uuid, movie_id: Uuid) -> Result<bool, CatalogError>;

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, CatalogError>;
}

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, CatalogError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, CatalogError>;

    /// Account plus stored password hash, looked up by normalized email.
    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, CatalogError>;

    /// Fails with `EmailTaken` or `UsernameTaken` on a duplicate.
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), CatalogError>;

    /// Fails with `UsernameTaken` when the new username is in use.
    async fn update_profile(
        &self,
        id: Uuid,
        username: Option<&str>,
        bio: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<bool, CatalogError>;

    async fn list(&self, filter: &UserFilter, page: PageRequest)
    -> Result<Vec<User>, CatalogError>;

    async fn count(&self, filter: &UserFilter) -> Result<u64, CatalogError>;

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<bool, CatalogError>;

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<bool, CatalogError>;

    /// Remove the account with everything it owns: ratings, reviews,
    /// watchlist, lists and review votes. Counters on reviews the user voted
    /// on are decremented. Movie rating fields are left to the caller.
    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError>;

    async fn count_all(&self) -> Result<u64, CatalogError>;

    async fn recent(&self, limit: u64) -> Result<Vec<User>, CatalogError>;

    async fn stats(&self, id: Uuid) -> Result<UserStats, CatalogError>;
}

/// Repository for genres, actors and directors.
pub trait CatalogRepository: Send + Sync {
    /// All genres sorted by name.
    async fn list_genres(&self) -> Result<Vec<Genre>, CatalogError>;

    async fn find_genre(&self, id: Uuid) -> Result<Option<Genre>, CatalogError>;

    /// Fails with `GenreAlreadyExists` on a duplicate name or slug.
    async fn create_genre(&self, genre: &Genre) -> Result<(), CatalogError>;

    async fn create_person(&self, kind: PersonKind, person: &Person) -> Result<(), CatalogError>;

    /// Case-insensitive substring match on name.
    async fn search_people(
        &self,
        kind: PersonKind,
        needle: &str,
        limit: Option<u64>,
    ) -> Result<Vec<Person>, CatalogError>;

    async fn search_genres(&self, needle: &str, limit: u64) -> Result<Vec<Genre>, CatalogError>;

    /// Subset of `ids` that exist in the given reference table.
    async fn existing_ids(&self, kind: RefKind, ids: &[Uuid]) -> Result<Vec<Uuid>, CatalogError>;
}
