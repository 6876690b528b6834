use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use filmrate_domain::pagination::Sort;
use filmrate_domain::user::UserRole;
use filmrate_domain::vote::VoteType;

/// Id + display name of a genre, actor or director attached to a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
}

/// Catalog entry with its reference sets resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub release_year: i32,
    pub duration: i32,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub genres: Vec<NamedRef>,
    pub directors: Vec<NamedRef>,
    pub actors: Vec<NamedRef>,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub total_reviews: i64,
    pub views: i64,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    pub fn genre_ids(&self) -> Vec<Uuid> {
        self.genres.iter().map(|g| g.id).collect()
    }

    pub fn director_ids(&self) -> Vec<Uuid> {
        self.directors.iter().map(|d| d.id).collect()
    }

    pub fn to_ref(&self) -> MovieRef {
        MovieRef {
            id: self.id,
            title: self.title.clone(),
            poster_url: self.poster_url.clone(),
            release_year: self.release_year,
        }
    }
}

/// Movie summary embedded in ratings, watchlist and list entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRef {
    pub id: Uuid,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_year: i32,
}

/// Fields for a new catalog entry.
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub release_year: i32,
    pub duration: i32,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub genre_ids: Vec<Uuid>,
    pub actor_ids: Vec<Uuid>,
    pub director_ids: Vec<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Partial update; `None` leaves a field unchanged. Reference sets are
/// replaced wholesale when present.
#[derive(Debug, Clone, Default)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_year: Option<i32>,
    pub duration: Option<i32>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub is_active: Option<bool>,
    pub genre_ids: Option<Vec<Uuid>>,
    pub actor_ids: Option<Vec<Uuid>>,
    pub director_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub score: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RatedMovie {
    pub rating: Rating,
    pub movie: MovieRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub rating: i16,
    pub content: String,
    pub helpful_votes: i32,
    pub unhelpful_votes: i32,
    pub is_hidden: bool,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which reviews a listing should return.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewFilter {
    pub movie_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub is_hidden: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewVote {
    pub user_id: Uuid,
    pub review_id: Uuid,
    pub vote_type: VoteType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct WatchlistEntry {
    pub movie: MovieRef,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ListEntry {
    pub movie: MovieRef,
    pub added_at: DateTime<Utc>,
}

/// User-curated list with its entries, newest first.
#[derive(Debug, Clone)]
pub struct MovieList {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub movies: Vec<ListEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which lists a listing should return.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFilter {
    pub owner_id: Option<Uuid>,
    pub public_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account with its stored password hash. Only the login flow reads this.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: User,
    pub password_hash: String,
}

/// Admin user search: substring over username/email plus exact filters.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStats {
    pub total_reviews: u64,
    pub total_ratings: u64,
    pub total_lists: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

/// Actor or director.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonKind {
    Actor,
    Director,
}

/// Reference set a movie can point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    Genre,
    Actor,
    Director,
}

impl From<PersonKind> for RefKind {
    fn from(kind: PersonKind) -> Self {
        match kind {
            PersonKind::Actor => Self::Actor,
            PersonKind::Director => Self::Director,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min_year: i32,
    pub max_year: i32,
}

#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub genres: Vec<Genre>,
    pub year_range: YearRange,
    pub countries: Vec<String>,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Suggestions {
    pub movies: Vec<MovieRef>,
    pub actors: Vec<Person>,
    pub directors: Vec<Person>,
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone)]
pub struct Homepage {
    pub trending: Vec<Movie>,
    pub top_rated: Vec<Movie>,
    pub recently_added: Vec<Movie>,
    pub for_you: Option<Vec<Movie>>,
}

#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_movies: u64,
    pub total_reviews: u64,
    pub total_ratings: u64,
    pub recent_users: Vec<User>,
    pub recent_reviews: Vec<Review>,
    pub top_movies: Vec<Movie>,
}

/// Sort options for a user's rating history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingSortBy {
    CreatedAt(Sort),
    Score(Sort),
}

impl Default for RatingSortBy {
    fn default() -> Self {
        Self::CreatedAt(Sort::Desc)
    }
}

impl RatingSortBy {
    pub fn from_kebab_case(s: &str) -> Option<Self> {
        match s {
            "created-at-desc" => Some(Self::CreatedAt(Sort::Desc)),
            "created-at-asc" => Some(Self::CreatedAt(Sort::Asc)),
            "score-desc" => Some(Self::Score(Sort::Desc)),
            "score-asc" => Some(Self::Score(Sort::Asc)),
            _ => None,
        }
    }
}

/// Sort options for review listings. Keys follow the `-field` convention
/// used by the movie sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSortBy {
    HelpfulVotes(Sort),
    CreatedAt(Sort),
    Rating(Sort),
}

impl Default for ReviewSortBy {
    fn default() -> Self {
        Self::HelpfulVotes(Sort::Desc)
    }
}

impl ReviewSortBy {
    pub fn from_key(s: &str) -> Option<Self> {
        match s {
            "-helpfulVotes" => Some(Self::HelpfulVotes(Sort::Desc)),
            "helpfulVotes" => Some(Self::HelpfulVotes(Sort::Asc)),
            "-createdAt" => Some(Self::CreatedAt(Sort::Desc)),
            "createdAt" => Some(Self::CreatedAt(Sort::Asc)),
            "-rating" => Some(Self::Rating(Sort::Desc)),
            "rating" => Some(Self::Rating(Sort::Asc)),
            _ => None,
        }
    }
}
