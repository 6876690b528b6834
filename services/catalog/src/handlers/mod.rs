//! HTTP handlers. Each module maps one `/api/*` resource onto use cases;
//! shared DTOs and extractors live here.

pub mod admin;
pub mod auth;
pub mod lists;
pub mod movies;
pub mod reviews;

use axum::extract::FromRequest;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use filmrate_domain::user::UserRole;

use crate::domain::types::{
    Genre, ListEntry, Movie, MovieList, MovieRef, NamedRef, Person, RatedMovie, Rating, Review,
    User, WatchlistEntry,
};
use crate::domain::validate;
use crate::error::CatalogError;

// ── Extractors ───────────────────────────────────────────────────────────────

/// `axum::Json` whose rejection renders as a 400 validation envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(CatalogError))]
pub struct JsonBody<T>(pub T);

/// Decode a raw query string with `serde_qs`; absent query ⇒ `T::default()`.
pub fn parse_query<T: DeserializeOwned + Default>(raw: Option<&str>) -> Result<T, CatalogError> {
    match raw {
        None | Some("") => Ok(T::default()),
        Some(raw) => serde_qs::from_str(raw)
            .map_err(|e| CatalogError::invalid("query", &e.to_string())),
    }
}

pub fn path_id(raw: &str) -> Result<Uuid, CatalogError> {
    validate::parse_id("id", raw)
}

/// Comma-separated id list, e.g. `genres=<uuid>,<uuid>`.
pub fn id_list(field: &str, raw: Option<&str>) -> Result<Vec<Uuid>, CatalogError> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| validate::parse_id(field, s))
        .collect()
}

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct NamedRefResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<NamedRef> for NamedRefResponse {
    fn from(r: NamedRef) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub release_year: i32,
    pub duration: i32,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub genres: Vec<NamedRefResponse>,
    pub directors: Vec<NamedRefResponse>,
    pub actors: Vec<NamedRefResponse>,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub total_reviews: i64,
    pub views: i64,
    pub is_active: bool,
    #[serde(serialize_with = "filmrate_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "filmrate_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Movie> for MovieResponse {
    fn from(m: Movie) -> Self {
        let refs = |v: Vec<NamedRef>| v.into_iter().map(NamedRefResponse::from).collect();
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            release_year: m.release_year,
            duration: m.duration,
            poster_url: m.poster_url,
            trailer_url: m.trailer_url,
            country: m.country,
            language: m.language,
            genres: refs(m.genres),
            directors: refs(m.directors),
            actors: refs(m.actors),
            average_rating: m.average_rating,
            total_ratings: m.total_ratings,
            total_reviews: m.total_reviews,
            views: m.views,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn movies_response(movies: Vec<Movie>) -> Vec<MovieResponse> {
    movies.into_iter().map(MovieResponse::from).collect()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRefResponse {
    pub id: Uuid,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_year: i32,
}

impl From<MovieRef> for MovieRefResponse {
    fn from(m: MovieRef) -> Self {
        Self {
            id: m.id,
            title: m.title,
            poster_url: m.poster_url,
            release_year: m.release_year,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub score: i16,
    #[serde(serialize_with = "filmrate_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "filmrate_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Rating> for RatingResponse {
    fn from(r: Rating) -> Self {
        Self {
            user_id: r.user_id,
            movie_id: r.movie_id,
            score: r.score,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedMovieResponse {
    pub score: i16,
    pub movie: MovieRefResponse,
    #[serde(serialize_with = "filmrate_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "filmrate_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<RatedMovie> for RatedMovieResponse {
    fn from(r: RatedMovie) -> Self {
        Self {
            score: r.rating.score,
            movie: r.movie.into(),
            created_at: r.rating.created_at,
            updated_at: r.rating.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub rating: i16,
    pub content: String,
    pub helpful_votes: i32,
    pub unhelpful_votes: i32,
    pub is_hidden: bool,
    pub is_edited: bool,
    #[serde(serialize_with = "filmrate_core::serde::to_rfc3339_ms_opt")]
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "filmrate_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "filmrate_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            movie_id: r.movie_id,
            rating: r.rating,
            content: r.content,
            helpful_votes: r.helpful_votes,
            unhelpful_votes: r.unhelpful_votes,
            is_hidden: r.is_hidden,
            is_edited: r.is_edited,
            edited_at: r.edited_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

pub fn reviews_response(reviews: Vec<Review>) -> Vec<ReviewResponse> {
    reviews.into_iter().map(ReviewResponse::from).collect()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub is_active: bool,
    #[serde(serialize_with = "filmrate_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "filmrate_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role,
            bio: u.bio,
            avatar: u.avatar,
            is_active: u.is_active,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

pub fn users_response(users: Vec<User>) -> Vec<UserResponse> {
    users.into_iter().map(UserResponse::from).collect()
}

#[derive(Serialize)]
pub struct GenreResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl From<Genre> for GenreResponse {
    fn from(g: Genre) -> Self {
        Self {
            id: g.id,
            name: g.name,
            slug: g.slug,
            description: g.description,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    pub id: Uuid,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
}

impl From<Person> for PersonResponse {
    fn from(p: Person) -> Self {
        Self {
            id: p.id,
            name: p.name,
            birth_date: p.birth_date,
            nationality: p.nationality,
            bio: p.bio,
            photo_url: p.photo_url,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub movie: MovieRefResponse,
    #[serde(serialize_with = "filmrate_core::serde::to_rfc3339_ms")]
    pub added_at: DateTime<Utc>,
}

impl From<ListEntry> for EntryResponse {
    fn from(e: ListEntry) -> Self {
        Self {
            movie: e.movie.into(),
            added_at: e.added_at,
        }
    }
}

impl From<WatchlistEntry> for EntryResponse {
    fn from(e: WatchlistEntry) -> Self {
        Self {
            movie: e.movie.into(),
            added_at: e.added_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub movies: Vec<EntryResponse>,
    #[serde(serialize_with = "filmrate_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "filmrate_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<MovieList> for ListResponse {
    fn from(l: MovieList) -> Self {
        Self {
            id: l.id,
            user_id: l.user_id,
            name: l.name,
            description: l.description,
            is_public: l.is_public,
            movies: l.movies.into_iter().map(EntryResponse::from).collect(),
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}
