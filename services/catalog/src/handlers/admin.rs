use axum::extract::{Path, RawQuery, State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use filmrate_auth_types::identity::AdminIdentity;
use filmrate_core::response::ApiResponse;
use filmrate_domain::pagination::Pagination;
use filmrate_domain::user::UserRole;

use crate::domain::types::{MovieUpdate, PersonKind, ReviewFilter, UserFilter};
use crate::domain::validate;
use crate::error::CatalogError;
use crate::handlers::movies::{MovieData, ReviewData};
use crate::handlers::{
    GenreResponse, JsonBody, MovieResponse, PersonResponse, ReviewResponse, UserResponse,
    movies_response, parse_query, path_id, reviews_response, users_response,
};
use crate::state::AppState;
use crate::usecase::admin::{
    DeleteUserUseCase, GetDashboardUseCase, GetUserDetailUseCase, ListUsersUseCase,
    SetUserActiveUseCase, SetUserRoleUseCase,
};
use crate::usecase::movie::{
    CreateGenreUseCase, CreateMovieInput, CreateMovieUseCase, CreatePersonInput,
    CreatePersonUseCase, DeleteMovieUseCase, UpdateMovieUseCase,
};
use crate::usecase::review::{DeleteReviewUseCase, ListReviewsUseCase, SetReviewVisibilityUseCase};

// ── GET /api/admin/users ─────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsersQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Serialize)]
pub struct UsersPage {
    pub users: Vec<UserResponse>,
    pub pagination: Pagination,
}

pub async fn list_users(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<UsersPage>, CatalogError> {
    let query: UsersQuery = parse_query(raw.as_deref())?;
    let role = query
        .role
        .as_deref()
        .map(|r| {
            r.parse::<UserRole>()
                .map_err(|_| CatalogError::invalid("role", "Role must be user or admin"))
        })
        .transpose()?;
    let filter = UserFilter {
        search: query.search.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()),
        role,
        is_active: query.is_active,
    };
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let page = usecase
        .execute(&filter, state.page(query.page, query.limit))
        .await?;
    Ok(ApiResponse::ok(UsersPage {
        users: users_response(page.items),
        pagination: page.pagination,
    }))
}

// ── GET /api/admin/users/{id} ────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    pub total_reviews: u64,
    pub total_ratings: u64,
    pub total_lists: u64,
}

#[derive(Serialize)]
pub struct UserDetailData {
    pub user: UserResponse,
    pub stats: UserStatsResponse,
}

pub async fn get_user(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<UserDetailData>, CatalogError> {
    let user_id = path_id(&user_id)?;
    let usecase = GetUserDetailUseCase {
        users: state.user_repo(),
    };
    let (user, stats) = usecase.execute(user_id).await?;
    Ok(ApiResponse::ok(UserDetailData {
        user: user.into(),
        stats: UserStatsResponse {
            total_reviews: stats.total_reviews,
            total_ratings: stats.total_ratings,
            total_lists: stats.total_lists,
        },
    }))
}

// ── PUT /api/admin/users/{id}/role ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct RoleRequest {
    pub role: String,
}

#[derive(Serialize)]
pub struct UserData {
    pub user: UserResponse,
}

pub async fn set_user_role(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    JsonBody(body): JsonBody<RoleRequest>,
) -> Result<ApiResponse<UserData>, CatalogError> {
    let user_id = path_id(&user_id)?;
    let role = body
        .role
        .parse::<UserRole>()
        .map_err(|_| CatalogError::invalid("role", "Role must be user or admin"))?;
    let usecase = SetUserRoleUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(user_id, role).await?;
    Ok(ApiResponse::ok(UserData { user: user.into() }).with_message("User role updated successfully"))
}

// ── PUT /api/admin/users/{id}/status ─────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub is_active: bool,
}

pub async fn set_user_status(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    JsonBody(body): JsonBody<StatusRequest>,
) -> Result<ApiResponse<UserData>, CatalogError> {
    let user_id = path_id(&user_id)?;
    let usecase = SetUserActiveUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(user_id, body.is_active).await?;
    let message = if body.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };
    Ok(ApiResponse::ok(UserData { user: user.into() }).with_message(message))
}

// ── DELETE /api/admin/users/{id} ─────────────────────────────────────────────

pub async fn delete_user(
    AdminIdentity(admin): AdminIdentity,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<()>, CatalogError> {
    let user_id = path_id(&user_id)?;
    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
        movies: state.movie_repo(),
        ratings: state.rating_repo(),
        reviews: state.review_repo(),
    };
    usecase.execute(admin.user_id, user_id).await?;
    Ok(ApiResponse::message("Resource deleted successfully"))
}

// ── POST /api/admin/movies ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub title: String,
    pub description: String,
    pub release_year: i32,
    pub duration: i32,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub actors: Vec<String>,
    #[serde(default)]
    pub directors: Vec<String>,
}

fn parse_ids(field: &str, raw: &[String]) -> Result<Vec<Uuid>, CatalogError> {
    raw.iter()
        .map(|s| validate::parse_id(field, s))
        .collect()
}

pub async fn create_movie(
    AdminIdentity(admin): AdminIdentity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateMovieRequest>,
) -> Result<ApiResponse<MovieData>, CatalogError> {
    let input = CreateMovieInput {
        genre_ids: parse_ids("genres", &body.genres)?,
        actor_ids: parse_ids("actors", &body.actors)?,
        director_ids: parse_ids("directors", &body.directors)?,
        title: body.title,
        description: body.description,
        release_year: body.release_year,
        duration: body.duration,
        poster_url: body.poster_url,
        trailer_url: body.trailer_url,
        country: body.country,
        language: body.language,
    };
    let usecase = CreateMovieUseCase {
        movies: state.movie_repo(),
        catalog: state.catalog_repo(),
    };
    let movie = usecase.execute(admin.user_id, input).await?;
    Ok(ApiResponse::created(
        "Movie created successfully",
        MovieData {
            movie: movie.into(),
        },
    ))
}

// ── PUT /api/admin/movies/{id} ───────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_year: Option<i32>,
    pub duration: Option<i32>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub is_active: Option<bool>,
    pub genres: Option<Vec<String>>,
    pub actors: Option<Vec<String>>,
    pub directors: Option<Vec<String>>,
}

pub async fn update_movie(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    JsonBody(body): JsonBody<UpdateMovieRequest>,
) -> Result<ApiResponse<MovieData>, CatalogError> {
    let movie_id = path_id(&movie_id)?;
    let update = MovieUpdate {
        genre_ids: body
            .genres
            .as_deref()
            .map(|ids| parse_ids("genres", ids))
            .transpose()?,
        actor_ids: body
            .actors
            .as_deref()
            .map(|ids| parse_ids("actors", ids))
            .transpose()?,
        director_ids: body
            .directors
            .as_deref()
            .map(|ids| parse_ids("directors", ids))
            .transpose()?,
        title: body.title,
        description: body.description,
        release_year: body.release_year,
        duration: body.duration,
        poster_url: body.poster_url,
        trailer_url: body.trailer_url,
        country: body.country,
        language: body.language,
        is_active: body.is_active,
    };
    let usecase = UpdateMovieUseCase {
        movies: state.movie_repo(),
        catalog: state.catalog_repo(),
    };
    let movie = usecase.execute(movie_id, update).await?;
    Ok(ApiResponse::ok(MovieData {
        movie: movie.into(),
    })
    .with_message("Resource updated successfully"))
}

// ── DELETE /api/admin/movies/{id} ────────────────────────────────────────────

pub async fn delete_movie(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<ApiResponse<()>, CatalogError> {
    let movie_id = path_id(&movie_id)?;
    let usecase = DeleteMovieUseCase {
        movies: state.movie_repo(),
    };
    usecase.execute(movie_id).await?;
    Ok(ApiResponse::message("Resource deleted successfully"))
}

// ── POST /api/admin/genres ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateGenreRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Serialize)]
pub struct GenreData {
    pub genre: GenreResponse,
}

pub async fn create_genre(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateGenreRequest>,
) -> Result<ApiResponse<GenreData>, CatalogError> {
    let usecase = CreateGenreUseCase {
        catalog: state.catalog_repo(),
    };
    let genre = usecase.execute(&body.name, body.description).await?;
    Ok(ApiResponse::created(
        "Genre created successfully",
        GenreData {
            genre: genre.into(),
        },
    ))
}

// ── POST /api/admin/actors, /api/admin/directors ─────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePersonRequest {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Serialize)]
pub struct PersonData {
    pub person: PersonResponse,
}

async fn create_person(
    state: AppState,
    kind: PersonKind,
    body: CreatePersonRequest,
) -> Result<ApiResponse<PersonData>, CatalogError> {
    let usecase = CreatePersonUseCase {
        catalog: state.catalog_repo(),
    };
    let person = usecase
        .execute(
            kind,
            CreatePersonInput {
                name: body.name,
                birth_date: body.birth_date,
                nationality: body.nationality,
                bio: body.bio,
                photo_url: body.photo_url,
            },
        )
        .await?;
    let message = match kind {
        PersonKind::Actor => "Actor created successfully",
        PersonKind::Director => "Director created successfully",
    };
    Ok(ApiResponse::created(
        message,
        PersonData {
            person: person.into(),
        },
    ))
}

pub async fn create_actor(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreatePersonRequest>,
) -> Result<ApiResponse<PersonData>, CatalogError> {
    create_person(state, PersonKind::Actor, body).await
}

pub async fn create_director(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreatePersonRequest>,
) -> Result<ApiResponse<PersonData>, CatalogError> {
    create_person(state, PersonKind::Director, body).await
}

// ── GET /api/admin/reviews ───────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub is_hidden: Option<bool>,
    pub movie_id: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct ReviewsPage {
    pub reviews: Vec<ReviewResponse>,
    pub pagination: Pagination,
}

pub async fn list_reviews(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<ReviewsPage>, CatalogError> {
    let query: ReviewsQuery = parse_query(raw.as_deref())?;
    let filter = ReviewFilter {
        movie_id: query
            .movie_id
            .as_deref()
            .map(|s| validate::parse_id("movieId", s))
            .transpose()?,
        user_id: query
            .user_id
            .as_deref()
            .map(|s| validate::parse_id("userId", s))
            .transpose()?,
        is_hidden: query.is_hidden,
    };
    let usecase = ListReviewsUseCase {
        reviews: state.review_repo(),
    };
    let page = usecase
        .execute(filter, state.page(query.page, query.limit))
        .await?;
    Ok(ApiResponse::ok(ReviewsPage {
        reviews: reviews_response(page.items),
        pagination: page.pagination,
    }))
}

// ── PUT /api/admin/reviews/{id}/visibility ───────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRequest {
    pub is_hidden: bool,
}

pub async fn set_review_visibility(
    _admin: AdminIdentity,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    JsonBody(body): JsonBody<VisibilityRequest>,
) -> Result<ApiResponse<ReviewData>, CatalogError> {
    let review_id = path_id(&review_id)?;
    let usecase = SetReviewVisibilityUseCase {
        reviews: state.review_repo(),
    };
    let review = usecase.execute(review_id, body.is_hidden).await?;
    let message = if body.is_hidden {
        "Review hidden successfully"
    } else {
        "Review unhidden successfully"
    };
    Ok(ApiResponse::ok(ReviewData {
        review: review.into(),
    })
    .with_message(message))
}

// ── DELETE /api/admin/reviews/{id} ───────────────────────────────────────────

pub async fn delete_review(
    AdminIdentity(admin): AdminIdentity,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<ApiResponse<()>, CatalogError> {
    let review_id = path_id(&review_id)?;
    let usecase = DeleteReviewUseCase {
        movies: state.movie_repo(),
        ratings: state.rating_repo(),
        reviews: state.review_repo(),
    };
    usecase.execute(admin.user_id, true, review_id).await?;
    Ok(ApiResponse::message("Resource deleted successfully"))
}

// ── GET /api/admin/stats ─────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsResponse {
    pub total_users: u64,
    pub total_movies: u64,
    pub total_reviews: u64,
    pub total_ratings: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub stats: TotalsResponse,
    pub recent_users: Vec<UserResponse>,
    pub recent_reviews: Vec<ReviewResponse>,
    pub top_rated_movies: Vec<MovieResponse>,
}

pub async fn dashboard(
    _admin: AdminIdentity,
    State(state): State<AppState>,
) -> Result<ApiResponse<DashboardData>, CatalogError> {
    let usecase = GetDashboardUseCase {
        users: state.user_repo(),
        movies: state.movie_repo(),
        reviews: state.review_repo(),
        ratings: state.rating_repo(),
    };
    let stats = usecase.execute().await?;
    Ok(ApiResponse::ok(DashboardData {
        stats: TotalsResponse {
            total_users: stats.total_users,
            total_movies: stats.total_movies,
            total_reviews: stats.total_reviews,
            total_ratings: stats.total_ratings,
        },
        recent_users: users_response(stats.recent_users),
        recent_reviews: reviews_response(stats.recent_reviews),
        top_rated_movies: movies_response(stats.top_movies),
    }))
}
