use axum::extract::{RawQuery, State};
use serde::{Deserialize, Serialize};

use filmrate_auth_types::identity::IdentityHeaders;
use filmrate_core::response::ApiResponse;
use filmrate_domain::pagination::Pagination;

use crate::domain::types::RatingSortBy;
use crate::error::CatalogError;
use crate::handlers::{
    JsonBody, RatedMovieResponse, ReviewResponse, UserResponse, parse_query, reviews_response,
};
use crate::state::AppState;
use crate::usecase::auth::{AuthSession, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase};
use crate::usecase::rating::GetUserRatingsUseCase;
use crate::usecase::review::ListUserReviewsUseCase;
use crate::usecase::user::{GetProfileUseCase, UpdateProfileInput, UpdateProfileUseCase};

#[derive(Serialize)]
pub struct ProfileData {
    pub user: UserResponse,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub user: UserResponse,
    pub token: String,
    pub expires_at: u64,
}

impl From<AuthSession> for SessionData {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.user.into(),
            token: session.token,
            expires_at: session.expires_at,
        }
    }
}

// ── POST /api/auth/register ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<ApiResponse<SessionData>, CatalogError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        tokens: state.token_config(),
        bcrypt_cost: state.config.bcrypt_cost,
    };
    let session = usecase
        .execute(RegisterInput {
            username: body.username,
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(ApiResponse::created("Registration successful", session.into()))
}

// ── POST /api/auth/login ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<ApiResponse<SessionData>, CatalogError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        tokens: state.token_config(),
    };
    let session = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(ApiResponse::ok(SessionData::from(session)).with_message("Login successful"))
}

// ── POST /api/auth/logout ────────────────────────────────────────────────────

/// Tokens are stateless; the client discards its copy.
pub async fn logout(identity: IdentityHeaders) -> ApiResponse<()> {
    tracing::info!(user_id = %identity.user_id, "user logged out");
    ApiResponse::message("Logout successful")
}

// ── GET /api/auth/profile ────────────────────────────────────────────────────

pub async fn get_profile(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<ApiResponse<ProfileData>, CatalogError> {
    let usecase = GetProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(ApiResponse::ok(ProfileData { user: user.into() }))
}

// ── PUT /api/auth/profile ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

pub async fn update_profile(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UpdateProfileRequest>,
) -> Result<ApiResponse<ProfileData>, CatalogError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(
            identity.user_id,
            UpdateProfileInput {
                username: body.username,
                bio: body.bio,
                avatar: body.avatar,
            },
        )
        .await?;
    Ok(ApiResponse::ok(ProfileData { user: user.into() })
        .with_message("Resource updated successfully"))
}

// ── GET /api/auth/me/ratings ─────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct MyRatingsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
}

#[derive(Serialize)]
pub struct RatingsPage {
    pub ratings: Vec<RatedMovieResponse>,
    pub pagination: Pagination,
}

pub async fn get_my_ratings(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<RatingsPage>, CatalogError> {
    let query: MyRatingsQuery = parse_query(raw.as_deref())?;
    let sort_by = query
        .sort
        .as_deref()
        .and_then(RatingSortBy::from_kebab_case)
        .unwrap_or_default();
    let usecase = GetUserRatingsUseCase {
        ratings: state.rating_repo(),
    };
    let page = usecase
        .execute(identity.user_id, sort_by, state.page(query.page, query.limit))
        .await?;
    Ok(ApiResponse::ok(RatingsPage {
        ratings: page.items.into_iter().map(RatedMovieResponse::from).collect(),
        pagination: page.pagination,
    }))
}

// ── GET /api/auth/me/reviews ─────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct ReviewsPage {
    pub reviews: Vec<ReviewResponse>,
    pub pagination: Pagination,
}

pub async fn get_my_reviews(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<ReviewsPage>, CatalogError> {
    let query: PageQuery = parse_query(raw.as_deref())?;
    let usecase = ListUserReviewsUseCase {
        reviews: state.review_repo(),
    };
    let page = usecase
        .execute(identity.user_id, state.page(query.page, query.limit))
        .await?;
    Ok(ApiResponse::ok(ReviewsPage {
        reviews: reviews_response(page.items),
        pagination: page.pagination,
    }))
}
