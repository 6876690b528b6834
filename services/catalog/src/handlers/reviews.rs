use axum::extract::{Path, State};
use serde::Deserialize;

use filmrate_auth_types::identity::{IdentityHeaders, MaybeIdentity};
use filmrate_core::response::ApiResponse;
use filmrate_domain::vote::VoteType;

use crate::error::CatalogError;
use crate::handlers::movies::ReviewData;
use crate::handlers::{JsonBody, path_id};
use crate::state::AppState;
use crate::usecase::review::{
    DeleteReviewUseCase, GetReviewUseCase, RemoveVoteUseCase, UpdateReviewInput,
    UpdateReviewUseCase, VoteReviewUseCase,
};

// ── GET /api/reviews/{id} ────────────────────────────────────────────────────

/// Hidden reviews are only visible to admins.
pub async fn get_review(
    MaybeIdentity(identity): MaybeIdentity,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<ApiResponse<ReviewData>, CatalogError> {
    let review_id = path_id(&review_id)?;
    let include_hidden = identity.is_some_and(|i| i.is_admin());
    let usecase = GetReviewUseCase {
        reviews: state.review_repo(),
    };
    let review = usecase.execute(review_id, include_hidden).await?;
    Ok(ApiResponse::ok(ReviewData {
        review: review.into(),
    }))
}

// ── PUT /api/reviews/{id} ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: Option<i64>,
    pub content: Option<String>,
}

pub async fn update_review(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    JsonBody(body): JsonBody<UpdateReviewRequest>,
) -> Result<ApiResponse<ReviewData>, CatalogError> {
    let review_id = path_id(&review_id)?;
    let usecase = UpdateReviewUseCase {
        movies: state.movie_repo(),
        ratings: state.rating_repo(),
        reviews: state.review_repo(),
    };
    let review = usecase
        .execute(
            identity.user_id,
            review_id,
            UpdateReviewInput {
                rating: body.rating,
                content: body.content,
            },
        )
        .await?;
    Ok(ApiResponse::ok(ReviewData {
        review: review.into(),
    })
    .with_message("Review updated successfully"))
}

// ── DELETE /api/reviews/{id} ─────────────────────────────────────────────────

pub async fn delete_review(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<ApiResponse<()>, CatalogError> {
    let review_id = path_id(&review_id)?;
    let usecase = DeleteReviewUseCase {
        movies: state.movie_repo(),
        ratings: state.rating_repo(),
        reviews: state.review_repo(),
    };
    usecase
        .execute(identity.user_id, identity.is_admin(), review_id)
        .await?;
    Ok(ApiResponse::message("Review deleted successfully"))
}

// ── POST /api/reviews/{id}/vote ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub vote_type: String,
}

pub async fn vote_review(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    JsonBody(body): JsonBody<VoteRequest>,
) -> Result<ApiResponse<ReviewData>, CatalogError> {
    let review_id = path_id(&review_id)?;
    let vote_type = VoteType::from_str_opt(&body.vote_type).ok_or_else(|| {
        CatalogError::invalid("voteType", "Vote type must be helpful or unhelpful")
    })?;
    let usecase = VoteReviewUseCase {
        reviews: state.review_repo(),
        votes: state.vote_repo(),
    };
    let review = usecase
        .execute(identity.user_id, review_id, vote_type)
        .await?;
    Ok(ApiResponse::ok(ReviewData {
        review: review.into(),
    })
    .with_message("Vote recorded successfully"))
}

// ── DELETE /api/reviews/{id}/vote ────────────────────────────────────────────

pub async fn remove_vote(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<ApiResponse<ReviewData>, CatalogError> {
    let review_id = path_id(&review_id)?;
    let usecase = RemoveVoteUseCase {
        reviews: state.review_repo(),
        votes: state.vote_repo(),
    };
    let review = usecase.execute(identity.user_id, review_id).await?;
    Ok(ApiResponse::ok(ReviewData {
        review: review.into(),
    })
    .with_message("Vote removed successfully"))
}
