use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::{DbErr, SqlErr, TransactionError};

use filmrate_core::error::{FieldError, error_response};

/// Catalog service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("User not found")]
    UserNotFound,
    #[error("Movie not found")]
    MovieNotFound,
    #[error("Review not found")]
    ReviewNotFound,
    #[error("Rating not found")]
    RatingNotFound,
    #[error("List not found")]
    ListNotFound,
    #[error("Genre not found")]
    GenreNotFound,
    #[error("Vote not found")]
    VoteNotFound,
    #[error("Movie not in watchlist")]
    NotInWatchlist,
    #[error("Movie not in list")]
    MovieNotInList,
    #[error("You have already rated this movie")]
    RatingAlreadyExists,
    #[error("You have already reviewed this movie")]
    ReviewAlreadyExists,
    #[error("You have already voted on this review")]
    VoteAlreadyExists,
    #[error("Movie already in watchlist")]
    AlreadyInWatchlist,
    #[error("Movie already in list")]
    MovieAlreadyInList,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Genre already exists")]
    GenreAlreadyExists,
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("You cannot delete your own account")]
    CannotDeleteSelf,
    #[error("You cannot vote on your own review")]
    CannotVoteOwnReview,
    #[error("Access denied")]
    Forbidden,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Your account has been deactivated")]
    AccountDeactivated,
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::MovieNotFound => "MOVIE_NOT_FOUND",
            Self::ReviewNotFound => "REVIEW_NOT_FOUND",
            Self::RatingNotFound => "RATING_NOT_FOUND",
            Self::ListNotFound => "LIST_NOT_FOUND",
            Self::GenreNotFound => "GENRE_NOT_FOUND",
            Self::VoteNotFound => "VOTE_NOT_FOUND",
            Self::NotInWatchlist => "NOT_IN_WATCHLIST",
            Self::MovieNotInList => "MOVIE_NOT_IN_LIST",
            Self::RatingAlreadyExists => "RATING_ALREADY_EXISTS",
            Self::ReviewAlreadyExists => "REVIEW_ALREADY_EXISTS",
            Self::VoteAlreadyExists => "VOTE_ALREADY_EXISTS",
            Self::AlreadyInWatchlist => "ALREADY_IN_WATCHLIST",
            Self::MovieAlreadyInList => "MOVIE_ALREADY_IN_LIST",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::GenreAlreadyExists => "GENRE_ALREADY_EXISTS",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::CannotDeleteSelf => "CANNOT_DELETE_SELF",
            Self::CannotVoteOwnReview => "CANNOT_VOTE_OWN_REVIEW",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDeactivated => "ACCOUNT_DEACTIVATED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::UserNotFound
            | Self::MovieNotFound
            | Self::ReviewNotFound
            | Self::RatingNotFound
            | Self::ListNotFound
            | Self::GenreNotFound
            | Self::VoteNotFound
            | Self::NotInWatchlist
            | Self::MovieNotInList => StatusCode::NOT_FOUND,
            Self::RatingAlreadyExists
            | Self::ReviewAlreadyExists
            | Self::VoteAlreadyExists
            | Self::AlreadyInWatchlist
            | Self::MovieAlreadyInList
            | Self::UsernameTaken
            | Self::EmailTaken
            | Self::GenreAlreadyExists => StatusCode::CONFLICT,
            Self::Validation(_) | Self::CannotDeleteSelf | Self::CannotVoteOwnReview => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::AccountDeactivated => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Single-field validation failure.
    pub fn invalid(field: &str, message: &str) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Prefix the cause of an `Internal` error; other variants pass through.
    pub fn context(self, message: &'static str) -> Self {
        match self {
            Self::Internal(e) => Self::Internal(e.context(message)),
            other => other,
        }
    }
}

/// `true` when the store rejected a write because of a unique index or key.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Map a failed write: unique violations become `conflict`, everything else
/// becomes `Internal` with `context`.
pub fn map_write_err(err: DbErr, conflict: CatalogError, context: &'static str) -> CatalogError {
    if is_unique_violation(&err) {
        conflict
    } else {
        CatalogError::Internal(anyhow::Error::new(err).context(context))
    }
}

/// Same as [`map_write_err`] for errors surfaced by `TransactionTrait::transaction`.
pub fn map_txn_err(
    err: TransactionError<DbErr>,
    conflict: CatalogError,
    context: &'static str,
) -> CatalogError {
    match err {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => {
            map_write_err(e, conflict, context)
        }
    }
}

impl From<JsonRejection> for CatalogError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid("body", &rejection.body_text())
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        let errors = match &self {
            Self::Validation(errors) => Some(errors.as_slice()),
            _ => None,
        };
        error_response(self.status(), self.kind(), &self.to_string(), errors)
    }
}
