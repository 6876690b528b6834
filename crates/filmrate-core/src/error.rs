use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error envelope: `{ "success": false, "kind", "message", "errors"? }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub success: bool,
    pub kind: &'a str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<&'a [FieldError]>,
}

/// Render an error envelope. Every service error type funnels through here.
pub fn error_response(
    status: StatusCode,
    kind: &str,
    message: &str,
    errors: Option<&[FieldError]>,
) -> Response {
    let body = ErrorBody {
        success: false,
        kind,
        message,
        errors,
    };
    (status, axum::Json(body)).into_response()
}

/// Errors raised by the shared layers (extractors, middleware) before a
/// request reaches service code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not authorized to access this route")]
    Unauthorized,
    #[error("User role is not authorized to access this route")]
    Forbidden,
    #[error("Route not found")]
    NotFound,
    #[error("Too many requests from this IP, please try again later.")]
    TooManyRequests,
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log 500s only. TraceLayer already records method/uri/status for every
        // request, and 4xx are expected client errors.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), &self.to_string(), None)
    }
}
