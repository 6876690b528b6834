//! JWT access tokens.
//!
//! Login and registration issue an HS256 token; [`bearer_identity`] validates
//! `Authorization: Bearer` on the way in and rewrites it into the same
//! identity headers the gateway injects, so the extractors in
//! [`crate::identity`] serve both.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, HeaderValue, header};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use filmrate_core::error::AppError;
use filmrate_domain::user::UserRole;

use crate::identity::{USER_ID_HEADER, USER_ROLE_HEADER};

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user id (UUID string) |
/// | `role` | custom | `"user"` or `"admin"` |
/// | `exp` | `exp` | expiry, seconds since epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub role: String,
    pub exp: u64,
}

/// Identity carried by a validated token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub user_role: UserRole,
    pub exp: u64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// Sign an access token valid for `ttl`. Returns the token and its expiry.
pub fn issue_access_token(
    user_id: Uuid,
    role: UserRole,
    secret: &str,
    ttl: Duration,
) -> Result<(String, u64), jsonwebtoken::errors::Error> {
    let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
    let exp = now + ttl.as_secs();
    let claims = JwtClaims {
        sub: user_id.to_string(),
        role: role.as_str().to_owned(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok((token, exp))
}

/// Validate an access token: HS256, `exp` and `sub` required, default
/// 60s leeway on expiry.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    let user_id = data
        .claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| TokenError::Malformed)?;
    let user_role = data
        .claims
        .role
        .parse::<UserRole>()
        .map_err(|_| TokenError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        user_role,
        exp: data.claims.exp,
    })
}

/// Token from an `Authorization: Bearer <token>` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// HMAC secret shared by token issuance and [`bearer_identity`].
#[derive(Clone)]
pub struct TokenSecret(pub Arc<str>);

/// Middleware: a valid bearer token overwrites the identity headers, an
/// invalid one is rejected with 401. Requests without a bearer token pass
/// through untouched.
pub async fn bearer_identity(
    State(secret): State<TokenSecret>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()).map(str::to_owned) else {
        return next.run(req).await;
    };
    let info = match validate_access_token(&token, &secret.0) {
        Ok(info) => info,
        Err(e) => {
            tracing::debug!(error = %e, "bearer token rejected");
            return AppError::Unauthorized.into_response();
        }
    };
    let Ok(user_id) = HeaderValue::from_str(&info.user_id.to_string()) else {
        return AppError::Unauthorized.into_response();
    };
    let headers = req.headers_mut();
    headers.insert(USER_ID_HEADER, user_id);
    headers.insert(
        USER_ROLE_HEADER,
        HeaderValue::from_static(info.user_role.as_str()),
    );
    next.run(req).await
}
