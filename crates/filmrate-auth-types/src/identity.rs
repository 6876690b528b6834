//! Gateway-injected identity headers extractors.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use http::request::Parts;
use uuid::Uuid;

use filmrate_core::error::AppError;
use filmrate_domain::user::UserRole;

pub const USER_ID_HEADER: &str = "x-filmrate-user-id";
pub const USER_ROLE_HEADER: &str = "x-filmrate-user-role";

/// User identity injected by the gateway via `x-filmrate-user-id` and
/// `x-filmrate-user-role` headers.
///
/// Rejects with 401 if either header is absent or malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
    pub user_role: UserRole,
}

impl IdentityHeaders {
    pub fn is_admin(&self) -> bool {
        self.user_role.is_admin()
    }

    fn from_parts(parts: &Parts) -> Option<Self> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok())?;

        let user_role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<UserRole>().ok())?;

        Some(Self { user_id, user_role })
    }
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extract synchronously and return a 'static async block so the future does
    // not capture `parts`.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = Self::from_parts(parts);
        async move { identity.ok_or(AppError::Unauthorized) }
    }
}

/// Identity for routes that also serve anonymous callers.
#[derive(Debug, Clone, Copy)]
pub struct MaybeIdentity(pub Option<IdentityHeaders>);

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = IdentityHeaders::from_parts(parts);
        async move { Ok(Self(identity)) }
    }
}

/// Identity of an admin caller: 401 without identity, 403 for any other role.
#[derive(Debug, Clone, Copy)]
pub struct AdminIdentity(pub IdentityHeaders);

impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = IdentityHeaders::from_parts(parts);
        async move {
            let identity = identity.ok_or(AppError::Unauthorized)?;
            if !identity.is_admin() {
                return Err(AppError::Forbidden);
            }
            Ok(Self(identity))
        }
    }
}
