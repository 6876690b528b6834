//! Mock auth helpers for integration tests.
//!
//! Services behind the gateway receive `x-filmrate-user-id` + `x-filmrate-user-role`
//! headers. `MockAuth` builds those headers directly so no gateway is needed.

use std::time::Duration;

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use uuid::Uuid;

use filmrate_auth_types::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use filmrate_auth_types::token::issue_access_token;
use filmrate_domain::user::UserRole;

/// Configurable identity injected into test requests.
#[derive(Debug, Clone, Copy)]
pub struct MockAuth {
    pub user_id: Uuid,
    pub user_role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, user_role: UserRole) -> Self {
        Self { user_id, user_role }
    }

    pub fn user() -> Self {
        Self::new(Uuid::new_v4(), UserRole::User)
    }

    pub fn admin() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Admin)
    }

    pub fn user_id_header(&self) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        )
    }

    pub fn user_role_header(&self) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from_static(self.user_role.as_str()),
        )
    }

    /// `Authorization: Bearer` header carrying a token signed with `secret`.
    pub fn bearer_header(&self, secret: &str) -> (HeaderName, HeaderValue) {
        let (token, _) = issue_access_token(
            self.user_id,
            self.user_role,
            secret,
            Duration::from_secs(3600),
        )
        .unwrap();
        (
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        )
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        let (name, value) = self.user_id_header();
        map.insert(name, value);
        let (name, value) = self.user_role_header();
        map.insert(name, value);
        map
    }
}
