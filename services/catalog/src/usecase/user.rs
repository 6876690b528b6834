use tracing::info;
use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::domain::validate::{self, BIO_MAX};
use crate::error::CatalogError;

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetProfileUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, CatalogError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(CatalogError::UserNotFound)
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<User, CatalogError> {
        let username = input.username.as_deref().map(str::trim);
        let mut errors = Vec::new();
        if let Some(username) = username {
            validate::username(username, &mut errors);
        }
        if let Some(bio) = &input.bio {
            validate::max_len("bio", bio, BIO_MAX, &mut errors);
        }
        if let Some(avatar) = input.avatar.as_deref().filter(|a| !a.is_empty()) {
            validate::url("avatar", avatar, &mut errors);
        }
        validate::into_result(errors)?;

        let updated = self
            .users
            .update_profile(user_id, username, input.bio.as_deref(), input.avatar.as_deref())
            .await?;
        if !updated {
            return Err(CatalogError::UserNotFound);
        }
        info!(%user_id, username_changed = username.is_some(), "profile updated");

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(CatalogError::UserNotFound)
    }
}
