use std::time::Duration;

use anyhow::Context as _;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use filmrate_auth_types::token::issue_access_token;
use filmrate_core::error::FieldError;
use filmrate_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::domain::validate;
use crate::error::CatalogError;

/// Token settings shared by register and login.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl: Duration,
}

/// A signed-in user and their access token.
#[derive(Debug)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
    pub expires_at: u64,
}

fn open_session(user: User, tokens: &TokenConfig) -> Result<AuthSession, CatalogError> {
    let (token, expires_at) = issue_access_token(user.id, user.role, &tokens.secret, tokens.ttl)
        .context("issue access token")?;
    Ok(AuthSession {
        user,
        token,
        expires_at,
    })
}

/// Emails are matched case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

async fn hash_password(password: String, cost: u32) -> Result<String, CatalogError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("password hashing task")?
        .context("hash password")?;
    Ok(hash)
}

async fn verify_password(password: String, hash: String) -> Result<bool, CatalogError> {
    let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("password check task")?
        .context("verify password")?;
    Ok(ok)
}

// ── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct RegisterUseCase<U: UserRepository> {
    pub users: U,
    pub tokens: TokenConfig,
    pub bcrypt_cost: u32,
}

impl<U: UserRepository> RegisterUseCase<U> {
    /// Create a regular, active account and sign it in.
    pub async fn execute(&self, input: RegisterInput) -> Result<AuthSession, CatalogError> {
        let username = input.username.trim().to_owned();
        let email = normalize_email(&input.email);
        let mut errors = Vec::new();
        validate::username(&username, &mut errors);
        validate::email(&email, &mut errors);
        validate::new_password(&input.password, &mut errors);
        validate::into_result(errors)?;

        if self.users.find_credentials(&email).await?.is_some() {
            return Err(CatalogError::EmailTaken);
        }
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(CatalogError::UsernameTaken);
        }

        let password_hash = hash_password(input.password, self.bcrypt_cost).await?;
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username,
            email,
            role: UserRole::User,
            bio: None,
            avatar: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user, &password_hash).await?;
        info!(user_id = %user.id, username = %user.username, "user registered");

        open_session(user, &self.tokens)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
    pub tokens: TokenConfig,
}

impl<U: UserRepository> LoginUseCase<U> {
    /// Unknown email and wrong password fail the same way; a deactivated
    /// account is reported before the password is checked.
    pub async fn execute(&self, input: LoginInput) -> Result<AuthSession, CatalogError> {
        let email = normalize_email(&input.email);
        let mut errors = Vec::new();
        validate::email(&email, &mut errors);
        if input.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }
        validate::into_result(errors)?;

        let credentials = self
            .users
            .find_credentials(&email)
            .await?
            .ok_or(CatalogError::InvalidCredentials)?;
        if !credentials.user.is_active {
            return Err(CatalogError::AccountDeactivated);
        }
        if !verify_password(input.password, credentials.password_hash).await? {
            return Err(CatalogError::InvalidCredentials);
        }
        info!(user_id = %credentials.user.id, "user logged in");

        open_session(credentials.user, &self.tokens)
    }
}
