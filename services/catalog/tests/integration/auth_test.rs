use std::time::Duration;

use filmrate_auth_types::token::validate_access_token;
use filmrate_catalog::error::CatalogError;
use filmrate_catalog::usecase::auth::{
    LoginInput, LoginUseCase, RegisterInput, RegisterUseCase, TokenConfig,
};
use filmrate_domain::user::UserRole;

use crate::helpers::MemStore;

const SECRET: &str = "auth-test-secret";
const PASSWORD: &str = "Secret123";

fn tokens() -> TokenConfig {
    TokenConfig {
        secret: SECRET.to_owned(),
        ttl: Duration::from_secs(3600),
    }
}

fn register(store: &MemStore) -> RegisterUseCase<MemStore> {
    RegisterUseCase {
        users: store.clone(),
        tokens: tokens(),
        bcrypt_cost: 4, // bcrypt minimum cost (bcrypt::MIN_COST is private)
    }
}

fn login(store: &MemStore) -> LoginUseCase<MemStore> {
    LoginUseCase {
        users: store.clone(),
        tokens: tokens(),
    }
}

fn signup(username: &str, email: &str) -> RegisterInput {
    RegisterInput {
        username: username.to_owned(),
        email: email.to_owned(),
        password: PASSWORD.to_owned(),
    }
}

fn credentials(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: email.to_owned(),
        password: password.to_owned(),
    }
}

fn invalid_fields(err: CatalogError) -> Vec<String> {
    match err {
        CatalogError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn should_register_regular_user_with_valid_token() {
    let store = MemStore::new();

    let session = register(&store)
        .execute(signup("ann", " Ann@Example.com "))
        .await
        .unwrap();

    assert_eq!(session.user.email, "ann@example.com");
    assert_eq!(session.user.role, UserRole::User);
    assert!(session.user.is_active);

    let info = validate_access_token(&session.token, SECRET).unwrap();
    assert_eq!(info.user_id, session.user.id);
    assert_eq!(info.user_role, UserRole::User);
    assert_eq!(info.exp, session.expires_at);

    let hash = store.with(|d| d.passwords[0].1.clone());
    assert_ne!(hash, PASSWORD);
}

#[tokio::test]
async fn should_reject_taken_email_and_username() {
    let store = MemStore::new();
    register(&store)
        .execute(signup("ann", "ann@example.com"))
        .await
        .unwrap();

    let err = register(&store)
        .execute(signup("other", "ANN@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::EmailTaken));

    let err = register(&store)
        .execute(signup("ann", "other@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::UsernameTaken));

    assert_eq!(store.with(|d| d.users.len()), 1);
}

#[tokio::test]
async fn should_reject_weak_registration() {
    let store = MemStore::new();

    let err = register(&store)
        .execute(RegisterInput {
            username: "bad name".to_owned(),
            email: "ann@example".to_owned(),
            password: "alllowercase1".to_owned(),
        })
        .await
        .unwrap_err();

    assert_eq!(invalid_fields(err), ["username", "email", "password"]);
    assert!(store.with(|d| d.users.is_empty()));
}

#[tokio::test]
async fn should_login_with_registered_password() {
    let store = MemStore::new();
    let registered = register(&store)
        .execute(signup("ann", "ann@example.com"))
        .await
        .unwrap();

    let session = login(&store)
        .execute(credentials("ANN@example.com", PASSWORD))
        .await
        .unwrap();

    assert_eq!(session.user.id, registered.user.id);
    let info = validate_access_token(&session.token, SECRET).unwrap();
    assert_eq!(info.user_id, registered.user.id);
}

#[tokio::test]
async fn should_reject_wrong_password_and_unknown_email_alike() {
    let store = MemStore::new();
    register(&store)
        .execute(signup("ann", "ann@example.com"))
        .await
        .unwrap();

    let err = login(&store)
        .execute(credentials("ann@example.com", "Secret124"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidCredentials));

    let err = login(&store)
        .execute(credentials("bob@example.com", PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidCredentials));
}

#[tokio::test]
async fn should_refuse_login_to_deactivated_account() {
    let store = MemStore::new();
    let registered = register(&store)
        .execute(signup("ann", "ann@example.com"))
        .await
        .unwrap();
    store.with(|d| {
        if let Some(user) = d.users.iter_mut().find(|u| u.id == registered.user.id) {
            user.is_active = false;
        }
    });

    let err = login(&store)
        .execute(credentials("ann@example.com", PASSWORD))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::AccountDeactivated));
}

#[tokio::test]
async fn should_require_login_fields() {
    let store = MemStore::new();

    let err = login(&store)
        .execute(credentials("not-an-email", ""))
        .await
        .unwrap_err();
    assert_eq!(invalid_fields(err), ["email", "password"]);
}
