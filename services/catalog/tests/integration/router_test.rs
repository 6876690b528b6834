use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use uuid::Uuid;

use filmrate_catalog::config::CatalogConfig;
use filmrate_catalog::router::build_router;
use filmrate_catalog::state::AppState;
use filmrate_testing::auth::MockAuth;

// The database is never reached: every request below is rejected by an
// extractor, validation or the rate limiter first.
fn server_with(config: CatalogConfig) -> TestServer {
    let state = AppState::new(DatabaseConnection::default(), config);
    TestServer::new(build_router(state)).unwrap()
}

fn server() -> TestServer {
    server_with(CatalogConfig::for_database("postgres://unused"))
}

fn as_caller(request: TestRequest, auth: MockAuth) -> TestRequest {
    let (id_name, id_value) = auth.user_id_header();
    let (role_name, role_value) = auth.user_role_header();
    request
        .add_header(id_name, id_value)
        .add_header(role_name, role_value)
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_liveness() {
    server().get("/healthz").await.assert_status_ok();
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    server()
        .get("/readyz")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_describe_the_api() {
    let response = server().get("/api").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "FilmRate API");
}

#[tokio::test]
async fn should_return_not_found_for_unknown_route() {
    let response = server().get("/api/nothing-here").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "NOT_FOUND");
}

// ── Identity ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_identity_for_own_rating() {
    let response = server()
        .get(&format!("/api/movies/{}/ratings/me", Uuid::now_v7()))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_forbid_admin_routes_to_regular_users() {
    let server = server();

    let response = as_caller(server.get("/api/admin/stats"), MockAuth::user()).await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = server.get("/api/admin/users").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_read_identity_from_bearer_token() {
    let secret = CatalogConfig::for_database("postgres://unused").jwt_secret;
    let server = server();

    let (name, value) = MockAuth::user().bearer_header(&secret);
    let response = server.get("/api/admin/stats").add_header(name, value).await;
    response.assert_status(StatusCode::FORBIDDEN);

    let (name, value) = MockAuth::user().bearer_header(&secret);
    let response = server.post("/api/auth/logout").add_header(name, value).await;
    response.assert_status_ok();
}

#[tokio::test]
async fn should_reject_invalid_bearer_token() {
    let server = server();

    let (name, value) = MockAuth::admin().bearer_header("some-other-secret");
    let response = server.get("/api/admin/stats").add_header(name, value).await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .get("/api/movies/top-rated")
        .add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_static("Bearer garbage"),
        )
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ── Auth ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_identity_for_logout() {
    let server = server();

    server
        .post("/api/auth/logout")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = as_caller(server.post("/api/auth/logout"), MockAuth::user()).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Logout successful");
}

#[tokio::test]
async fn should_validate_registration_before_lookup() {
    let response = server()
        .post("/api/auth/register")
        .json(&json!({ "username": "ab", "email": "nope", "password": "short" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "VALIDATION_FAILED");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert!(fields.contains(&"username"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn should_require_login_password() {
    let response = server()
        .post("/api/auth/login")
        .json(&json!({ "email": "ann@example.com", "password": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["field"], "password");
    assert_eq!(body["errors"][0]["message"], "Password is required");
}

// ── Validation ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_malformed_path_id() {
    let response = server().get("/api/reviews/not-a-uuid").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "VALIDATION_FAILED");
    assert_eq!(body["errors"][0]["message"], "Invalid ID format");
}

#[tokio::test]
async fn should_reject_out_of_scale_score() {
    let request = server()
        .post(&format!("/api/movies/{}/ratings", Uuid::now_v7()))
        .json(&json!({ "score": 11 }));
    let response = as_caller(request, MockAuth::user()).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["field"], "score");
    assert_eq!(body["errors"][0]["message"], "Rating must be between 1 and 10");
}

#[tokio::test]
async fn should_reject_unparseable_body() {
    let request = server()
        .post(&format!("/api/movies/{}/ratings", Uuid::now_v7()))
        .text("not json");
    let response = as_caller(request, MockAuth::user()).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["field"], "body");
}

#[tokio::test]
async fn should_reject_unknown_vote_type() {
    let request = server()
        .post(&format!("/api/reviews/{}/vote", Uuid::now_v7()))
        .json(&json!({ "voteType": "meh" }));
    let response = as_caller(request, MockAuth::user()).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["field"], "voteType");
}

// ── Layers ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_attach_request_id() {
    let response = server().get("/healthz").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_allow_configured_origin() {
    let response = server()
        .get("/healthz")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("http://localhost:3000"),
        )
        .await;
    assert_eq!(
        response.header("access-control-allow-origin"),
        "http://localhost:3000"
    );
    assert_eq!(response.header("access-control-allow-credentials"), "true");
}

#[tokio::test]
async fn should_throttle_api_after_request_budget() {
    let config = CatalogConfig {
        rate_limit_max_requests: 2,
        ..CatalogConfig::for_database("postgres://unused")
    };
    let server = server_with(config);

    let from = |ip: &'static str| {
        server
            .get("/api/reviews/bad-id")
            .add_header(
                HeaderName::from_static("x-forwarded-for"),
                HeaderValue::from_static(ip),
            )
    };

    from("10.0.0.1").await.assert_status(StatusCode::BAD_REQUEST);
    from("10.0.0.1").await.assert_status(StatusCode::BAD_REQUEST);

    let response = from("10.0.0.1").await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json();
    assert_eq!(body["kind"], "TOO_MANY_REQUESTS");

    // Another client keeps its own budget.
    from("10.0.0.2").await.assert_status(StatusCode::BAD_REQUEST);
    server.get("/healthz").await.assert_status_ok();
}
