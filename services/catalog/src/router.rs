use axum::{
    Router,
    extract::State,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use filmrate_auth_types::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use filmrate_auth_types::token::{TokenSecret, bearer_identity};
use filmrate_core::error::AppError;
use filmrate_core::health::{healthz, readiness};
use filmrate_core::middleware::{propagate_request_id_layer, request_id_layer};
use filmrate_core::rate_limit::{RateLimiter, rate_limit};
use filmrate_core::response::ApiResponse;

use crate::config::CatalogConfig;
use crate::handlers::{admin, auth, lists, movies, reviews};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let limiter = RateLimiter::new(
        state.config.rate_limit_max_requests,
        state.config.rate_limit_period(),
    );
    let secret = TokenSecret(state.config.jwt_secret.as_str().into());

    let api = Router::new()
        .route("/", get(service_info))
        .nest("/auth", auth_routes())
        .nest("/movies", movie_routes())
        .nest("/reviews", review_routes())
        .nest("/lists", list_routes())
        .nest("/admin", admin_routes())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn_with_state(limiter, rate_limit))
                .layer(from_fn_with_state(secret, bearer_identity)),
        )
        .with_state(state.clone());

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .nest("/api", api)
        .fallback(not_found)
        .layer(cors_layer(&state.config))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/profile", get(auth::get_profile).put(auth::update_profile))
        .route("/me/ratings", get(auth::get_my_ratings))
        .route("/me/reviews", get(auth::get_my_reviews))
}

fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(movies::list_movies))
        .route("/search", get(movies::search_movies))
        .route("/filter", get(movies::search_movies))
        .route("/filter-options", get(movies::filter_options))
        .route("/autocomplete", get(movies::autocomplete))
        .route("/by-actor", get(movies::movies_by_actor))
        .route("/by-director", get(movies::movies_by_director))
        .route("/trending", get(movies::trending_movies))
        .route("/top-rated", get(movies::top_rated_movies))
        .route("/recommendations", get(movies::personalized_movies))
        .route("/homepage", get(movies::homepage))
        .route("/genres", get(movies::list_genres))
        .route("/genres/{id}/movies", get(movies::movies_by_genre))
        .route("/{id}", get(movies::get_movie))
        .route("/{id}/similar", get(movies::similar_movies))
        .route("/{id}/because-you-watched", get(movies::because_you_watched))
        .route(
            "/{id}/ratings",
            post(movies::create_rating)
                .put(movies::update_rating)
                .delete(movies::delete_rating),
        )
        .route("/{id}/ratings/me", get(movies::get_my_rating))
        .route("/{id}/ratings/distribution", get(movies::rating_distribution))
        .route("/{id}/ratings/stats", get(movies::rating_stats))
        .route(
            "/{id}/reviews",
            get(movies::list_movie_reviews).post(movies::create_review),
        )
}

fn review_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route(
            "/{id}/vote",
            post(reviews::vote_review).delete(reviews::remove_vote),
        )
}

fn list_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(lists::list_public_lists).post(lists::create_list))
        .route("/similar/{id}", get(movies::similar_movies))
        .route("/user/{id}", get(lists::list_user_lists))
        .route("/watchlist/me", get(lists::get_watchlist))
        .route(
            "/watchlist/{id}",
            post(lists::add_to_watchlist).delete(lists::remove_from_watchlist),
        )
        .route(
            "/{id}",
            get(lists::get_list)
                .put(lists::update_list)
                .delete(lists::delete_list),
        )
        .route(
            "/{id}/movies/{movie_id}",
            post(lists::add_list_movie).delete(lists::remove_list_movie),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::dashboard))
        .route("/users", get(admin::list_users))
        .route("/users/{id}", get(admin::get_user).delete(admin::delete_user))
        .route("/users/{id}/role", put(admin::set_user_role))
        .route("/users/{id}/status", put(admin::set_user_status))
        .route("/movies", post(admin::create_movie))
        .route(
            "/movies/{id}",
            put(admin::update_movie).delete(admin::delete_movie),
        )
        .route("/genres", post(admin::create_genre))
        .route("/actors", post(admin::create_actor))
        .route("/directors", post(admin::create_director))
        .route("/reviews", get(admin::list_reviews))
        .route("/reviews/{id}", axum::routing::delete(admin::delete_review))
        .route("/reviews/{id}/visibility", put(admin::set_review_visibility))
}

fn cors_layer(config: &CatalogConfig) -> CorsLayer {
    let origin = match HeaderValue::from_str(&config.client_url) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(e) => {
            tracing::warn!(error = %e, client_url = %config.client_url, "invalid CORS origin");
            AllowOrigin::list([])
        }
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(USER_ROLE_HEADER),
        ])
}

async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(state.db.ping().await)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

#[derive(Serialize)]
struct ServiceInfo {
    name: &'static str,
    version: &'static str,
    endpoints: [&'static str; 5],
}

async fn service_info() -> ApiResponse<ServiceInfo> {
    ApiResponse::ok(ServiceInfo {
        name: "FilmRate API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: [
            "/api/auth",
            "/api/movies",
            "/api/reviews",
            "/api/lists",
            "/api/admin",
        ],
    })
    .with_message("FilmRate API is running")
}
