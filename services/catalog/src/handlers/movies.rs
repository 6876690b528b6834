use axum::extract::{Path, RawQuery, State};
use serde::{Deserialize, Serialize};

use filmrate_auth_types::identity::{IdentityHeaders, MaybeIdentity};
use filmrate_core::response::ApiResponse;
use filmrate_domain::pagination::Pagination;
use filmrate_domain::rating::Distribution;

use crate::domain::filter::MovieSort;
use crate::domain::types::{PersonKind, ReviewSortBy};
use crate::error::CatalogError;
use crate::handlers::{
    GenreResponse, JsonBody, MovieRefResponse, MovieResponse, PersonResponse, RatingResponse,
    ReviewResponse, id_list, movies_response, parse_query, path_id, reviews_response,
};
use crate::state::AppState;
use crate::usecase::movie::{GetMovieUseCase, ListGenresUseCase, ListMoviesUseCase};
use crate::usecase::rating::{
    CreateRatingUseCase, DeleteRatingUseCase, GetRatingDistributionUseCase,
    GetRatingStatsUseCase, GetUserRatingUseCase, UpdateRatingUseCase,
};
use crate::usecase::recommendation::{
    BY_GENRE_LIMIT, DEFAULT_LIMIT, DEFAULT_MIN_RATINGS, GetBecauseYouWatchedUseCase,
    GetHomepageUseCase, GetMoviesByGenreUseCase, GetPersonalizedUseCase, GetSimilarMoviesUseCase,
    GetTopRatedMoviesUseCase, GetTrendingMoviesUseCase,
};
use crate::usecase::review::{CreateReviewInput, CreateReviewUseCase, ListMovieReviewsUseCase};
use crate::usecase::search::{
    AdvancedSearchUseCase, AutocompleteUseCase, GetFilterOptionsUseCase, SearchByPersonUseCase,
    SearchParams,
};

fn sort_or_default(key: Option<&str>) -> MovieSort {
    key.and_then(MovieSort::from_key).unwrap_or_default()
}

/// Caller-supplied limit for fixed-size rankings, capped like page sizes.
fn ranking_limit(state: &AppState, raw: Option<u64>, default: u64) -> u64 {
    raw.unwrap_or(default)
        .clamp(1, u64::from(state.config.max_page_size))
}

#[derive(Serialize)]
pub struct MoviesData {
    pub movies: Vec<MovieResponse>,
}

#[derive(Serialize)]
pub struct MovieData {
    pub movie: MovieResponse,
}

#[derive(Serialize)]
pub struct MoviesPage {
    pub movies: Vec<MovieResponse>,
    pub pagination: Pagination,
}

// ── GET /api/movies ──────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ListMoviesQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
}

pub async fn list_movies(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<MoviesPage>, CatalogError> {
    let query: ListMoviesQuery = parse_query(raw.as_deref())?;
    let usecase = ListMoviesUseCase {
        movies: state.movie_repo(),
    };
    let page = usecase
        .execute(
            sort_or_default(query.sort.as_deref()),
            state.page(query.page, query.limit),
        )
        .await?;
    Ok(ApiResponse::ok(MoviesPage {
        movies: movies_response(page.items),
        pagination: page.pagination,
    }))
}

// ── GET /api/movies/search, /api/movies/filter ───────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(alias = "query")]
    pub q: Option<String>,
    pub genres: Option<String>,
    pub actors: Option<String>,
    pub directors: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub rating_from: Option<f64>,
    pub rating_to: Option<f64>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn search_movies(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<MoviesPage>, CatalogError> {
    let query: SearchQuery = parse_query(raw.as_deref())?;
    let params = SearchParams {
        genres: id_list("genres", query.genres.as_deref())?,
        actors: id_list("actors", query.actors.as_deref())?,
        directors: id_list("directors", query.directors.as_deref())?,
        sort: sort_or_default(query.sort.as_deref()),
        query: query.q,
        year_from: query.year_from,
        year_to: query.year_to,
        rating_from: query.rating_from,
        rating_to: query.rating_to,
        country: query.country,
        language: query.language,
    };
    let usecase = AdvancedSearchUseCase {
        movies: state.movie_repo(),
    };
    let page = usecase
        .execute(&params, state.page(query.page, query.limit))
        .await?;
    Ok(ApiResponse::ok(MoviesPage {
        movies: movies_response(page.items),
        pagination: page.pagination,
    }))
}

// ── GET /api/movies/by-actor, /api/movies/by-director ────────────────────────

#[derive(Deserialize, Default)]
pub struct PersonQuery {
    pub name: Option<String>,
}

async fn movies_by_person(
    state: AppState,
    kind: PersonKind,
    raw: Option<String>,
) -> Result<ApiResponse<MoviesData>, CatalogError> {
    let query: PersonQuery = parse_query(raw.as_deref())?;
    let name = query.name.unwrap_or_default();
    if name.trim().is_empty() {
        return Err(CatalogError::invalid("name", "Name is required"));
    }
    let usecase = SearchByPersonUseCase {
        movies: state.movie_repo(),
        catalog: state.catalog_repo(),
    };
    let movies = usecase.execute(kind, name.trim()).await?;
    Ok(ApiResponse::ok(MoviesData {
        movies: movies_response(movies),
    }))
}

pub async fn movies_by_actor(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<MoviesData>, CatalogError> {
    movies_by_person(state, PersonKind::Actor, raw).await
}

pub async fn movies_by_director(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<MoviesData>, CatalogError> {
    movies_by_person(state, PersonKind::Director, raw).await
}

// ── GET /api/movies/autocomplete ─────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct AutocompleteQuery {
    #[serde(alias = "query")]
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct SuggestionsData {
    pub movies: Vec<MovieRefResponse>,
    pub actors: Vec<PersonResponse>,
    pub directors: Vec<PersonResponse>,
    pub genres: Vec<GenreResponse>,
}

pub async fn autocomplete(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<SuggestionsData>, CatalogError> {
    let query: AutocompleteQuery = parse_query(raw.as_deref())?;
    let usecase = AutocompleteUseCase {
        movies: state.movie_repo(),
        catalog: state.catalog_repo(),
    };
    let suggestions = usecase.execute(query.q.as_deref().unwrap_or_default()).await?;
    Ok(ApiResponse::ok(SuggestionsData {
        movies: suggestions.movies.into_iter().map(Into::into).collect(),
        actors: suggestions.actors.into_iter().map(Into::into).collect(),
        directors: suggestions.directors.into_iter().map(Into::into).collect(),
        genres: suggestions.genres.into_iter().map(Into::into).collect(),
    }))
}

// ── GET /api/movies/filter-options ───────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRangeResponse {
    pub min_year: i32,
    pub max_year: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptionsData {
    pub genres: Vec<GenreResponse>,
    pub year_range: YearRangeResponse,
    pub countries: Vec<String>,
    pub languages: Vec<String>,
}

pub async fn filter_options(
    State(state): State<AppState>,
) -> Result<ApiResponse<FilterOptionsData>, CatalogError> {
    let usecase = GetFilterOptionsUseCase {
        movies: state.movie_repo(),
        catalog: state.catalog_repo(),
    };
    let options = usecase.execute().await?;
    Ok(ApiResponse::ok(FilterOptionsData {
        genres: options.genres.into_iter().map(Into::into).collect(),
        year_range: YearRangeResponse {
            min_year: options.year_range.min_year,
            max_year: options.year_range.max_year,
        },
        countries: options.countries,
        languages: options.languages,
    }))
}

// ── GET /api/movies/trending, /api/movies/top-rated ──────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RankingQuery {
    pub limit: Option<u64>,
    pub min_ratings: Option<i64>,
    pub sort: Option<String>,
}

pub async fn trending_movies(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<MoviesData>, CatalogError> {
    let query: RankingQuery = parse_query(raw.as_deref())?;
    let usecase = GetTrendingMoviesUseCase {
        movies: state.movie_repo(),
    };
    let movies = usecase
        .execute(ranking_limit(&state, query.limit, DEFAULT_LIMIT))
        .await?;
    Ok(ApiResponse::ok(MoviesData {
        movies: movies_response(movies),
    }))
}

pub async fn top_rated_movies(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<MoviesData>, CatalogError> {
    let query: RankingQuery = parse_query(raw.as_deref())?;
    let usecase = GetTopRatedMoviesUseCase {
        movies: state.movie_repo(),
    };
    let movies = usecase
        .execute(
            ranking_limit(&state, query.limit, DEFAULT_LIMIT),
            query.min_ratings.unwrap_or(DEFAULT_MIN_RATINGS).max(0),
        )
        .await?;
    Ok(ApiResponse::ok(MoviesData {
        movies: movies_response(movies),
    }))
}

// ── GET /api/movies/recommendations ──────────────────────────────────────────

pub async fn personalized_movies(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<MoviesData>, CatalogError> {
    let query: RankingQuery = parse_query(raw.as_deref())?;
    let usecase = GetPersonalizedUseCase {
        movies: state.movie_repo(),
        ratings: state.rating_repo(),
        watchlist: state.watchlist_repo(),
    };
    let movies = usecase
        .execute(
            identity.user_id,
            ranking_limit(&state, query.limit, DEFAULT_LIMIT),
        )
        .await?;
    Ok(ApiResponse::ok(MoviesData {
        movies: movies_response(movies),
    }))
}

// ── GET /api/movies/homepage ─────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomepageData {
    pub trending: Vec<MovieResponse>,
    pub top_rated: Vec<MovieResponse>,
    pub recently_added: Vec<MovieResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub for_you: Option<Vec<MovieResponse>>,
}

pub async fn homepage(
    MaybeIdentity(identity): MaybeIdentity,
    State(state): State<AppState>,
) -> Result<ApiResponse<HomepageData>, CatalogError> {
    let usecase = GetHomepageUseCase {
        movies: state.movie_repo(),
        ratings: state.rating_repo(),
        watchlist: state.watchlist_repo(),
    };
    let home = usecase.execute(identity.map(|i| i.user_id)).await?;
    Ok(ApiResponse::ok(HomepageData {
        trending: movies_response(home.trending),
        top_rated: movies_response(home.top_rated),
        recently_added: movies_response(home.recently_added),
        for_you: home.for_you.map(movies_response),
    }))
}

// ── GET /api/movies/genres ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct GenresData {
    pub genres: Vec<GenreResponse>,
}

pub async fn list_genres(
    State(state): State<AppState>,
) -> Result<ApiResponse<GenresData>, CatalogError> {
    let usecase = ListGenresUseCase {
        catalog: state.catalog_repo(),
    };
    let genres = usecase.execute().await?;
    Ok(ApiResponse::ok(GenresData {
        genres: genres.into_iter().map(Into::into).collect(),
    }))
}

// ── GET /api/movies/genres/{id}/movies ───────────────────────────────────────

pub async fn movies_by_genre(
    State(state): State<AppState>,
    Path(genre_id): Path<String>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<MoviesData>, CatalogError> {
    let genre_id = path_id(&genre_id)?;
    let query: RankingQuery = parse_query(raw.as_deref())?;
    let usecase = GetMoviesByGenreUseCase {
        movies: state.movie_repo(),
        catalog: state.catalog_repo(),
    };
    let movies = usecase
        .execute(
            genre_id,
            sort_or_default(query.sort.as_deref()),
            ranking_limit(&state, query.limit, BY_GENRE_LIMIT),
        )
        .await?;
    Ok(ApiResponse::ok(MoviesData {
        movies: movies_response(movies),
    }))
}

// ── GET /api/movies/{id} ─────────────────────────────────────────────────────

pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<ApiResponse<MovieData>, CatalogError> {
    let movie_id = path_id(&movie_id)?;
    let usecase = GetMovieUseCase {
        movies: state.movie_repo(),
    };
    let movie = usecase.execute(movie_id).await?;
    Ok(ApiResponse::ok(MovieData {
        movie: movie.into(),
    }))
}

// ── GET /api/movies/{id}/similar ─────────────────────────────────────────────

pub async fn similar_movies(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<MoviesData>, CatalogError> {
    let movie_id = path_id(&movie_id)?;
    let query: RankingQuery = parse_query(raw.as_deref())?;
    let usecase = GetSimilarMoviesUseCase {
        movies: state.movie_repo(),
    };
    let movies = usecase
        .execute(movie_id, ranking_limit(&state, query.limit, DEFAULT_LIMIT))
        .await?;
    Ok(ApiResponse::ok(MoviesData {
        movies: movies_response(movies),
    }))
}

// ── GET /api/movies/{id}/because-you-watched ─────────────────────────────────

pub async fn because_you_watched(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<MoviesData>, CatalogError> {
    let movie_id = path_id(&movie_id)?;
    let query: RankingQuery = parse_query(raw.as_deref())?;
    let usecase = GetBecauseYouWatchedUseCase {
        movies: state.movie_repo(),
        ratings: state.rating_repo(),
    };
    let movies = usecase
        .execute(
            identity.user_id,
            movie_id,
            ranking_limit(&state, query.limit, DEFAULT_LIMIT),
        )
        .await?;
    Ok(ApiResponse::ok(MoviesData {
        movies: movies_response(movies),
    }))
}

// ── Ratings: /api/movies/{id}/ratings ────────────────────────────────────────

#[derive(Serialize)]
pub struct DistributionData {
    pub distribution: Distribution,
}

pub async fn rating_distribution(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<ApiResponse<DistributionData>, CatalogError> {
    let movie_id = path_id(&movie_id)?;
    let usecase = GetRatingDistributionUseCase {
        ratings: state.rating_repo(),
    };
    let distribution = usecase.execute(movie_id).await?;
    Ok(ApiResponse::ok(DistributionData { distribution }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStatsData {
    pub average_rating: f64,
    pub total_ratings: i64,
    pub distribution: Distribution,
}

pub async fn rating_stats(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<ApiResponse<RatingStatsData>, CatalogError> {
    let movie_id = path_id(&movie_id)?;
    let usecase = GetRatingStatsUseCase {
        movies: state.movie_repo(),
        ratings: state.rating_repo(),
    };
    let stats = usecase.execute(movie_id).await?;
    Ok(ApiResponse::ok(RatingStatsData {
        average_rating: stats.average_rating,
        total_ratings: stats.total_ratings,
        distribution: stats.distribution,
    }))
}

#[derive(Serialize)]
pub struct RatingData {
    pub rating: RatingResponse,
}

pub async fn get_my_rating(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<ApiResponse<RatingData>, CatalogError> {
    let movie_id = path_id(&movie_id)?;
    let usecase = GetUserRatingUseCase {
        ratings: state.rating_repo(),
    };
    let rating = usecase.execute(identity.user_id, movie_id).await?;
    Ok(ApiResponse::ok(RatingData {
        rating: rating.into(),
    }))
}

#[derive(Deserialize)]
pub struct ScoreRequest {
    pub score: i64,
}

pub async fn create_rating(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    JsonBody(body): JsonBody<ScoreRequest>,
) -> Result<ApiResponse<RatingData>, CatalogError> {
    let movie_id = path_id(&movie_id)?;
    let usecase = CreateRatingUseCase {
        movies: state.movie_repo(),
        ratings: state.rating_repo(),
        reviews: state.review_repo(),
    };
    let rating = usecase
        .execute(identity.user_id, movie_id, body.score)
        .await?;
    Ok(ApiResponse::created(
        "Rating submitted successfully",
        RatingData {
            rating: rating.into(),
        },
    ))
}

pub async fn update_rating(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    JsonBody(body): JsonBody<ScoreRequest>,
) -> Result<ApiResponse<RatingData>, CatalogError> {
    let movie_id = path_id(&movie_id)?;
    let usecase = UpdateRatingUseCase {
        movies: state.movie_repo(),
        ratings: state.rating_repo(),
        reviews: state.review_repo(),
    };
    let rating = usecase
        .execute(identity.user_id, movie_id, body.score)
        .await?;
    Ok(ApiResponse::ok(RatingData {
        rating: rating.into(),
    })
    .with_message("Rating updated successfully"))
}

pub async fn delete_rating(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<ApiResponse<()>, CatalogError> {
    let movie_id = path_id(&movie_id)?;
    let usecase = DeleteRatingUseCase {
        movies: state.movie_repo(),
        ratings: state.rating_repo(),
        reviews: state.review_repo(),
    };
    usecase.execute(identity.user_id, movie_id).await?;
    Ok(ApiResponse::message("Rating deleted successfully"))
}

// ── Reviews: /api/movies/{id}/reviews ────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct MovieReviewsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
}

#[derive(Serialize)]
pub struct ReviewsPage {
    pub reviews: Vec<ReviewResponse>,
    pub pagination: Pagination,
}

pub async fn list_movie_reviews(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<ReviewsPage>, CatalogError> {
    let movie_id = path_id(&movie_id)?;
    let query: MovieReviewsQuery = parse_query(raw.as_deref())?;
    let sort_by = query
        .sort
        .as_deref()
        .and_then(ReviewSortBy::from_key)
        .unwrap_or_default();
    let usecase = ListMovieReviewsUseCase {
        movies: state.movie_repo(),
        reviews: state.review_repo(),
    };
    let page = usecase
        .execute(movie_id, sort_by, state.page(query.page, query.limit))
        .await?;
    Ok(ApiResponse::ok(ReviewsPage {
        reviews: reviews_response(page.items),
        pagination: page.pagination,
    }))
}

#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i64,
    pub content: String,
}

#[derive(Serialize)]
pub struct ReviewData {
    pub review: ReviewResponse,
}

pub async fn create_review(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    JsonBody(body): JsonBody<CreateReviewRequest>,
) -> Result<ApiResponse<ReviewData>, CatalogError> {
    let movie_id = path_id(&movie_id)?;
    let usecase = CreateReviewUseCase {
        movies: state.movie_repo(),
        ratings: state.rating_repo(),
        reviews: state.review_repo(),
    };
    let review = usecase
        .execute(
            identity.user_id,
            movie_id,
            CreateReviewInput {
                rating: body.rating,
                content: body.content,
            },
        )
        .await?;
    Ok(ApiResponse::created(
        "Review created successfully",
        ReviewData {
            review: review.into(),
        },
    ))
}
