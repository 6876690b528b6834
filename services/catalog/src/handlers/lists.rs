use axum::extract::{Path, RawQuery, State};
use serde::{Deserialize, Serialize};

use filmrate_auth_types::identity::{IdentityHeaders, MaybeIdentity};
use filmrate_core::response::ApiResponse;
use filmrate_domain::pagination::Pagination;

use crate::error::CatalogError;
use crate::handlers::{EntryResponse, JsonBody, ListResponse, parse_query, path_id};
use crate::state::AppState;
use crate::usecase::list::{
    AddMovieToListUseCase, CreateListInput, CreateListUseCase, DeleteListUseCase, GetListUseCase,
    ListPublicListsUseCase, ListUserListsUseCase, RemoveMovieFromListUseCase, UpdateListInput,
    UpdateListUseCase,
};
use crate::usecase::watchlist::{
    AddToWatchlistUseCase, GetWatchlistUseCase, RemoveFromWatchlistUseCase,
};

#[derive(Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct ListsPage {
    pub lists: Vec<ListResponse>,
    pub pagination: Pagination,
}

#[derive(Serialize)]
pub struct ListData {
    pub list: ListResponse,
}

// ── GET /api/lists ───────────────────────────────────────────────────────────

pub async fn list_public_lists(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<ListsPage>, CatalogError> {
    let query: PageQuery = parse_query(raw.as_deref())?;
    let usecase = ListPublicListsUseCase {
        lists: state.list_repo(),
    };
    let page = usecase.execute(state.page(query.page, query.limit)).await?;
    Ok(ApiResponse::ok(ListsPage {
        lists: page.items.into_iter().map(Into::into).collect(),
        pagination: page.pagination,
    }))
}

// ── GET /api/lists/user/{userId} ─────────────────────────────────────────────

pub async fn list_user_lists(
    MaybeIdentity(identity): MaybeIdentity,
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
    RawQuery(raw): RawQuery,
) -> Result<ApiResponse<ListsPage>, CatalogError> {
    let owner_id = path_id(&owner_id)?;
    let query: PageQuery = parse_query(raw.as_deref())?;
    let usecase = ListUserListsUseCase {
        lists: state.list_repo(),
    };
    let page = usecase
        .execute(
            owner_id,
            identity.map(|i| i.user_id),
            state.page(query.page, query.limit),
        )
        .await?;
    Ok(ApiResponse::ok(ListsPage {
        lists: page.items.into_iter().map(Into::into).collect(),
        pagination: page.pagination,
    }))
}

// ── GET /api/lists/{id} ──────────────────────────────────────────────────────

pub async fn get_list(
    MaybeIdentity(identity): MaybeIdentity,
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> Result<ApiResponse<ListData>, CatalogError> {
    let list_id = path_id(&list_id)?;
    let usecase = GetListUseCase {
        lists: state.list_repo(),
    };
    let list = usecase
        .execute(list_id, identity.map(|i| i.user_id))
        .await?;
    Ok(ApiResponse::ok(ListData { list: list.into() }))
}

// ── POST /api/lists ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    pub name: String,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

pub async fn create_list(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateListRequest>,
) -> Result<ApiResponse<ListData>, CatalogError> {
    let usecase = CreateListUseCase {
        lists: state.list_repo(),
    };
    let list = usecase
        .execute(
            identity.user_id,
            CreateListInput {
                name: body.name,
                description: body.description,
                is_public: body.is_public,
            },
        )
        .await?;
    Ok(ApiResponse::created(
        "List created successfully",
        ListData { list: list.into() },
    ))
}

// ── PUT /api/lists/{id} ──────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

pub async fn update_list(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    JsonBody(body): JsonBody<UpdateListRequest>,
) -> Result<ApiResponse<ListData>, CatalogError> {
    let list_id = path_id(&list_id)?;
    let usecase = UpdateListUseCase {
        lists: state.list_repo(),
    };
    let list = usecase
        .execute(
            identity.user_id,
            list_id,
            UpdateListInput {
                name: body.name,
                description: body.description,
                is_public: body.is_public,
            },
        )
        .await?;
    Ok(ApiResponse::ok(ListData { list: list.into() })
        .with_message("Resource updated successfully"))
}

// ── DELETE /api/lists/{id} ───────────────────────────────────────────────────

pub async fn delete_list(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> Result<ApiResponse<()>, CatalogError> {
    let list_id = path_id(&list_id)?;
    let usecase = DeleteListUseCase {
        lists: state.list_repo(),
    };
    usecase
        .execute(identity.user_id, identity.is_admin(), list_id)
        .await?;
    Ok(ApiResponse::message("Resource deleted successfully"))
}

// ── POST/DELETE /api/lists/{id}/movies/{movieId} ─────────────────────────────

pub async fn add_list_movie(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((list_id, movie_id)): Path<(String, String)>,
) -> Result<ApiResponse<ListData>, CatalogError> {
    let list_id = path_id(&list_id)?;
    let movie_id = path_id(&movie_id)?;
    let usecase = AddMovieToListUseCase {
        lists: state.list_repo(),
        movies: state.movie_repo(),
    };
    let list = usecase
        .execute(identity.user_id, list_id, movie_id)
        .await?;
    Ok(ApiResponse::ok(ListData { list: list.into() }).with_message("Movie added to list"))
}

pub async fn remove_list_movie(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((list_id, movie_id)): Path<(String, String)>,
) -> Result<ApiResponse<ListData>, CatalogError> {
    let list_id = path_id(&list_id)?;
    let movie_id = path_id(&movie_id)?;
    let usecase = RemoveMovieFromListUseCase {
        lists: state.list_repo(),
    };
    let list = usecase
        .execute(identity.user_id, list_id, movie_id)
        .await?;
    Ok(ApiResponse::ok(ListData { list: list.into() }).with_message("Movie removed from list"))
}

// ── Watchlist ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct WatchlistData {
    pub watchlist: Vec<EntryResponse>,
}

pub async fn get_watchlist(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<ApiResponse<WatchlistData>, CatalogError> {
    let usecase = GetWatchlistUseCase {
        watchlist: state.watchlist_repo(),
    };
    let entries = usecase.execute(identity.user_id).await?;
    Ok(ApiResponse::ok(WatchlistData {
        watchlist: entries.into_iter().map(Into::into).collect(),
    }))
}

pub async fn add_to_watchlist(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<ApiResponse<()>, CatalogError> {
    let movie_id = path_id(&movie_id)?;
    let usecase = AddToWatchlistUseCase {
        movies: state.movie_repo(),
        watchlist: state.watchlist_repo(),
    };
    usecase.execute(identity.user_id, movie_id).await?;
    Ok(ApiResponse::message("Movie added to watchlist"))
}

pub async fn remove_from_watchlist(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<ApiResponse<()>, CatalogError> {
    let movie_id = path_id(&movie_id)?;
    let usecase = RemoveFromWatchlistUseCase {
        watchlist: state.watchlist_repo(),
    };
    usecase.execute(identity.user_id, movie_id).await?;
    Ok(ApiResponse::message("Movie removed from watchlist"))
}
