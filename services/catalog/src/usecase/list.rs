use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use filmrate_domain::pagination::{PageRequest, Paginated};

use crate::domain::repository::{ListRepository, MovieRepository};
use crate::domain::types::{ListFilter, MovieList};
use crate::domain::validate::{self, LIST_DESCRIPTION_MAX};
use crate::error::CatalogError;

/// Load a list the caller owns. Lists the caller cannot see read as missing;
/// visible lists owned by someone else are forbidden.
async fn owned_list<L: ListRepository>(
    lists: &L,
    list_id: Uuid,
    user_id: Uuid,
) -> Result<MovieList, CatalogError> {
    let list = lists
        .find_by_id(list_id)
        .await?
        .ok_or(CatalogError::ListNotFound)?;
    if list.user_id == user_id {
        Ok(list)
    } else if list.is_public {
        Err(CatalogError::Forbidden)
    } else {
        Err(CatalogError::ListNotFound)
    }
}

async fn list_page<L: ListRepository>(
    lists: &L,
    filter: ListFilter,
    page: PageRequest,
) -> Result<Paginated<MovieList>, CatalogError> {
    let items = lists.list(filter, page).await?;
    let total = lists.count(filter).await?;
    Ok(Paginated::new(items, page, total))
}

// ── CreateList ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct CreateListInput {
    pub name: String,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

pub struct CreateListUseCase<L: ListRepository> {
    pub lists: L,
}

impl<L: ListRepository> CreateListUseCase<L> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: CreateListInput,
    ) -> Result<MovieList, CatalogError> {
        let mut errors = Vec::new();
        validate::list_name(&input.name, &mut errors);
        if let Some(description) = &input.description {
            validate::max_len("description", description, LIST_DESCRIPTION_MAX, &mut errors);
        }
        validate::into_result(errors)?;

        let now = Utc::now();
        let list = MovieList {
            id: Uuid::now_v7(),
            user_id,
            name: input.name.trim().to_owned(),
            description: input.description,
            is_public: input.is_public.unwrap_or(true),
            movies: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.lists.create(&list).await?;
        info!(list_id = %list.id, %user_id, "list created");
        Ok(list)
    }
}

// ── GetList ──────────────────────────────────────────────────────────────────

pub struct GetListUseCase<L: ListRepository> {
    pub lists: L,
}

impl<L: ListRepository> GetListUseCase<L> {
    /// Private lists are only visible to their owner.
    pub async fn execute(
        &self,
        list_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<MovieList, CatalogError> {
        match self.lists.find_by_id(list_id).await? {
            Some(list) if list.is_public || viewer == Some(list.user_id) => Ok(list),
            _ => Err(CatalogError::ListNotFound),
        }
    }
}

// ── ListPublicLists ──────────────────────────────────────────────────────────

pub struct ListPublicListsUseCase<L: ListRepository> {
    pub lists: L,
}

impl<L: ListRepository> ListPublicListsUseCase<L> {
    pub async fn execute(&self, page: PageRequest) -> Result<Paginated<MovieList>, CatalogError> {
        let filter = ListFilter {
            owner_id: None,
            public_only: true,
        };
        list_page(&self.lists, filter, page).await
    }
}

// ── ListUserLists ────────────────────────────────────────────────────────────

pub struct ListUserListsUseCase<L: ListRepository> {
    pub lists: L,
}

impl<L: ListRepository> ListUserListsUseCase<L> {
    pub async fn execute(
        &self,
        owner_id: Uuid,
        viewer: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Paginated<MovieList>, CatalogError> {
        let filter = ListFilter {
            owner_id: Some(owner_id),
            public_only: viewer != Some(owner_id),
        };
        list_page(&self.lists, filter, page).await
    }
}

// ── UpdateList ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct UpdateListInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

pub struct UpdateListUseCase<L: ListRepository> {
    pub lists: L,
}

impl<L: ListRepository> UpdateListUseCase<L> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        list_id: Uuid,
        input: UpdateListInput,
    ) -> Result<MovieList, CatalogError> {
        let mut errors = Vec::new();
        if let Some(name) = &input.name {
            validate::list_name(name, &mut errors);
        }
        if let Some(description) = &input.description {
            validate::max_len("description", description, LIST_DESCRIPTION_MAX, &mut errors);
        }
        validate::into_result(errors)?;

        let mut list = owned_list(&self.lists, list_id, user_id).await?;
        if let Some(name) = input.name {
            list.name = name.trim().to_owned();
        }
        if let Some(description) = input.description {
            list.description = Some(description);
        }
        if let Some(is_public) = input.is_public {
            list.is_public = is_public;
        }
        list.updated_at = Utc::now();
        self.lists.update(&list).await?;
        info!(%list_id, %user_id, "list updated");
        Ok(list)
    }
}

// ── DeleteList ───────────────────────────────────────────────────────────────

pub struct DeleteListUseCase<L: ListRepository> {
    pub lists: L,
}

impl<L: ListRepository> DeleteListUseCase<L> {
    pub async fn execute(
        &self,
        actor_id: Uuid,
        is_admin: bool,
        list_id: Uuid,
    ) -> Result<(), CatalogError> {
        if !is_admin {
            owned_list(&self.lists, list_id, actor_id).await?;
        }
        if !self.lists.delete(list_id).await? {
            return Err(CatalogError::ListNotFound);
        }
        info!(%list_id, %actor_id, is_admin, "list deleted");
        Ok(())
    }
}

// ── AddMovieToList ───────────────────────────────────────────────────────────

pub struct AddMovieToListUseCase<L: ListRepository, M: MovieRepository> {
    pub lists: L,
    pub movies: M,
}

impl<L: ListRepository, M: MovieRepository> AddMovieToListUseCase<L, M> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        list_id: Uuid,
        movie_id: Uuid,
    ) -> Result<MovieList, CatalogError> {
        owned_list(&self.lists, list_id, user_id).await?;
        match self.movies.find_by_id(movie_id).await? {
            Some(movie) if movie.is_active => {}
            _ => return Err(CatalogError::MovieNotFound),
        }
        self.lists.add_movie(list_id, movie_id).await?;
        info!(%list_id, %movie_id, "movie added to list");
        self.lists
            .find_by_id(list_id)
            .await?
            .ok_or(CatalogError::ListNotFound)
    }
}

// ── RemoveMovieFromList ──────────────────────────────────────────────────────

pub struct RemoveMovieFromListUseCase<L: ListRepository> {
    pub lists: L,
}

impl<L: ListRepository> RemoveMovieFromListUseCase<L> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        list_id: Uuid,
        movie_id: Uuid,
    ) -> Result<MovieList, CatalogError> {
        owned_list(&self.lists, list_id, user_id).await?;
        if !self.lists.remove_movie(list_id, movie_id).await? {
            return Err(CatalogError::MovieNotInList);
        }
        info!(%list_id, %movie_id, "movie removed from list");
        self.lists
            .find_by_id(list_id)
            .await?
            .ok_or(CatalogError::ListNotFound)
    }
}
