use uuid::Uuid;

use filmrate_catalog::error::CatalogError;
use filmrate_catalog::usecase::list::{
    AddMovieToListUseCase, CreateListInput, CreateListUseCase, DeleteListUseCase, GetListUseCase,
    ListUserListsUseCase, RemoveMovieFromListUseCase, UpdateListInput, UpdateListUseCase,
};
use filmrate_catalog::usecase::watchlist::{
    AddToWatchlistUseCase, GetWatchlistUseCase, RemoveFromWatchlistUseCase,
};
use filmrate_domain::pagination::PageRequest;

use crate::helpers::{MemStore, movie};

async fn new_list(store: &MemStore, owner: Uuid, name: &str, is_public: Option<bool>) -> Uuid {
    CreateListUseCase {
        lists: store.clone(),
    }
    .execute(
        owner,
        CreateListInput {
            name: name.to_owned(),
            description: None,
            is_public,
        },
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn should_default_new_lists_to_public() {
    let store = MemStore::new();
    let owner = Uuid::now_v7();
    let list_id = new_list(&store, owner, "  Favorites ", None).await;

    let list = GetListUseCase {
        lists: store.clone(),
    }
    .execute(list_id, None)
    .await
    .unwrap();
    assert!(list.is_public);
    assert_eq!(list.name, "Favorites");
}

#[tokio::test]
async fn should_hide_private_lists_from_other_viewers() {
    let store = MemStore::new();
    let owner = Uuid::now_v7();
    let private_id = new_list(&store, owner, "Secret", Some(false)).await;
    new_list(&store, owner, "Shared", Some(true)).await;

    let get = GetListUseCase {
        lists: store.clone(),
    };
    assert!(get.execute(private_id, Some(owner)).await.is_ok());
    assert!(matches!(
        get.execute(private_id, Some(Uuid::now_v7())).await.unwrap_err(),
        CatalogError::ListNotFound
    ));

    let listing = ListUserListsUseCase {
        lists: store.clone(),
    };
    let own = listing
        .execute(owner, Some(owner), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(own.pagination.total, 2);
    let other = listing
        .execute(owner, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(other.pagination.total, 1);
    assert_eq!(other.items[0].name, "Shared");
}

#[tokio::test]
async fn should_forbid_editing_someone_elses_public_list() {
    let store = MemStore::new();
    let owner = Uuid::now_v7();
    let list_id = new_list(&store, owner, "Shared", Some(true)).await;

    let update = UpdateListUseCase {
        lists: store.clone(),
    };
    let err = update
        .execute(
            Uuid::now_v7(),
            list_id,
            UpdateListInput {
                name: Some("Hijacked".to_owned()),
                ..UpdateListInput::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Forbidden));

    let list = update
        .execute(
            owner,
            list_id,
            UpdateListInput {
                is_public: Some(false),
                ..UpdateListInput::default()
            },
        )
        .await
        .unwrap();
    assert!(!list.is_public);
    assert_eq!(list.name, "Shared");
}

#[tokio::test]
async fn should_add_each_movie_once() {
    let store = MemStore::new();
    let owner = Uuid::now_v7();
    let list_id = new_list(&store, owner, "Favorites", None).await;
    let movie_id = store.add_movie(movie("Inception"));

    let add = AddMovieToListUseCase {
        lists: store.clone(),
        movies: store.clone(),
    };
    let list = add.execute(owner, list_id, movie_id).await.unwrap();
    assert_eq!(list.movies.len(), 1);
    assert_eq!(list.movies[0].movie.title, "Inception");

    let err = add.execute(owner, list_id, movie_id).await.unwrap_err();
    assert!(matches!(err, CatalogError::MovieAlreadyInList));

    let remove = RemoveMovieFromListUseCase {
        lists: store.clone(),
    };
    let list = remove.execute(owner, list_id, movie_id).await.unwrap();
    assert!(list.movies.is_empty());
    let err = remove.execute(owner, list_id, movie_id).await.unwrap_err();
    assert!(matches!(err, CatalogError::MovieNotInList));
}

#[tokio::test]
async fn should_let_admin_delete_any_list() {
    let store = MemStore::new();
    let list_id = new_list(&store, Uuid::now_v7(), "Private", Some(false)).await;
    let delete = DeleteListUseCase {
        lists: store.clone(),
    };

    let err = delete
        .execute(Uuid::now_v7(), false, list_id)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::ListNotFound));

    delete.execute(Uuid::now_v7(), true, list_id).await.unwrap();
    assert!(store.with(|d| d.lists.is_empty()));
}

#[tokio::test]
async fn should_keep_watchlist_entries_unique() {
    let store = MemStore::new();
    let user_id = Uuid::now_v7();
    let first = store.add_movie(movie("Inception"));
    let second = store.add_movie(movie("Arrival"));

    let add = AddToWatchlistUseCase {
        movies: store.clone(),
        watchlist: store.clone(),
    };
    add.execute(user_id, first).await.unwrap();
    add.execute(user_id, second).await.unwrap();
    let err = add.execute(user_id, first).await.unwrap_err();
    assert!(matches!(err, CatalogError::AlreadyInWatchlist));

    let err = add.execute(user_id, Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(err, CatalogError::MovieNotFound));

    let entries = GetWatchlistUseCase {
        watchlist: store.clone(),
    }
    .execute(user_id)
    .await
    .unwrap();
    assert_eq!(entries.len(), 2);

    let remove = RemoveFromWatchlistUseCase {
        watchlist: store.clone(),
    };
    remove.execute(user_id, first).await.unwrap();
    let err = remove.execute(user_id, first).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotInWatchlist));
}
