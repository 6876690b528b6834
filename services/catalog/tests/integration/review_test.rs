use uuid::Uuid;

use filmrate_catalog::domain::types::ReviewSortBy;
use filmrate_catalog::error::CatalogError;
use filmrate_catalog::usecase::review::{
    CreateReviewInput, CreateReviewUseCase, DeleteReviewUseCase, GetReviewUseCase,
    ListMovieReviewsUseCase, RemoveVoteUseCase, SetReviewVisibilityUseCase, UpdateReviewInput,
    UpdateReviewUseCase, VoteReviewUseCase,
};
use filmrate_domain::pagination::PageRequest;
use filmrate_domain::vote::VoteType;

use crate::helpers::{MemStore, movie};

const CONTENT: &str = "A layered, inventive heist through dreams.";

async fn write_review(store: &MemStore, user_id: Uuid, movie_id: Uuid, rating: i64) -> Uuid {
    CreateReviewUseCase {
        movies: store.clone(),
        ratings: store.clone(),
        reviews: store.clone(),
    }
    .execute(
        user_id,
        movie_id,
        CreateReviewInput {
            rating,
            content: CONTENT.to_owned(),
        },
    )
    .await
    .unwrap()
    .id
}

fn votes(store: &MemStore) -> VoteReviewUseCase<MemStore, MemStore> {
    VoteReviewUseCase {
        reviews: store.clone(),
        votes: store.clone(),
    }
}

#[tokio::test]
async fn should_set_rating_when_reviewing() {
    let store = MemStore::new();
    let movie_id = store.add_movie(movie("Inception"));
    let user_id = Uuid::now_v7();

    write_review(&store, user_id, movie_id, 8).await;

    assert_eq!(store.rating(user_id, movie_id).unwrap().score, 8);
    let stored = store.movie(movie_id);
    assert_eq!(stored.average_rating, 8.0);
    assert_eq!(stored.total_ratings, 1);
    assert_eq!(stored.total_reviews, 1);
}

#[tokio::test]
async fn should_reject_second_review_for_same_movie() {
    let store = MemStore::new();
    let movie_id = store.add_movie(movie("Inception"));
    let user_id = Uuid::now_v7();
    write_review(&store, user_id, movie_id, 8).await;

    let err = CreateReviewUseCase {
        movies: store.clone(),
        ratings: store.clone(),
        reviews: store.clone(),
    }
    .execute(
        user_id,
        movie_id,
        CreateReviewInput {
            rating: 2,
            content: CONTENT.to_owned(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CatalogError::ReviewAlreadyExists));
    assert_eq!(store.rating(user_id, movie_id).unwrap().score, 8);
}

#[tokio::test]
async fn should_reject_short_content() {
    let store = MemStore::new();
    let movie_id = store.add_movie(movie("Inception"));

    let err = CreateReviewUseCase {
        movies: store.clone(),
        ratings: store.clone(),
        reviews: store.clone(),
    }
    .execute(
        Uuid::now_v7(),
        movie_id,
        CreateReviewInput {
            rating: 8,
            content: "  short   ".to_owned(),
        },
    )
    .await
    .unwrap_err();

    let CatalogError::Validation(errors) = err else {
        panic!("expected Validation");
    };
    assert_eq!(errors[0].field, "content");
}

#[tokio::test]
async fn should_mark_edited_and_sync_rating_on_update() {
    let store = MemStore::new();
    let movie_id = store.add_movie(movie("Inception"));
    let user_id = Uuid::now_v7();
    let review_id = write_review(&store, user_id, movie_id, 8).await;

    let update = UpdateReviewUseCase {
        movies: store.clone(),
        ratings: store.clone(),
        reviews: store.clone(),
    };
    let review = update
        .execute(
            user_id,
            review_id,
            UpdateReviewInput {
                rating: Some(4),
                content: None,
            },
        )
        .await
        .unwrap();

    assert!(review.is_edited);
    assert!(review.edited_at.is_some());
    assert_eq!(store.rating(user_id, movie_id).unwrap().score, 4);
    assert_eq!(store.movie(movie_id).average_rating, 4.0);

    let err = update
        .execute(
            Uuid::now_v7(),
            review_id,
            UpdateReviewInput {
                rating: Some(9),
                content: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Forbidden));
}

#[tokio::test]
async fn should_remove_rating_with_review() {
    let store = MemStore::new();
    let movie_id = store.add_movie(movie("Inception"));
    let (author, other) = (Uuid::now_v7(), Uuid::now_v7());
    let review_id = write_review(&store, author, movie_id, 2).await;
    store.add_rating(other, movie_id, 8);

    let delete = DeleteReviewUseCase {
        movies: store.clone(),
        ratings: store.clone(),
        reviews: store.clone(),
    };
    let err = delete.execute(other, false, review_id).await.unwrap_err();
    assert!(matches!(err, CatalogError::Forbidden));

    delete.execute(author, false, review_id).await.unwrap();

    assert!(store.review(review_id).is_none());
    assert!(store.rating(author, movie_id).is_none());
    let stored = store.movie(movie_id);
    assert_eq!(stored.average_rating, 8.0);
    assert_eq!(stored.total_ratings, 1);
    assert_eq!(stored.total_reviews, 0);
}

#[tokio::test]
async fn should_let_admin_delete_any_review() {
    let store = MemStore::new();
    let movie_id = store.add_movie(movie("Inception"));
    let review_id = write_review(&store, Uuid::now_v7(), movie_id, 5).await;

    DeleteReviewUseCase {
        movies: store.clone(),
        ratings: store.clone(),
        reviews: store.clone(),
    }
    .execute(Uuid::now_v7(), true, review_id)
    .await
    .unwrap();

    assert!(store.review(review_id).is_none());
}

#[tokio::test]
async fn should_count_votes_once_per_user() {
    let store = MemStore::new();
    let movie_id = store.add_movie(movie("Inception"));
    let author = Uuid::now_v7();
    let review_id = write_review(&store, author, movie_id, 9).await;
    let voter = Uuid::now_v7();

    let review = votes(&store)
        .execute(voter, review_id, VoteType::Helpful)
        .await
        .unwrap();
    assert_eq!(review.helpful_votes, 1);

    let err = votes(&store)
        .execute(voter, review_id, VoteType::Unhelpful)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::VoteAlreadyExists));

    let err = votes(&store)
        .execute(author, review_id, VoteType::Helpful)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::CannotVoteOwnReview));

    let remove = RemoveVoteUseCase {
        reviews: store.clone(),
        votes: store.clone(),
    };
    let review = remove.execute(voter, review_id).await.unwrap();
    assert_eq!(review.helpful_votes, 0);
    let err = remove.execute(voter, review_id).await.unwrap_err();
    assert!(matches!(err, CatalogError::VoteNotFound));
}

#[tokio::test]
async fn should_hide_reviews_from_public_reads() {
    let store = MemStore::new();
    let movie_id = store.add_movie(movie("Inception"));
    let review_id = write_review(&store, Uuid::now_v7(), movie_id, 9).await;
    write_review(&store, Uuid::now_v7(), movie_id, 6).await;

    SetReviewVisibilityUseCase {
        reviews: store.clone(),
    }
    .execute(review_id, true)
    .await
    .unwrap();

    let get = GetReviewUseCase {
        reviews: store.clone(),
    };
    assert!(matches!(
        get.execute(review_id, false).await.unwrap_err(),
        CatalogError::ReviewNotFound
    ));
    assert!(get.execute(review_id, true).await.unwrap().is_hidden);

    let page = ListMovieReviewsUseCase {
        movies: store.clone(),
        reviews: store.clone(),
    }
    .execute(movie_id, ReviewSortBy::default(), PageRequest::default())
    .await
    .unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.items[0].rating, 6);

    let err = votes(&store)
        .execute(Uuid::now_v7(), review_id, VoteType::Helpful)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::ReviewNotFound));
}
