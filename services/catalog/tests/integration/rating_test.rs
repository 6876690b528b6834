use uuid::Uuid;

use filmrate_catalog::error::CatalogError;
use filmrate_catalog::usecase::rating::{
    CreateRatingUseCase, DeleteRatingUseCase, GetRatingDistributionUseCase, GetRatingStatsUseCase,
    UpdateRatingUseCase,
};

use crate::helpers::{MemStore, movie};

fn create(store: &MemStore) -> CreateRatingUseCase<MemStore, MemStore, MemStore> {
    CreateRatingUseCase {
        movies: store.clone(),
        ratings: store.clone(),
        reviews: store.clone(),
    }
}

#[tokio::test]
async fn should_average_four_ratings_to_nine() {
    let store = MemStore::new();
    let movie_id = store.add_movie(movie("Inception"));

    for score in [8, 9, 9, 10] {
        create(&store)
            .execute(Uuid::now_v7(), movie_id, score)
            .await
            .unwrap();
    }

    let stored = store.movie(movie_id);
    assert_eq!(stored.average_rating, 9.0);
    assert_eq!(stored.total_ratings, 4);
}

#[tokio::test]
async fn should_reject_duplicate_rating_and_keep_original() {
    let store = MemStore::new();
    let movie_id = store.add_movie(movie("Inception"));
    let user_id = Uuid::now_v7();

    create(&store).execute(user_id, movie_id, 7).await.unwrap();
    let err = create(&store).execute(user_id, movie_id, 3).await.unwrap_err();

    assert!(matches!(err, CatalogError::RatingAlreadyExists));
    assert_eq!(store.rating(user_id, movie_id).unwrap().score, 7);
    assert_eq!(store.movie(movie_id).average_rating, 7.0);
}

#[tokio::test]
async fn should_validate_score_before_touching_the_store() {
    let store = MemStore::new();
    let movie_id = store.add_movie(movie("Inception"));

    let err = create(&store)
        .execute(Uuid::now_v7(), movie_id, 11)
        .await
        .unwrap_err();

    let CatalogError::Validation(errors) = err else {
        panic!("expected Validation");
    };
    assert_eq!(errors[0].field, "score");
    assert_eq!(store.movie(movie_id).total_ratings, 0);
}

#[tokio::test]
async fn should_not_rate_inactive_movie() {
    let store = MemStore::new();
    let mut hidden = movie("Retired");
    hidden.is_active = false;
    let movie_id = store.add_movie(hidden);

    let err = create(&store)
        .execute(Uuid::now_v7(), movie_id, 5)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::MovieNotFound));
}

#[tokio::test]
async fn should_recalculate_after_update_and_delete() {
    let store = MemStore::new();
    let movie_id = store.add_movie(movie("Inception"));
    let (alice, bob) = (Uuid::now_v7(), Uuid::now_v7());
    create(&store).execute(alice, movie_id, 6).await.unwrap();
    create(&store).execute(bob, movie_id, 8).await.unwrap();

    let update = UpdateRatingUseCase {
        movies: store.clone(),
        ratings: store.clone(),
        reviews: store.clone(),
    };
    let rating = update.execute(alice, movie_id, 9).await.unwrap();
    assert_eq!(rating.score, 9);
    assert_eq!(store.movie(movie_id).average_rating, 8.5);

    let delete = DeleteRatingUseCase {
        movies: store.clone(),
        ratings: store.clone(),
        reviews: store.clone(),
    };
    delete.execute(bob, movie_id).await.unwrap();
    delete.execute(alice, movie_id).await.unwrap();

    let stored = store.movie(movie_id);
    assert_eq!(stored.average_rating, 0.0);
    assert_eq!(stored.total_ratings, 0);

    let err = delete.execute(alice, movie_id).await.unwrap_err();
    assert!(matches!(err, CatalogError::RatingNotFound));
}

#[tokio::test]
async fn should_return_dense_distribution() {
    let store = MemStore::new();
    let movie_id = store.add_movie(movie("Inception"));
    for score in [10, 10, 3] {
        store.add_rating(Uuid::now_v7(), movie_id, score);
    }

    let dist = GetRatingDistributionUseCase {
        ratings: store.clone(),
    }
    .execute(movie_id)
    .await
    .unwrap();

    assert_eq!(dist.iter().count(), 10);
    assert_eq!(dist.get(10), 2);
    assert_eq!(dist.get(3), 1);
    assert_eq!(dist.get(1), 0);
}

#[tokio::test]
async fn should_report_stored_aggregate_in_stats() {
    let store = MemStore::new();
    let movie_id = store.add_movie(movie("Inception"));
    create(&store).execute(Uuid::now_v7(), movie_id, 7).await.unwrap();
    create(&store).execute(Uuid::now_v7(), movie_id, 8).await.unwrap();

    let stats = GetRatingStatsUseCase {
        movies: store.clone(),
        ratings: store.clone(),
    }
    .execute(movie_id)
    .await
    .unwrap();

    assert_eq!(stats.average_rating, 7.5);
    assert_eq!(stats.total_ratings, 2);
    assert_eq!(stats.distribution.total(), 2);
}
