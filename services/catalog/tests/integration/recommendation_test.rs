use uuid::Uuid;

use filmrate_catalog::domain::types::Movie;
use filmrate_catalog::error::CatalogError;
use filmrate_catalog::usecase::recommendation::{
    GetBecauseYouWatchedUseCase, GetHomepageUseCase, GetPersonalizedUseCase,
    GetSimilarMoviesUseCase, GetTopRatedMoviesUseCase, GetTrendingMoviesUseCase,
};

use crate::helpers::{MemStore, at, movie, named};

fn popular(title: &str, views: i64, average_rating: f64, total_ratings: i64) -> Movie {
    let mut m = movie(title);
    m.views = views;
    m.average_rating = average_rating;
    m.total_ratings = total_ratings;
    m
}

fn titles(movies: &[Movie]) -> Vec<&str> {
    movies.iter().map(|m| m.title.as_str()).collect()
}

#[tokio::test]
async fn should_rank_trending_by_views() {
    let store = MemStore::new();
    store.add_movie(popular("Quiet", 5, 9.0, 20));
    store.add_movie(popular("Loud", 500, 6.0, 20));
    let mut retired = popular("Retired", 9000, 9.9, 20);
    retired.is_active = false;
    store.add_movie(retired);

    let movies = GetTrendingMoviesUseCase {
        movies: store.clone(),
    }
    .execute(10)
    .await
    .unwrap();

    assert_eq!(titles(&movies), ["Loud", "Quiet"]);
}

#[tokio::test]
async fn should_require_minimum_ratings_for_top_rated() {
    let store = MemStore::new();
    store.add_movie(popular("Niche", 0, 9.8, 3));
    store.add_movie(popular("Classic", 0, 9.1, 400));
    store.add_movie(popular("Solid", 0, 8.0, 50));

    let movies = GetTopRatedMoviesUseCase {
        movies: store.clone(),
    }
    .execute(10, 10)
    .await
    .unwrap();

    assert_eq!(titles(&movies), ["Classic", "Solid"]);
}

#[tokio::test]
async fn should_suggest_movies_sharing_a_genre_and_exclude_self() {
    let store = MemStore::new();
    let (scifi, drama) = (Uuid::now_v7(), Uuid::now_v7());
    let mut base = movie("Inception");
    base.genres = vec![named(scifi, "Sci-Fi")];
    let base_id = store.add_movie(base);
    let mut sibling = movie("Interstellar");
    sibling.genres = vec![named(scifi, "Sci-Fi"), named(drama, "Drama")];
    store.add_movie(sibling);
    let mut other = movie("Notebook");
    other.genres = vec![named(drama, "Drama")];
    store.add_movie(other);

    let movies = GetSimilarMoviesUseCase {
        movies: store.clone(),
    }
    .execute(base_id, 10)
    .await
    .unwrap();

    assert_eq!(titles(&movies), ["Interstellar"]);

    let err = GetSimilarMoviesUseCase {
        movies: store.clone(),
    }
    .execute(Uuid::now_v7(), 10)
    .await
    .unwrap_err();
    assert!(matches!(err, CatalogError::MovieNotFound));
}

#[tokio::test]
async fn should_fall_back_to_trending_without_liked_movies() {
    let store = MemStore::new();
    store.add_movie(popular("Popular", 100, 7.0, 10));
    let disliked = store.add_movie(popular("Disliked", 1, 7.0, 10));
    let user_id = Uuid::now_v7();
    store.add_rating(user_id, disliked, 3);

    let movies = GetPersonalizedUseCase {
        movies: store.clone(),
        ratings: store.clone(),
        watchlist: store.clone(),
    }
    .execute(user_id, 10)
    .await
    .unwrap();

    assert_eq!(titles(&movies), ["Popular", "Disliked"]);
}

#[tokio::test]
async fn should_personalize_from_liked_genres() {
    let store = MemStore::new();
    let (scifi, romance) = (Uuid::now_v7(), Uuid::now_v7());
    let user_id = Uuid::now_v7();

    let mut liked = popular("Inception", 0, 8.8, 100);
    liked.genres = vec![named(scifi, "Sci-Fi")];
    let liked_id = store.add_movie(liked);
    store.add_rating(user_id, liked_id, 9);

    let mut candidate = popular("Arrival", 0, 7.9, 60);
    candidate.genres = vec![named(scifi, "Sci-Fi")];
    store.add_movie(candidate);

    let mut watchlisted = popular("Dune", 0, 8.1, 60);
    watchlisted.genres = vec![named(scifi, "Sci-Fi")];
    let watchlisted_id = store.add_movie(watchlisted);
    store.with(|d| d.watchlist.push((user_id, watchlisted_id, at(2))));

    let mut obscure = popular("Obscure", 0, 9.5, 2);
    obscure.genres = vec![named(scifi, "Sci-Fi")];
    store.add_movie(obscure);

    let mut unrelated = popular("Notebook", 0, 9.0, 60);
    unrelated.genres = vec![named(romance, "Romance")];
    store.add_movie(unrelated);

    let movies = GetPersonalizedUseCase {
        movies: store.clone(),
        ratings: store.clone(),
        watchlist: store.clone(),
    }
    .execute(user_id, 10)
    .await
    .unwrap();

    assert_eq!(titles(&movies), ["Arrival"]);
}

#[tokio::test]
async fn should_match_genre_or_director_for_because_you_watched() {
    let store = MemStore::new();
    let (scifi, nolan) = (Uuid::now_v7(), Uuid::now_v7());
    let user_id = Uuid::now_v7();

    let mut seed = movie("Inception");
    seed.genres = vec![named(scifi, "Sci-Fi")];
    seed.directors = vec![named(nolan, "Christopher Nolan")];
    let seed_id = store.add_movie(seed);

    let mut same_director = movie("Memento");
    same_director.directors = vec![named(nolan, "Christopher Nolan")];
    store.add_movie(same_director);

    let mut same_genre = movie("Arrival");
    same_genre.genres = vec![named(scifi, "Sci-Fi")];
    let rated_id = store.add_movie(same_genre);
    store.add_rating(user_id, rated_id, 6);

    store.add_movie(movie("Unrelated"));

    let movies = GetBecauseYouWatchedUseCase {
        movies: store.clone(),
        ratings: store.clone(),
    }
    .execute(user_id, seed_id, 10)
    .await
    .unwrap();

    assert_eq!(titles(&movies), ["Memento"]);
}

#[tokio::test]
async fn should_only_personalize_homepage_for_signed_in_users() {
    let store = MemStore::new();
    store.add_movie(popular("Popular", 100, 7.0, 20));
    let homepage = GetHomepageUseCase {
        movies: store.clone(),
        ratings: store.clone(),
        watchlist: store.clone(),
    };

    let anonymous = homepage.execute(None).await.unwrap();
    assert!(anonymous.for_you.is_none());
    assert_eq!(titles(&anonymous.trending), ["Popular"]);
    assert_eq!(titles(&anonymous.top_rated), ["Popular"]);
    assert_eq!(titles(&anonymous.recently_added), ["Popular"]);

    let signed_in = homepage.execute(Some(Uuid::now_v7())).await.unwrap();
    assert_eq!(signed_in.for_you.map(|m| m.len()), Some(1));
}

#[tokio::test]
async fn should_return_genre_sharing_pool_best_rated_first() {
    let store = MemStore::new();
    let (action, drama, comedy) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());
    let mut base = movie("Heat");
    base.genres = vec![named(action, "Action"), named(drama, "Drama")];
    let base_id = store.add_movie(base);

    for (title, rating, genre_id) in [
        ("Ronin", 7.2, action),
        ("Collateral", 7.5, drama),
        ("Thief", 7.4, action),
        ("Airplane", 7.7, comedy),
        ("Clue", 7.3, comedy),
    ] {
        let mut m = popular(title, 0, rating, 20);
        m.genres = vec![named(genre_id, "x")];
        store.add_movie(m);
    }

    let movies = GetSimilarMoviesUseCase {
        movies: store.clone(),
    }
    .execute(base_id, 10)
    .await
    .unwrap();

    assert_eq!(titles(&movies), ["Collateral", "Thief", "Ronin"]);
}
