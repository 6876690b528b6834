use chrono::{Datelike, Utc};
use uuid::Uuid;

use filmrate_catalog::domain::filter::MovieSort;
use filmrate_catalog::domain::types::{Movie, PersonKind};
use filmrate_catalog::usecase::search::{
    AdvancedSearchUseCase, AutocompleteUseCase, FALLBACK_MIN_YEAR, GetFilterOptionsUseCase,
    SearchByPersonUseCase, SearchParams,
};
use filmrate_domain::pagination::PageRequest;

use crate::helpers::{MemStore, genre, movie, named, person};

fn seeded() -> (MemStore, Uuid) {
    let store = MemStore::new();
    let scifi = store.add_genre(genre("Sci-Fi"));

    let mut inception = movie("Inception");
    inception.release_year = 2010;
    inception.average_rating = 8.8;
    inception.genres = vec![named(scifi, "Sci-Fi")];
    store.add_movie(inception);

    let mut amelie = movie("Amelie");
    amelie.release_year = 2001;
    amelie.average_rating = 8.3;
    amelie.country = Some("France".to_owned());
    amelie.language = Some("French".to_owned());
    store.add_movie(amelie);

    let mut arrival = movie("Arrival");
    arrival.release_year = 2016;
    arrival.average_rating = 7.9;
    arrival.description = "Linguist meets visitors from a dream".to_owned();
    arrival.genres = vec![named(scifi, "Sci-Fi")];
    store.add_movie(arrival);

    (store, scifi)
}

fn titles(movies: &[Movie]) -> Vec<&str> {
    movies.iter().map(|m| m.title.as_str()).collect()
}

#[tokio::test]
async fn should_match_text_in_title_or_description() {
    let (store, _) = seeded();
    let params = SearchParams {
        query: Some("DREAM".to_owned()),
        ..SearchParams::default()
    };

    let page = AdvancedSearchUseCase {
        movies: store.clone(),
    }
    .execute(&params, PageRequest::default())
    .await
    .unwrap();

    assert_eq!(titles(&page.items), ["Arrival"]);
    assert_eq!(page.pagination.total, 1);
}

#[tokio::test]
async fn should_combine_genre_and_year_constraints() {
    let (store, scifi) = seeded();
    let params = SearchParams {
        genres: vec![scifi],
        year_from: Some(2012),
        ..SearchParams::default()
    };

    let page = AdvancedSearchUseCase {
        movies: store.clone(),
    }
    .execute(&params, PageRequest::default())
    .await
    .unwrap();

    assert_eq!(titles(&page.items), ["Arrival"]);
}

#[tokio::test]
async fn should_paginate_with_total_and_pages() {
    let (store, _) = seeded();
    let params = SearchParams {
        sort: MovieSort::from_key("title").unwrap(),
        ..SearchParams::default()
    };

    let page = AdvancedSearchUseCase {
        movies: store.clone(),
    }
    .execute(&params, PageRequest::new(2, 2))
    .await
    .unwrap();

    assert_eq!(titles(&page.items), ["Inception"]);
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.pages, 2);
}

#[tokio::test]
async fn should_find_movies_by_actor_name_substring() {
    let store = MemStore::new();
    let dicaprio = person("Leonardo DiCaprio");
    store.with(|d| d.actors.push(dicaprio.clone()));
    let mut inception = movie("Inception");
    inception.actors = vec![named(dicaprio.id, &dicaprio.name)];
    store.add_movie(inception);
    store.add_movie(movie("Amelie"));

    let search = SearchByPersonUseCase {
        movies: store.clone(),
        catalog: store.clone(),
    };
    let movies = search.execute(PersonKind::Actor, "caprio").await.unwrap();
    assert_eq!(titles(&movies), ["Inception"]);

    let none = search.execute(PersonKind::Actor, "nobody").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn should_suggest_across_titles_people_and_genres() {
    let (store, _) = seeded();
    store.with(|d| d.directors.push(person("Denis Villeneuve")));

    let autocomplete = AutocompleteUseCase {
        movies: store.clone(),
        catalog: store.clone(),
    };
    let suggestions = autocomplete.execute("i").await.unwrap();
    assert!(suggestions.movies.iter().any(|m| m.title == "Inception"));
    assert_eq!(suggestions.directors.len(), 1);
    assert_eq!(suggestions.genres.len(), 1);

    let blank = autocomplete.execute("   ").await.unwrap();
    assert!(blank.movies.is_empty());
    assert!(blank.genres.is_empty());
}

#[tokio::test]
async fn should_collect_filter_options() {
    let (store, _) = seeded();

    let options = GetFilterOptionsUseCase {
        movies: store.clone(),
        catalog: store.clone(),
    }
    .execute()
    .await
    .unwrap();

    assert_eq!(options.genres.len(), 1);
    assert_eq!(options.year_range.min_year, 2001);
    assert_eq!(options.year_range.max_year, 2016);
    assert_eq!(options.countries, ["France", "United States"]);
    assert_eq!(options.languages, ["English", "French"]);
}

#[tokio::test]
async fn should_fall_back_to_default_year_range_for_empty_catalog() {
    let store = MemStore::new();

    let options = GetFilterOptionsUseCase {
        movies: store.clone(),
        catalog: store.clone(),
    }
    .execute()
    .await
    .unwrap();

    assert_eq!(options.year_range.min_year, FALLBACK_MIN_YEAR);
    assert_eq!(options.year_range.max_year, Utc::now().year());
    assert!(options.countries.is_empty());
}
