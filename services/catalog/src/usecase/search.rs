use chrono::{Datelike, Utc};
use uuid::Uuid;

use filmrate_domain::pagination::{PageRequest, Paginated};

use crate::domain::filter::{MovieFilter, MovieQuery, MovieSort};
use crate::domain::repository::{CatalogRepository, MovieRepository};
use crate::domain::types::{FilterOptions, Movie, PersonKind, Suggestions, YearRange};
use crate::error::CatalogError;

pub const PERSON_SEARCH_LIMIT: u64 = 20;
pub const SUGGESTION_LIMIT: u64 = 5;
pub const FALLBACK_MIN_YEAR: i32 = 1900;

/// Caller-supplied search parameters. Empty strings and empty id sets mean
/// "no constraint".
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub query: Option<String>,
    pub genres: Vec<Uuid>,
    pub actors: Vec<Uuid>,
    pub directors: Vec<Uuid>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub rating_from: Option<f64>,
    pub rating_to: Option<f64>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub sort: MovieSort,
}

impl SearchParams {
    pub fn to_filter(&self) -> MovieFilter {
        let non_blank = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        let mut filter = MovieFilter::active()
            .year_between(self.year_from, self.year_to)
            .rating_between(self.rating_from, self.rating_to);
        if let Some(query) = non_blank(&self.query) {
            filter = filter.text(query);
        }
        if !self.genres.is_empty() {
            filter = filter.any_genre(self.genres.clone());
        }
        if !self.actors.is_empty() {
            filter = filter.any_actor(self.actors.clone());
        }
        if !self.directors.is_empty() {
            filter = filter.any_director(self.directors.clone());
        }
        if let Some(country) = non_blank(&self.country) {
            filter = filter.country(country);
        }
        if let Some(language) = non_blank(&self.language) {
            filter = filter.language(language);
        }
        filter
    }
}

// ── AdvancedSearch ───────────────────────────────────────────────────────────

pub struct AdvancedSearchUseCase<M: MovieRepository> {
    pub movies: M,
}

impl<M: MovieRepository> AdvancedSearchUseCase<M> {
    pub async fn execute(
        &self,
        params: &SearchParams,
        page: PageRequest,
    ) -> Result<Paginated<Movie>, CatalogError> {
        let filter = params.to_filter();
        let search = async {
            let total = self.movies.count(&filter).await?;
            let movies = self
                .movies
                .find(&MovieQuery {
                    filter: filter.clone(),
                    sort: params.sort,
                    offset: page.offset(),
                    limit: u64::from(page.limit),
                })
                .await?;
            Ok::<_, CatalogError>(Paginated::new(movies, page, total))
        };
        search.await.map_err(|e| e.context("Search error"))
    }
}

// ── SearchByPerson ───────────────────────────────────────────────────────────

pub struct SearchByPersonUseCase<M: MovieRepository, C: CatalogRepository> {
    pub movies: M,
    pub catalog: C,
}

impl<M: MovieRepository, C: CatalogRepository> SearchByPersonUseCase<M, C> {
    /// Active movies featuring any actor (or director) whose name contains
    /// `name`, best rated first.
    pub async fn execute(&self, kind: PersonKind, name: &str) -> Result<Vec<Movie>, CatalogError> {
        let people = self.catalog.search_people(kind, name, None).await?;
        if people.is_empty() {
            return Ok(Vec::new());
        }
        let ids = people.into_iter().map(|p| p.id).collect();
        let filter = match kind {
            PersonKind::Actor => MovieFilter::active().any_actor(ids),
            PersonKind::Director => MovieFilter::active().any_director(ids),
        };
        self.movies
            .find(&MovieQuery::top(
                filter,
                MovieSort::default(),
                PERSON_SEARCH_LIMIT,
            ))
            .await
    }
}

// ── Autocomplete ─────────────────────────────────────────────────────────────

pub struct AutocompleteUseCase<M: MovieRepository, C: CatalogRepository> {
    pub movies: M,
    pub catalog: C,
}

impl<M: MovieRepository, C: CatalogRepository> AutocompleteUseCase<M, C> {
    pub async fn execute(&self, query: &str) -> Result<Suggestions, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Suggestions::default());
        }
        let movies = self
            .movies
            .find(&MovieQuery::top(
                MovieFilter::active().title(query),
                MovieSort::default(),
                SUGGESTION_LIMIT,
            ))
            .await?
            .iter()
            .map(Movie::to_ref)
            .collect();
        let actors = self
            .catalog
            .search_people(PersonKind::Actor, query, Some(SUGGESTION_LIMIT))
            .await?;
        let directors = self
            .catalog
            .search_people(PersonKind::Director, query, Some(SUGGESTION_LIMIT))
            .await?;
        let genres = self.catalog.search_genres(query, SUGGESTION_LIMIT).await?;
        Ok(Suggestions {
            movies,
            actors,
            directors,
            genres,
        })
    }
}

// ── GetFilterOptions ─────────────────────────────────────────────────────────

pub struct GetFilterOptionsUseCase<M: MovieRepository, C: CatalogRepository> {
    pub movies: M,
    pub catalog: C,
}

impl<M: MovieRepository, C: CatalogRepository> GetFilterOptionsUseCase<M, C> {
    pub async fn execute(&self) -> Result<FilterOptions, CatalogError> {
        let genres = self.catalog.list_genres().await?;
        let year_range = self
            .movies
            .year_range()
            .await?
            .unwrap_or_else(|| YearRange {
                min_year: FALLBACK_MIN_YEAR,
                max_year: Utc::now().year(),
            });
        let countries = self.movies.distinct_countries().await?;
        let languages = self.movies.distinct_languages().await?;
        Ok(FilterOptions {
            genres,
            year_range,
            countries,
            languages,
        })
    }
}
