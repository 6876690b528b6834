use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use filmrate_core::error::FieldError;
use filmrate_domain::pagination::{PageRequest, Paginated};

use crate::domain::filter::{MovieFilter, MovieQuery, MovieSort};
use crate::domain::repository::{CatalogRepository, MovieRepository};
use crate::domain::types::{Genre, Movie, MovieUpdate, NewMovie, Person, PersonKind, RefKind};
use crate::domain::validate;
use crate::error::CatalogError;

const PERSON_BIO_MAX: usize = 2000;
const GENRE_DESCRIPTION_MAX: usize = 500;

/// Report every id in `requested` the reference table does not know.
async fn check_refs<C: CatalogRepository>(
    catalog: &C,
    kind: RefKind,
    requested: &[Uuid],
    errors: &mut Vec<FieldError>,
) -> Result<(), CatalogError> {
    if requested.is_empty() {
        return Ok(());
    }
    let unique: BTreeSet<Uuid> = requested.iter().copied().collect();
    let ids: Vec<Uuid> = unique.iter().copied().collect();
    let found = catalog.existing_ids(kind, &ids).await?;
    if found.len() < unique.len() {
        let (field, message) = match kind {
            RefKind::Genre => ("genres", "One or more genres do not exist"),
            RefKind::Actor => ("actors", "One or more actors do not exist"),
            RefKind::Director => ("directors", "One or more directors do not exist"),
        };
        errors.push(FieldError::new(field, message));
    }
    Ok(())
}

fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = BTreeSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

// ── ListMovies ───────────────────────────────────────────────────────────────

pub struct ListMoviesUseCase<M: MovieRepository> {
    pub movies: M,
}

impl<M: MovieRepository> ListMoviesUseCase<M> {
    pub async fn execute(
        &self,
        sort: MovieSort,
        page: PageRequest,
    ) -> Result<Paginated<Movie>, CatalogError> {
        let filter = MovieFilter::active();
        let total = self.movies.count(&filter).await?;
        let movies = self
            .movies
            .find(&MovieQuery {
                filter,
                sort,
                offset: page.offset(),
                limit: u64::from(page.limit),
            })
            .await?;
        Ok(Paginated::new(movies, page, total))
    }
}

// ── GetMovie ─────────────────────────────────────────────────────────────────

pub struct GetMovieUseCase<M: MovieRepository> {
    pub movies: M,
}

impl<M: MovieRepository> GetMovieUseCase<M> {
    /// Detail read; counts as a view.
    pub async fn execute(&self, movie_id: Uuid) -> Result<Movie, CatalogError> {
        let mut movie = match self.movies.find_by_id(movie_id).await? {
            Some(movie) if movie.is_active => movie,
            _ => return Err(CatalogError::MovieNotFound),
        };
        self.movies.increment_views(movie_id).await?;
        movie.views += 1;
        Ok(movie)
    }
}

// ── CreateMovie ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct CreateMovieInput {
    pub title: String,
    pub description: String,
    pub release_year: i32,
    pub duration: i32,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub genre_ids: Vec<Uuid>,
    pub actor_ids: Vec<Uuid>,
    pub director_ids: Vec<Uuid>,
}

pub struct CreateMovieUseCase<M: MovieRepository, C: CatalogRepository> {
    pub movies: M,
    pub catalog: C,
}

impl<M: MovieRepository, C: CatalogRepository> CreateMovieUseCase<M, C> {
    pub async fn execute(
        &self,
        admin_id: Uuid,
        input: CreateMovieInput,
    ) -> Result<Movie, CatalogError> {
        let mut errors = Vec::new();
        validate::movie_title(&input.title, &mut errors);
        validate::movie_description(&input.description, &mut errors);
        validate::release_year(input.release_year, &mut errors);
        validate::duration(input.duration, &mut errors);
        if let Some(url) = &input.poster_url {
            validate::url("posterUrl", url, &mut errors);
        }
        if let Some(url) = &input.trailer_url {
            validate::url("trailerUrl", url, &mut errors);
        }
        check_refs(&self.catalog, RefKind::Genre, &input.genre_ids, &mut errors).await?;
        check_refs(&self.catalog, RefKind::Actor, &input.actor_ids, &mut errors).await?;
        check_refs(&self.catalog, RefKind::Director, &input.director_ids, &mut errors).await?;
        validate::into_result(errors)?;

        let movie = NewMovie {
            id: Uuid::now_v7(),
            title: input.title.trim().to_owned(),
            description: input.description.trim().to_owned(),
            release_year: input.release_year,
            duration: input.duration,
            poster_url: input.poster_url.map(|s| s.trim().to_owned()),
            trailer_url: input.trailer_url.map(|s| s.trim().to_owned()),
            country: input.country,
            language: input.language,
            genre_ids: dedup(input.genre_ids),
            actor_ids: dedup(input.actor_ids),
            director_ids: dedup(input.director_ids),
            created_by: admin_id,
            created_at: Utc::now(),
        };
        self.movies.create(&movie).await?;
        info!(movie_id = %movie.id, %admin_id, title = %movie.title, "movie created");

        self.movies
            .find_by_id(movie.id)
            .await?
            .ok_or(CatalogError::MovieNotFound)
    }
}

// ── UpdateMovie ──────────────────────────────────────────────────────────────

pub struct UpdateMovieUseCase<M: MovieRepository, C: CatalogRepository> {
    pub movies: M,
    pub catalog: C,
}

impl<M: MovieRepository, C: CatalogRepository> UpdateMovieUseCase<M, C> {
    pub async fn execute(
        &self,
        movie_id: Uuid,
        mut update: MovieUpdate,
    ) -> Result<Movie, CatalogError> {
        let mut errors = Vec::new();
        if let Some(title) = &update.title {
            validate::movie_title(title, &mut errors);
        }
        if let Some(description) = &update.description {
            validate::movie_description(description, &mut errors);
        }
        if let Some(year) = update.release_year {
            validate::release_year(year, &mut errors);
        }
        if let Some(duration) = update.duration {
            validate::duration(duration, &mut errors);
        }
        if let Some(url) = &update.poster_url {
            validate::url("posterUrl", url, &mut errors);
        }
        if let Some(url) = &update.trailer_url {
            validate::url("trailerUrl", url, &mut errors);
        }
        if let Some(ids) = &update.genre_ids {
            check_refs(&self.catalog, RefKind::Genre, ids, &mut errors).await?;
        }
        if let Some(ids) = &update.actor_ids {
            check_refs(&self.catalog, RefKind::Actor, ids, &mut errors).await?;
        }
        if let Some(ids) = &update.director_ids {
            check_refs(&self.catalog, RefKind::Director, ids, &mut errors).await?;
        }
        validate::into_result(errors)?;

        update.title = update.title.map(|s| s.trim().to_owned());
        update.description = update.description.map(|s| s.trim().to_owned());
        update.genre_ids = update.genre_ids.map(dedup);
        update.actor_ids = update.actor_ids.map(dedup);
        update.director_ids = update.director_ids.map(dedup);

        if !self.movies.update(movie_id, &update).await? {
            return Err(CatalogError::MovieNotFound);
        }
        info!(%movie_id, "movie updated");

        self.movies
            .find_by_id(movie_id)
            .await?
            .ok_or(CatalogError::MovieNotFound)
    }
}

// ── DeleteMovie ──────────────────────────────────────────────────────────────

pub struct DeleteMovieUseCase<M: MovieRepository> {
    pub movies: M,
}

impl<M: MovieRepository> DeleteMovieUseCase<M> {
    /// Ratings, reviews, watchlist and list entries go with it.
    pub async fn execute(&self, movie_id: Uuid) -> Result<(), CatalogError> {
        if !self.movies.delete(movie_id).await? {
            return Err(CatalogError::MovieNotFound);
        }
        info!(%movie_id, "movie deleted");
        Ok(())
    }
}

// ── Genres ───────────────────────────────────────────────────────────────────

pub struct ListGenresUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> ListGenresUseCase<C> {
    pub async fn execute(&self) -> Result<Vec<Genre>, CatalogError> {
        self.catalog.list_genres().await
    }
}

pub struct CreateGenreUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> CreateGenreUseCase<C> {
    pub async fn execute(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<Genre, CatalogError> {
        let name = name.trim();
        let slug = validate::slugify(name);
        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Genre name is required"));
        } else if slug.is_empty() {
            errors.push(FieldError::new(
                "name",
                "Genre name must contain letters or numbers",
            ));
        }
        if let Some(description) = &description {
            validate::max_len("description", description, GENRE_DESCRIPTION_MAX, &mut errors);
        }
        validate::into_result(errors)?;

        let genre = Genre {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            slug,
            description,
        };
        self.catalog.create_genre(&genre).await?;
        info!(genre_id = %genre.id, slug = %genre.slug, "genre created");
        Ok(genre)
    }
}

// ── People ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct CreatePersonInput {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
}

pub struct CreatePersonUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> CreatePersonUseCase<C> {
    pub async fn execute(
        &self,
        kind: PersonKind,
        input: CreatePersonInput,
    ) -> Result<Person, CatalogError> {
        let name = input.name.trim();
        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if let Some(bio) = &input.bio {
            validate::max_len("bio", bio, PERSON_BIO_MAX, &mut errors);
        }
        if let Some(url) = &input.photo_url {
            validate::url("photoUrl", url, &mut errors);
        }
        validate::into_result(errors)?;

        let person = Person {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            birth_date: input.birth_date,
            nationality: input.nationality,
            bio: input.bio,
            photo_url: input.photo_url,
        };
        self.catalog.create_person(kind, &person).await?;
        info!(person_id = %person.id, ?kind, "person created");
        Ok(person)
    }
}
