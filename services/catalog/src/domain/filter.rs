//! Composable movie predicate and sort order.
//!
//! `MovieFilter` is built incrementally by the search and recommendation use
//! cases. The database repository translates it into a sea-orm `Condition`;
//! [`MovieFilter::matches`] evaluates the same predicate in memory.

use std::cmp::Ordering;

use uuid::Uuid;

use filmrate_domain::pagination::Sort;

use super::types::{Movie, NamedRef};

/// Conjunction of optional constraints over the movie collection.
///
/// Id sets use `Option<Vec<_>>`: `None` means unconstrained, `Some(vec![])`
/// matches nothing (a movie cannot share an element with an empty set).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieFilter {
    pub active_only: bool,
    /// Case-insensitive substring over title or description.
    pub text: Option<String>,
    /// Case-insensitive substring over title only.
    pub title: Option<String>,
    pub genre_ids: Option<Vec<Uuid>>,
    pub actor_ids: Option<Vec<Uuid>>,
    pub director_ids: Option<Vec<Uuid>>,
    /// Shares at least one genre OR at least one director.
    pub genre_or_director: Option<(Vec<Uuid>, Vec<Uuid>)>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub rating_from: Option<f64>,
    pub rating_to: Option<f64>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub min_total_ratings: Option<i64>,
    pub exclude_ids: Vec<Uuid>,
}

impl MovieFilter {
    /// Every movie, including inactive ones.
    pub fn all() -> Self {
        Self::default()
    }

    /// Active movies only; the starting point for every public query.
    pub fn active() -> Self {
        Self {
            active_only: true,
            ..Self::default()
        }
    }

    pub fn text(mut self, query: impl Into<String>) -> Self {
        self.text = Some(query.into());
        self
    }

    pub fn title(mut self, needle: impl Into<String>) -> Self {
        self.title = Some(needle.into());
        self
    }

    pub fn any_genre(mut self, ids: Vec<Uuid>) -> Self {
        self.genre_ids = Some(ids);
        self
    }

    pub fn any_actor(mut self, ids: Vec<Uuid>) -> Self {
        self.actor_ids = Some(ids);
        self
    }

    pub fn any_director(mut self, ids: Vec<Uuid>) -> Self {
        self.director_ids = Some(ids);
        self
    }

    pub fn genre_or_director(mut self, genre_ids: Vec<Uuid>, director_ids: Vec<Uuid>) -> Self {
        self.genre_or_director = Some((genre_ids, director_ids));
        self
    }

    pub fn year_between(mut self, from: Option<i32>, to: Option<i32>) -> Self {
        self.year_from = from;
        self.year_to = to;
        self
    }

    pub fn rating_between(mut self, from: Option<f64>, to: Option<f64>) -> Self {
        self.rating_from = from;
        self.rating_to = to;
        self
    }

    pub fn country(mut self, needle: impl Into<String>) -> Self {
        self.country = Some(needle.into());
        self
    }

    pub fn language(mut self, needle: impl Into<String>) -> Self {
        self.language = Some(needle.into());
        self
    }

    pub fn min_total_ratings(mut self, min: i64) -> Self {
        self.min_total_ratings = Some(min);
        self
    }

    pub fn exclude(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.exclude_ids.extend(ids);
        self
    }

    /// `true` when some id set is present but empty, so nothing can match.
    pub fn is_unsatisfiable(&self) -> bool {
        let empty = |ids: &Option<Vec<Uuid>>| ids.as_ref().is_some_and(Vec::is_empty);
        empty(&self.genre_ids)
            || empty(&self.actor_ids)
            || empty(&self.director_ids)
            || self
                .genre_or_director
                .as_ref()
                .is_some_and(|(g, d)| g.is_empty() && d.is_empty())
    }

    /// Evaluate the predicate against a loaded movie.
    pub fn matches(&self, movie: &Movie) -> bool {
        if self.active_only && !movie.is_active {
            return false;
        }
        if self.exclude_ids.contains(&movie.id) {
            return false;
        }
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            if !movie.title.to_lowercase().contains(&needle)
                && !movie.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(title) = &self.title {
            if !movie.title.to_lowercase().contains(&title.to_lowercase()) {
                return false;
            }
        }
        let shares = |ids: &[Uuid], refs: &[NamedRef]| refs.iter().any(|r| ids.contains(&r.id));
        let any_of = |ids: &Option<Vec<Uuid>>, refs: &[NamedRef]| match ids {
            Some(ids) => shares(ids, refs),
            None => true,
        };
        if !any_of(&self.genre_ids, &movie.genres)
            || !any_of(&self.actor_ids, &movie.actors)
            || !any_of(&self.director_ids, &movie.directors)
        {
            return false;
        }
        if let Some((genres, directors)) = &self.genre_or_director {
            if !shares(genres, &movie.genres) && !shares(directors, &movie.directors) {
                return false;
            }
        }
        if self.year_from.is_some_and(|y| movie.release_year < y)
            || self.year_to.is_some_and(|y| movie.release_year > y)
        {
            return false;
        }
        if self.rating_from.is_some_and(|r| movie.average_rating < r)
            || self.rating_to.is_some_and(|r| movie.average_rating > r)
        {
            return false;
        }
        if self.min_total_ratings.is_some_and(|m| movie.total_ratings < m) {
            return false;
        }
        let contains_ci = |field: &Option<String>, needle: &Option<String>| match needle {
            None => true,
            Some(n) => field
                .as_deref()
                .is_some_and(|f| f.to_lowercase().contains(&n.to_lowercase())),
        };
        contains_ci(&movie.country, &self.country) && contains_ci(&movie.language, &self.language)
    }
}

/// Column a movie listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    AverageRating,
    TotalRatings,
    TotalReviews,
    Views,
    Title,
    ReleaseYear,
}

/// Movie ordering. Single-field variants come from caller sort keys; the
/// composite ones back the recommendation lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieSort {
    By(SortField, Sort),
    /// views desc, averageRating desc
    Trending,
    /// averageRating desc, totalRatings desc
    TopRated,
}

impl Default for MovieSort {
    fn default() -> Self {
        Self::By(SortField::AverageRating, Sort::Desc)
    }
}

pub const SORT_KEYS: &[&str] = &[
    "-createdAt",
    "createdAt",
    "-averageRating",
    "averageRating",
    "-totalReviews",
    "-views",
    "title",
    "-title",
    "releaseYear",
    "-releaseYear",
];

impl MovieSort {
    pub fn newest() -> Self {
        Self::By(SortField::CreatedAt, Sort::Desc)
    }

    /// Parse a caller sort key such as `-averageRating`.
    pub fn from_key(key: &str) -> Option<Self> {
        let (sort, field) = match key.strip_prefix('-') {
            Some(rest) => (Sort::Desc, rest),
            None => (Sort::Asc, key),
        };
        if !SORT_KEYS.contains(&key) {
            return None;
        }
        let field = match field {
            "createdAt" => SortField::CreatedAt,
            "averageRating" => SortField::AverageRating,
            "totalReviews" => SortField::TotalReviews,
            "views" => SortField::Views,
            "title" => SortField::Title,
            "releaseYear" => SortField::ReleaseYear,
            _ => return None,
        };
        Some(Self::By(field, sort))
    }

    /// Ordered sort keys, most significant first.
    pub fn keys(&self) -> Vec<(SortField, Sort)> {
        match *self {
            Self::By(field, sort) => vec![(field, sort)],
            Self::Trending => vec![
                (SortField::Views, Sort::Desc),
                (SortField::AverageRating, Sort::Desc),
            ],
            Self::TopRated => vec![
                (SortField::AverageRating, Sort::Desc),
                (SortField::TotalRatings, Sort::Desc),
            ],
        }
    }

    /// In-memory comparator matching the database ordering. Ties fall back to
    /// id ascending so results are deterministic.
    pub fn compare(&self, a: &Movie, b: &Movie) -> Ordering {
        self.keys()
            .into_iter()
            .map(|(field, sort)| {
                let ord = match field {
                    SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                    SortField::AverageRating => a.average_rating.total_cmp(&b.average_rating),
                    SortField::TotalRatings => a.total_ratings.cmp(&b.total_ratings),
                    SortField::TotalReviews => a.total_reviews.cmp(&b.total_reviews),
                    SortField::Views => a.views.cmp(&b.views),
                    SortField::Title => a.title.cmp(&b.title),
                    SortField::ReleaseYear => a.release_year.cmp(&b.release_year),
                };
                match sort {
                    Sort::Asc => ord,
                    Sort::Desc => ord.reverse(),
                }
            })
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }
}

/// Filter + order + window handed to `MovieRepository::find`.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieQuery {
    pub filter: MovieFilter,
    pub sort: MovieSort,
    pub offset: u64,
    pub limit: u64,
}

impl MovieQuery {
    pub fn top(filter: MovieFilter, sort: MovieSort, limit: u64) -> Self {
        Self {
            filter,
            sort,
            offset: 0,
            limit,
        }
    }
}
