use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use filmrate_catalog::domain::filter::{MovieFilter, MovieQuery};
use filmrate_catalog::domain::repository::{
    CatalogRepository, ListRepository, MovieRepository, RatingRepository, ReviewRepository,
    ReviewVoteRepository, UserRepository, WatchlistRepository,
};
use filmrate_catalog::domain::types::{
    Credentials, Genre, ListEntry, ListFilter, Movie, MovieList, MovieRef, MovieUpdate, NamedRef, NewMovie, Person,
    PersonKind, RatedMovie, Rating, RatingSortBy, RefKind, Review, ReviewFilter, ReviewSortBy,
    ReviewVote, User, UserFilter, UserStats, WatchlistEntry, YearRange,
};
use filmrate_catalog::error::CatalogError;
use filmrate_domain::pagination::{PageRequest, Sort};
use filmrate_domain::rating::{Distribution, RatingSummary, Score};
use filmrate_domain::user::UserRole;
use filmrate_domain::vote::VoteType;

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

pub fn named(id: Uuid, name: &str) -> NamedRef {
    NamedRef {
        id,
        name: name.to_owned(),
    }
}

pub fn movie(title: &str) -> Movie {
    Movie {
        id: Uuid::now_v7(),
        title: title.to_owned(),
        description: format!("{title} description"),
        release_year: 2010,
        duration: 120,
        poster_url: None,
        trailer_url: None,
        country: Some("United States".to_owned()),
        language: Some("English".to_owned()),
        genres: vec![],
        directors: vec![],
        actors: vec![],
        average_rating: 0.0,
        total_ratings: 0,
        total_reviews: 0,
        views: 0,
        is_active: true,
        created_by: None,
        created_at: at(1),
        updated_at: at(1),
    }
}

pub fn genre(name: &str) -> Genre {
    Genre {
        id: Uuid::now_v7(),
        name: name.to_owned(),
        slug: name.to_lowercase(),
        description: None,
    }
}

pub fn person(name: &str) -> Person {
    Person {
        id: Uuid::now_v7(),
        name: name.to_owned(),
        birth_date: None,
        nationality: None,
        bio: None,
        photo_url: None,
    }
}

pub fn user(username: &str) -> User {
    User {
        id: Uuid::now_v7(),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        role: UserRole::User,
        bio: None,
        avatar: None,
        is_active: true,
        created_at: at(1),
        updated_at: at(1),
    }
}

fn directed(ord: Ordering, sort: Sort) -> Ordering {
    match sort {
        Sort::Asc => ord,
        Sort::Desc => ord.reverse(),
    }
}

fn window<T>(items: Vec<T>, page: PageRequest) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect()
}

// ── MemStore ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct Data {
    pub movies: Vec<Movie>,
    pub ratings: Vec<Rating>,
    pub reviews: Vec<Review>,
    pub votes: Vec<ReviewVote>,
    pub watchlist: Vec<(Uuid, Uuid, DateTime<Utc>)>,
    pub lists: Vec<MovieList>,
    pub users: Vec<User>,
    pub passwords: Vec<(Uuid, String)>,
    pub genres: Vec<Genre>,
    pub actors: Vec<Person>,
    pub directors: Vec<Person>,
}

impl Data {
    fn movie_ref(&self, movie_id: Uuid) -> Option<MovieRef> {
        self.movies.iter().find(|m| m.id == movie_id).map(Movie::to_ref)
    }

    fn upsert_rating(&mut self, user_id: Uuid, movie_id: Uuid, score: i16, now: DateTime<Utc>) {
        match self
            .ratings
            .iter_mut()
            .find(|r| r.user_id == user_id && r.movie_id == movie_id)
        {
            Some(rating) => {
                rating.score = score;
                rating.updated_at = now;
            }
            None => self.ratings.push(Rating {
                user_id,
                movie_id,
                score,
                created_at: now,
                updated_at: now,
            }),
        }
    }

    fn refs(&self, kind: RefKind, ids: &[Uuid]) -> Vec<NamedRef> {
        let mut refs: Vec<NamedRef> = match kind {
            RefKind::Genre => self
                .genres
                .iter()
                .filter(|g| ids.contains(&g.id))
                .map(|g| named(g.id, &g.name))
                .collect(),
            RefKind::Actor => self
                .actors
                .iter()
                .filter(|p| ids.contains(&p.id))
                .map(|p| named(p.id, &p.name))
                .collect(),
            RefKind::Director => self
                .directors
                .iter()
                .filter(|p| ids.contains(&p.id))
                .map(|p| named(p.id, &p.name))
                .collect(),
        };
        refs.sort_by(|a, b| a.name.cmp(&b.name));
        refs
    }

    fn people(&self, kind: PersonKind) -> &Vec<Person> {
        match kind {
            PersonKind::Actor => &self.actors,
            PersonKind::Director => &self.directors,
        }
    }
}

/// In-memory stand-in for every repository, with the same unique
/// constraints the database enforces.
#[derive(Clone, Default)]
pub struct MemStore {
    pub data: Arc<Mutex<Data>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Data) -> R) -> R {
        f(&mut self.data.lock().unwrap())
    }

    pub fn add_movie(&self, movie: Movie) -> Uuid {
        let id = movie.id;
        self.with(|d| d.movies.push(movie));
        id
    }

    pub fn add_genre(&self, genre: Genre) -> Uuid {
        let id = genre.id;
        self.with(|d| d.genres.push(genre));
        id
    }

    pub fn add_user(&self, user: User) -> Uuid {
        let id = user.id;
        self.with(|d| d.users.push(user));
        id
    }

    pub fn add_rating(&self, user_id: Uuid, movie_id: Uuid, score: i16) {
        self.with(|d| d.upsert_rating(user_id, movie_id, score, at(1)));
    }

    pub fn movie(&self, id: Uuid) -> Movie {
        self.with(|d| d.movies.iter().find(|m| m.id == id).cloned())
            .expect("movie in store")
    }

    pub fn rating(&self, user_id: Uuid, movie_id: Uuid) -> Option<Rating> {
        self.with(|d| {
            d.ratings
                .iter()
                .find(|r| r.user_id == user_id && r.movie_id == movie_id)
                .cloned()
        })
    }

    pub fn review(&self, id: Uuid) -> Option<Review> {
        self.with(|d| d.reviews.iter().find(|r| r.id == id).cloned())
    }
}

impl MovieRepository for MemStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>, CatalogError> {
        Ok(self.with(|d| d.movies.iter().find(|m| m.id == id).cloned()))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Movie>, CatalogError> {
        Ok(self.with(|d| {
            d.movies
                .iter()
                .filter(|m| ids.contains(&m.id))
                .cloned()
                .collect()
        }))
    }

    async fn find(&self, query: &MovieQuery) -> Result<Vec<Movie>, CatalogError> {
        let mut movies: Vec<Movie> = self.with(|d| {
            d.movies
                .iter()
                .filter(|m| query.filter.matches(m))
                .cloned()
                .collect()
        });
        movies.sort_by(|a, b| query.sort.compare(a, b));
        Ok(movies
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn count(&self, filter: &MovieFilter) -> Result<u64, CatalogError> {
        Ok(self.with(|d| d.movies.iter().filter(|m| filter.matches(m)).count() as u64))
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), CatalogError> {
        self.with(|d| {
            if let Some(m) = d.movies.iter_mut().find(|m| m.id == id) {
                m.views += 1;
            }
        });
        Ok(())
    }

    async fn update_rating_summary(
        &self,
        id: Uuid,
        summary: RatingSummary,
        total_reviews: u64,
    ) -> Result<(), CatalogError> {
        self.with(|d| {
            if let Some(m) = d.movies.iter_mut().find(|m| m.id == id) {
                m.average_rating = summary.average_rating;
                m.total_ratings = summary.total_ratings;
                m.total_reviews = total_reviews as i64;
            }
        });
        Ok(())
    }

    async fn create(&self, new: &NewMovie) -> Result<(), CatalogError> {
        self.with(|d| {
            let movie = Movie {
                id: new.id,
                title: new.title.clone(),
                description: new.description.clone(),
                release_year: new.release_year,
                duration: new.duration,
                poster_url: new.poster_url.clone(),
                trailer_url: new.trailer_url.clone(),
                country: new.country.clone(),
                language: new.language.clone(),
                genres: d.refs(RefKind::Genre, &new.genre_ids),
                directors: d.refs(RefKind::Director, &new.director_ids),
                actors: d.refs(RefKind::Actor, &new.actor_ids),
                average_rating: 0.0,
                total_ratings: 0,
                total_reviews: 0,
                views: 0,
                is_active: true,
                created_by: Some(new.created_by),
                created_at: new.created_at,
                updated_at: new.created_at,
            };
            d.movies.push(movie);
        });
        Ok(())
    }

    async fn update(&self, id: Uuid, update: &MovieUpdate) -> Result<bool, CatalogError> {
        Ok(self.with(|d| {
            let genres = update.genre_ids.as_ref().map(|ids| d.refs(RefKind::Genre, ids));
            let actors = update.actor_ids.as_ref().map(|ids| d.refs(RefKind::Actor, ids));
            let directors = update
                .director_ids
                .as_ref()
                .map(|ids| d.refs(RefKind::Director, ids));
            let Some(m) = d.movies.iter_mut().find(|m| m.id == id) else {
                return false;
            };
            if let Some(title) = &update.title {
                m.title = title.clone();
            }
            if let Some(description) = &update.description {
                m.description = description.clone();
            }
            if let Some(year) = update.release_year {
                m.release_year = year;
            }
            if let Some(duration) = update.duration {
                m.duration = duration;
            }
            if let Some(active) = update.is_active {
                m.is_active = active;
            }
            if let Some(genres) = genres {
                m.genres = genres;
            }
            if let Some(actors) = actors {
                m.actors = actors;
            }
            if let Some(directors) = directors {
                m.directors = directors;
            }
            m.updated_at = Utc::now();
            true
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        Ok(self.with(|d| {
            let before = d.movies.len();
            d.movies.retain(|m| m.id != id);
            d.movies.len() != before
        }))
    }

    async fn year_range(&self) -> Result<Option<YearRange>, CatalogError> {
        Ok(self.with(|d| {
            let years: Vec<i32> = d
                .movies
                .iter()
                .filter(|m| m.is_active)
                .map(|m| m.release_year)
                .collect();
            Some(YearRange {
                min_year: *years.iter().min()?,
                max_year: *years.iter().max()?,
            })
        }))
    }

    async fn distinct_countries(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.with(|d| {
            d.movies
                .iter()
                .filter(|m| m.is_active)
                .filter_map(|m| m.country.clone())
                .filter(|c| !c.is_empty())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        }))
    }

    async fn distinct_languages(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.with(|d| {
            d.movies
                .iter()
                .filter(|m| m.is_active)
                .filter_map(|m| m.language.clone())
                .filter(|l| !l.is_empty())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        }))
    }

    async fn count_all(&self) -> Result<u64, CatalogError> {
        Ok(self.with(|d| d.movies.len() as u64))
    }
}

impl RatingRepository for MemStore {
    async fn scores_for_movie(&self, movie_id: Uuid) -> Result<Vec<i16>, CatalogError> {
        Ok(self.with(|d| {
            d.ratings
                .iter()
                .filter(|r| r.movie_id == movie_id)
                .map(|r| r.score)
                .collect()
        }))
    }

    async fn distribution(&self, movie_id: Uuid) -> Result<Distribution, CatalogError> {
        Ok(self.with(|d| {
            Distribution::from_counts(
                d.ratings
                    .iter()
                    .filter(|r| r.movie_id == movie_id)
                    .map(|r| (r.score, 1)),
            )
        }))
    }

    async fn find(&self, user_id: Uuid, movie_id: Uuid) -> Result<Option<Rating>, CatalogError> {
        Ok(self.rating(user_id, movie_id))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        sort_by: RatingSortBy,
        page: PageRequest,
    ) -> Result<Vec<RatedMovie>, CatalogError> {
        Ok(self.with(|d| {
            let mut rated: Vec<RatedMovie> = d
                .ratings
                .iter()
                .filter(|r| r.user_id == user_id)
                .filter_map(|r| {
                    Some(RatedMovie {
                        rating: r.clone(),
                        movie: d.movie_ref(r.movie_id)?,
                    })
                })
                .collect();
            rated.sort_by(|a, b| match sort_by {
                RatingSortBy::CreatedAt(sort) => {
                    directed(a.rating.created_at.cmp(&b.rating.created_at), sort)
                }
                RatingSortBy::Score(sort) => directed(a.rating.score.cmp(&b.rating.score), sort),
            });
            window(rated, page)
        }))
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, CatalogError> {
        Ok(self.with(|d| d.ratings.iter().filter(|r| r.user_id == user_id).count() as u64))
    }

    async fn movie_ids_by_user(
        &self,
        user_id: Uuid,
        min_score: Option<i16>,
    ) -> Result<Vec<Uuid>, CatalogError> {
        Ok(self.with(|d| {
            d.ratings
                .iter()
                .filter(|r| r.user_id == user_id)
                .filter(|r| min_score.is_none_or(|min| r.score >= min))
                .map(|r| r.movie_id)
                .collect()
        }))
    }

    async fn create(&self, rating: &Rating) -> Result<(), CatalogError> {
        self.with(|d| {
            if d
                .ratings
                .iter()
                .any(|r| r.user_id == rating.user_id && r.movie_id == rating.movie_id)
            {
                return Err(CatalogError::RatingAlreadyExists);
            }
            d.ratings.push(rating.clone());
            Ok(())
        })
    }

    async fn update_score(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
        score: Score,
    ) -> Result<bool, CatalogError> {
        Ok(self.with(|d| {
            match d
                .ratings
                .iter_mut()
                .find(|r| r.user_id == user_id && r.movie_id == movie_id)
            {
                Some(rating) => {
                    rating.score = score.get();
                    rating.updated_at = Utc::now();
                    true
                }
                None => false,
            }
        }))
    }

    async fn delete(&self, user_id: Uuid, movie_id: Uuid) -> Result<bool, CatalogError> {
        Ok(self.with(|d| {
            let before = d.ratings.len();
            d.ratings
                .retain(|r| !(r.user_id == user_id && r.movie_id == movie_id));
            d.ratings.len() != before
        }))
    }

    async fn count_all(&self) -> Result<u64, CatalogError> {
        Ok(self.with(|d| d.ratings.len() as u64))
    }
}

fn review_matches(filter: ReviewFilter, review: &Review) -> bool {
    filter.movie_id.is_none_or(|id| review.movie_id == id)
        && filter.user_id.is_none_or(|id| review.user_id == id)
        && filter.is_hidden.is_none_or(|h| review.is_hidden == h)
}

impl ReviewRepository for MemStore {
    async fn count_for_movie(&self, movie_id: Uuid) -> Result<u64, CatalogError> {
        Ok(self.with(|d| d.reviews.iter().filter(|r| r.movie_id == movie_id).count() as u64))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, CatalogError> {
        Ok(self.review(id))
    }

    async fn list(
        &self,
        filter: ReviewFilter,
        sort_by: ReviewSortBy,
        page: PageRequest,
    ) -> Result<Vec<Review>, CatalogError> {
        let mut reviews: Vec<Review> = self.with(|d| {
            d.reviews
                .iter()
                .filter(|r| review_matches(filter, r))
                .cloned()
                .collect()
        });
        reviews.sort_by(|a, b| {
            let primary = match sort_by {
                ReviewSortBy::HelpfulVotes(sort) => {
                    directed(a.helpful_votes.cmp(&b.helpful_votes), sort)
                }
                ReviewSortBy::CreatedAt(sort) => {
                    directed(a.created_at.cmp(&b.created_at), sort)
                }
                ReviewSortBy::Rating(sort) => directed(a.rating.cmp(&b.rating), sort),
            };
            primary
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(window(reviews, page))
    }

    async fn count(&self, filter: ReviewFilter) -> Result<u64, CatalogError> {
        Ok(self.with(|d| d.reviews.iter().filter(|r| review_matches(filter, r)).count() as u64))
    }

    async fn create_with_rating(&self, review: &Review) -> Result<(), CatalogError> {
        self.with(|d| {
            if d
                .reviews
                .iter()
                .any(|r| r.user_id == review.user_id && r.movie_id == review.movie_id)
            {
                return Err(CatalogError::ReviewAlreadyExists);
            }
            d.reviews.push(review.clone());
            d.upsert_rating(review.user_id, review.movie_id, review.rating, review.created_at);
            Ok(())
        })
    }

    async fn update_with_rating(&self, review: &Review) -> Result<(), CatalogError> {
        self.with(|d| {
            if let Some(existing) = d.reviews.iter_mut().find(|r| r.id == review.id) {
                *existing = review.clone();
            }
            d.upsert_rating(review.user_id, review.movie_id, review.rating, review.updated_at);
        });
        Ok(())
    }

    async fn delete_with_rating(&self, review: &Review) -> Result<bool, CatalogError> {
        Ok(self.with(|d| {
            let before = d.reviews.len();
            d.reviews.retain(|r| r.id != review.id);
            if d.reviews.len() == before {
                return false;
            }
            d.ratings
                .retain(|r| !(r.user_id == review.user_id && r.movie_id == review.movie_id));
            d.votes.retain(|v| v.review_id != review.id);
            true
        }))
    }

    async fn set_hidden(&self, id: Uuid, hidden: bool) -> Result<bool, CatalogError> {
        Ok(self.with(|d| match d.reviews.iter_mut().find(|r| r.id == id) {
            Some(review) => {
                review.is_hidden = hidden;
                true
            }
            None => false,
        }))
    }

    async fn count_all(&self) -> Result<u64, CatalogError> {
        Ok(self.with(|d| d.reviews.len() as u64))
    }

    async fn movie_ids_by_author(&self, user_id: Uuid) -> Result<Vec<Uuid>, CatalogError> {
        Ok(self.with(|d| {
            d.reviews
                .iter()
                .filter(|r| r.user_id == user_id)
                .map(|r| r.movie_id)
                .collect()
        }))
    }

    async fn recent(&self, limit: u64) -> Result<Vec<Review>, CatalogError> {
        let mut reviews = self.with(|d| d.reviews.clone());
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews.truncate(limit as usize);
        Ok(reviews)
    }
}

impl ReviewVoteRepository for MemStore {
    async fn create_and_count(&self, vote: &ReviewVote) -> Result<(), CatalogError> {
        self.with(|d| {
            if d
                .votes
                .iter()
                .any(|v| v.user_id == vote.user_id && v.review_id == vote.review_id)
            {
                return Err(CatalogError::VoteAlreadyExists);
            }
            d.votes.push(vote.clone());
            if let Some(review) = d.reviews.iter_mut().find(|r| r.id == vote.review_id) {
                match vote.vote_type {
                    VoteType::Helpful => review.helpful_votes += 1,
                    VoteType::Unhelpful => review.unhelpful_votes += 1,
                }
            }
            Ok(())
        })
    }

    async fn delete_and_count(
        &self,
        user_id: Uuid,
        review_id: Uuid,
    ) -> Result<Option<VoteType>, CatalogError> {
        Ok(self.with(|d| {
            let pos = d
                .votes
                .iter()
                .position(|v| v.user_id == user_id && v.review_id == review_id)?;
            let vote = d.votes.remove(pos);
            if let Some(review) = d.reviews.iter_mut().find(|r| r.id == review_id) {
                let counter = match vote.vote_type {
                    VoteType::Helpful => &mut review.helpful_votes,
                    VoteType::Unhelpful => &mut review.unhelpful_votes,
                };
                *counter = (*counter - 1).max(0);
            }
            Some(vote.vote_type)
        }))
    }
}

impl WatchlistRepository for MemStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<WatchlistEntry>, CatalogError> {
        Ok(self.with(|d| {
            let mut entries: Vec<WatchlistEntry> = d
                .watchlist
                .iter()
                .filter(|(u, _, _)| *u == user_id)
                .filter_map(|&(_, movie_id, added_at)| {
                    Some(WatchlistEntry {
                        movie: d.movie_ref(movie_id)?,
                        added_at,
                    })
                })
                .collect();
            entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));
            entries
        }))
    }

    async fn movie_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, CatalogError> {
        Ok(self.with(|d| {
            d.watchlist
                .iter()
                .filter(|(u, _, _)| *u == user_id)
                .map(|&(_, m, _)| m)
                .collect()
        }))
    }

    async fn add(&self, user_id: Uuid, movie_id: Uuid) -> Result<(), CatalogError> {
        self.with(|d| {
            if d
                .watchlist
                .iter()
                .any(|&(u, m, _)| u == user_id && m == movie_id)
            {
                return Err(CatalogError::AlreadyInWatchlist);
            }
            d.watchlist.push((user_id, movie_id, Utc::now()));
            Ok(())
        })
    }

    async fn remove(&self, user_id: Uuid, movie_id: Uuid) -> Result<bool, CatalogError> {
        Ok(self.with(|d| {
            let before = d.watchlist.len();
            d.watchlist
                .retain(|&(u, m, _)| !(u == user_id && m == movie_id));
            d.watchlist.len() != before
        }))
    }
}

fn list_matches(filter: ListFilter, list: &MovieList) -> bool {
    filter.owner_id.is_none_or(|id| list.user_id == id) && (!filter.public_only || list.is_public)
}

impl ListRepository for MemStore {
    async fn create(&self, list: &MovieList) -> Result<(), CatalogError> {
        self.with(|d| d.lists.push(list.clone()));
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MovieList>, CatalogError> {
        Ok(self.with(|d| d.lists.iter().find(|l| l.id == id).cloned()))
    }

    async fn list(
        &self,
        filter: ListFilter,
        page: PageRequest,
    ) -> Result<Vec<MovieList>, CatalogError> {
        let mut lists: Vec<MovieList> = self.with(|d| {
            d.lists
                .iter()
                .filter(|l| list_matches(filter, l))
                .cloned()
                .collect()
        });
        lists.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(window(lists, page))
    }

    async fn count(&self, filter: ListFilter) -> Result<u64, CatalogError> {
        Ok(self.with(|d| d.lists.iter().filter(|l| list_matches(filter, l)).count() as u64))
    }

    async fn update(&self, list: &MovieList) -> Result<(), CatalogError> {
        self.with(|d| {
            if let Some(existing) = d.lists.iter_mut().find(|l| l.id == list.id) {
                existing.name = list.name.clone();
                existing.description = list.description.clone();
                existing.is_public = list.is_public;
                existing.updated_at = list.updated_at;
            }
        });
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        Ok(self.with(|d| {
            let before = d.lists.len();
            d.lists.retain(|l| l.id != id);
            d.lists.len() != before
        }))
    }

    async fn add_movie(&self, list_id: Uuid, movie_id: Uuid) -> Result<(), CatalogError> {
        self.with(|d| {
            let movie = d.movie_ref(movie_id).ok_or(CatalogError::MovieNotFound)?;
            let list = d
                .lists
                .iter_mut()
                .find(|l| l.id == list_id)
                .ok_or(CatalogError::ListNotFound)?;
            if list.movies.iter().any(|e| e.movie.id == movie_id) {
                return Err(CatalogError::MovieAlreadyInList);
            }
            list.movies.insert(
                0,
                ListEntry {
                    movie,
                    added_at: Utc::now(),
                },
            );
            Ok(())
        })
    }

    async fn remove_movie(&self, list_id: Uuid, movie_id: Uuid) -> Result<bool, CatalogError> {
        Ok(self.with(|d| {
            let Some(list) = d.lists.iter_mut().find(|l| l.id == list_id) else {
                return false;
            };
            let before = list.movies.len();
            list.movies.retain(|e| e.movie.id != movie_id);
            list.movies.len() != before
        }))
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, CatalogError> {
        Ok(self.with(|d| d.lists.iter().filter(|l| l.user_id == user_id).count() as u64))
    }
}

fn user_matches(filter: &UserFilter, user: &User) -> bool {
    let search = filter.search.as_deref().map(str::to_lowercase);
    search.is_none_or(|s| {
        user.username.to_lowercase().contains(&s) || user.email.to_lowercase().contains(&s)
    }) && filter.role.is_none_or(|r| user.role == r)
        && filter.is_active.is_none_or(|a| user.is_active == a)
}

impl UserRepository for MemStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, CatalogError> {
        Ok(self.with(|d| d.users.iter().find(|u| u.id == id).cloned()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, CatalogError> {
        Ok(self.with(|d| d.users.iter().find(|u| u.username == username).cloned()))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, CatalogError> {
        Ok(self.with(|d| {
            let user = d.users.iter().find(|u| u.email == email)?;
            let (_, hash) = d.passwords.iter().find(|(id, _)| *id == user.id)?;
            Some(Credentials {
                user: user.clone(),
                password_hash: hash.clone(),
            })
        }))
    }

    async fn create(&self, user: &User, password_hash: &str) -> Result<(), CatalogError> {
        self.with(|d| {
            if d.users.iter().any(|u| u.email == user.email) {
                return Err(CatalogError::EmailTaken);
            }
            if d.users.iter().any(|u| u.username == user.username) {
                return Err(CatalogError::UsernameTaken);
            }
            d.users.push(user.clone());
            d.passwords.push((user.id, password_hash.to_owned()));
            Ok(())
        })
    }

    async fn update_profile(
        &self,
        id: Uuid,
        username: Option<&str>,
        bio: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<bool, CatalogError> {
        self.with(|d| {
            if let Some(username) = username {
                if d.users.iter().any(|u| u.id != id && u.username == username) {
                    return Err(CatalogError::UsernameTaken);
                }
            }
            let Some(user) = d.users.iter_mut().find(|u| u.id == id) else {
                return Ok(false);
            };
            if let Some(username) = username {
                user.username = username.to_owned();
            }
            if let Some(bio) = bio {
                user.bio = Some(bio.to_owned());
            }
            if let Some(avatar) = avatar {
                user.avatar = Some(avatar.to_owned());
            }
            Ok(true)
        })
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> Result<Vec<User>, CatalogError> {
        let mut users: Vec<User> = self.with(|d| {
            d.users
                .iter()
                .filter(|u| user_matches(filter, u))
                .cloned()
                .collect()
        });
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(window(users, page))
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, CatalogError> {
        Ok(self.with(|d| d.users.iter().filter(|u| user_matches(filter, u)).count() as u64))
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<bool, CatalogError> {
        Ok(self.with(|d| match d.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.role = role;
                true
            }
            None => false,
        }))
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<bool, CatalogError> {
        Ok(self.with(|d| match d.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.is_active = is_active;
                true
            }
            None => false,
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CatalogError> {
        Ok(self.with(|d| {
            let before = d.users.len();
            d.users.retain(|u| u.id != id);
            if d.users.len() == before {
                return false;
            }
            d.passwords.retain(|(user_id, _)| *user_id != id);

            let (cast, kept): (Vec<ReviewVote>, Vec<ReviewVote>) =
                d.votes.drain(..).partition(|v| v.user_id == id);
            d.votes = kept;
            for vote in cast {
                if let Some(review) = d.reviews.iter_mut().find(|r| r.id == vote.review_id) {
                    let counter = match vote.vote_type {
                        VoteType::Helpful => &mut review.helpful_votes,
                        VoteType::Unhelpful => &mut review.unhelpful_votes,
                    };
                    *counter = (*counter - 1).max(0);
                }
            }

            let authored: Vec<Uuid> = d
                .reviews
                .iter()
                .filter(|r| r.user_id == id)
                .map(|r| r.id)
                .collect();
            d.votes.retain(|v| !authored.contains(&v.review_id));
            d.reviews.retain(|r| r.user_id != id);
            d.ratings.retain(|r| r.user_id != id);
            d.watchlist.retain(|(user_id, _, _)| *user_id != id);
            d.lists.retain(|l| l.user_id != id);
            true
        }))
    }

    async fn count_all(&self) -> Result<u64, CatalogError> {
        Ok(self.with(|d| d.users.len() as u64))
    }

    async fn recent(&self, limit: u64) -> Result<Vec<User>, CatalogError> {
        let mut users = self.with(|d| d.users.clone());
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        users.truncate(limit as usize);
        Ok(users)
    }

    async fn stats(&self, id: Uuid) -> Result<UserStats, CatalogError> {
        Ok(self.with(|d| UserStats {
            total_reviews: d.reviews.iter().filter(|r| r.user_id == id).count() as u64,
            total_ratings: d.ratings.iter().filter(|r| r.user_id == id).count() as u64,
            total_lists: d.lists.iter().filter(|l| l.user_id == id).count() as u64,
        }))
    }
}

impl CatalogRepository for MemStore {
    async fn list_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let mut genres = self.with(|d| d.genres.clone());
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn find_genre(&self, id: Uuid) -> Result<Option<Genre>, CatalogError> {
        Ok(self.with(|d| d.genres.iter().find(|g| g.id == id).cloned()))
    }

    async fn create_genre(&self, genre: &Genre) -> Result<(), CatalogError> {
        self.with(|d| {
            if d
                .genres
                .iter()
                .any(|g| g.name == genre.name || g.slug == genre.slug)
            {
                return Err(CatalogError::GenreAlreadyExists);
            }
            d.genres.push(genre.clone());
            Ok(())
        })
    }

    async fn create_person(&self, kind: PersonKind, person: &Person) -> Result<(), CatalogError> {
        self.with(|d| match kind {
            PersonKind::Actor => d.actors.push(person.clone()),
            PersonKind::Director => d.directors.push(person.clone()),
        });
        Ok(())
    }

    async fn search_people(
        &self,
        kind: PersonKind,
        needle: &str,
        limit: Option<u64>,
    ) -> Result<Vec<Person>, CatalogError> {
        let needle = needle.to_lowercase();
        let mut people: Vec<Person> = self.with(|d| {
            d.people(kind)
                .iter()
                .filter(|p| p.name.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        });
        people.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(limit) = limit {
            people.truncate(limit as usize);
        }
        Ok(people)
    }

    async fn search_genres(&self, needle: &str, limit: u64) -> Result<Vec<Genre>, CatalogError> {
        let needle = needle.to_lowercase();
        let mut genres: Vec<Genre> = self.with(|d| {
            d.genres
                .iter()
                .filter(|g| g.name.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        });
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        genres.truncate(limit as usize);
        Ok(genres)
    }

    async fn existing_ids(&self, kind: RefKind, ids: &[Uuid]) -> Result<Vec<Uuid>, CatalogError> {
        Ok(self.with(|d| {
            let known: Vec<Uuid> = match kind {
                RefKind::Genre => d.genres.iter().map(|g| g.id).collect(),
                RefKind::Actor => d.actors.iter().map(|p| p.id).collect(),
                RefKind::Director => d.directors.iter().map(|p| p.id).collect(),
            };
            ids.iter().copied().filter(|id| known.contains(id)).collect()
        }))
    }
}
