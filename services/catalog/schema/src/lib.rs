//! sea-orm entities for the catalog service.

pub mod actors;
pub mod directors;
pub mod genres;
pub mod list_movies;
pub mod lists;
pub mod movie_actors;
pub mod movie_directors;
pub mod movie_genres;
pub mod movies;
pub mod ratings;
pub mod review_votes;
pub mod reviews;
pub mod users;
pub mod watchlists;
