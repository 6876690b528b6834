pub mod auth;
pub mod admin;
pub mod list;
pub mod movie;
pub mod rating;
pub mod recommendation;
pub mod review;
pub mod search;
pub mod user;
pub mod watchlist;
