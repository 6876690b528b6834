//! Domain types shared across FilmRate services.
//!
//! Pure types with no framework dependencies.

pub mod pagination;
pub mod rating;
pub mod user;
pub mod vote;
