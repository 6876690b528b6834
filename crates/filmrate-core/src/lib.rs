//! Framework glue shared by FilmRate services.
//!
//! JSON envelope, error bodies, health handlers, request-id and tracing setup,
//! env-based configuration and a few sea-orm helpers.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod rate_limit;
pub mod response;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
