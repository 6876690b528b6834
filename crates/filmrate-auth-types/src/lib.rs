//! Auth types shared across FilmRate services.
//!
//! Services read the caller's identity from `x-filmrate-user-*` headers,
//! injected either by the gateway or by the bearer-token middleware in
//! [`token`]. Provides the `IdentityHeaders`, `MaybeIdentity` and
//! `AdminIdentity` extractors plus JWT issuance and validation.

pub mod identity;
pub mod token;
