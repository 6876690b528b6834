use std::sync::Arc;

use sea_orm::DatabaseConnection;

use filmrate_domain::pagination::PageRequest;

use crate::config::CatalogConfig;
use crate::usecase::auth::TokenConfig;
use crate::infra::db::{
    DbCatalogRepository, DbListRepository, DbMovieRepository, DbRatingRepository,
    DbReviewRepository, DbReviewVoteRepository, DbUserRepository, DbWatchlistRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<CatalogConfig>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: CatalogConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn movie_repo(&self) -> DbMovieRepository {
        DbMovieRepository {
            db: self.db.clone(),
        }
    }

    pub fn rating_repo(&self) -> DbRatingRepository {
        DbRatingRepository {
            db: self.db.clone(),
        }
    }

    pub fn review_repo(&self) -> DbReviewRepository {
        DbReviewRepository {
            db: self.db.clone(),
        }
    }

    pub fn vote_repo(&self) -> DbReviewVoteRepository {
        DbReviewVoteRepository {
            db: self.db.clone(),
        }
    }

    pub fn watchlist_repo(&self) -> DbWatchlistRepository {
        DbWatchlistRepository {
            db: self.db.clone(),
        }
    }

    pub fn list_repo(&self) -> DbListRepository {
        DbListRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn catalog_repo(&self) -> DbCatalogRepository {
        DbCatalogRepository {
            db: self.db.clone(),
        }
    }

    pub fn token_config(&self) -> TokenConfig {
        TokenConfig {
            secret: self.config.jwt_secret.clone(),
            ttl: self.config.token_ttl(),
        }
    }

    /// Page request from raw query values, defaulted and clamped to the
    /// configured sizes.
    pub fn page(&self, page: Option<u32>, limit: Option<u32>) -> PageRequest {
        PageRequest::new(
            page.unwrap_or(1),
            limit.unwrap_or(self.config.default_page_size),
        )
        .clamped_to(self.config.max_page_size)
    }
}
