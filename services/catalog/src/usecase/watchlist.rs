use tracing::info;
use uuid::Uuid;

use crate::domain::repository::{MovieRepository, WatchlistRepository};
use crate::domain::types::WatchlistEntry;
use crate::error::CatalogError;

// ── GetWatchlist ─────────────────────────────────────────────────────────────

pub struct GetWatchlistUseCase<W: WatchlistRepository> {
    pub watchlist: W,
}

impl<W: WatchlistRepository> GetWatchlistUseCase<W> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<WatchlistEntry>, CatalogError> {
        self.watchlist.list(user_id).await
    }
}

// ── AddToWatchlist ───────────────────────────────────────────────────────────

pub struct AddToWatchlistUseCase<M: MovieRepository, W: WatchlistRepository> {
    pub movies: M,
    pub watchlist: W,
}

impl<M: MovieRepository, W: WatchlistRepository> AddToWatchlistUseCase<M, W> {
    pub async fn execute(&self, user_id: Uuid, movie_id: Uuid) -> Result<(), CatalogError> {
        match self.movies.find_by_id(movie_id).await? {
            Some(movie) if movie.is_active => {}
            _ => return Err(CatalogError::MovieNotFound),
        }
        self.watchlist.add(user_id, movie_id).await?;
        info!(%user_id, %movie_id, "added to watchlist");
        Ok(())
    }
}

// ── RemoveFromWatchlist ──────────────────────────────────────────────────────

pub struct RemoveFromWatchlistUseCase<W: WatchlistRepository> {
    pub watchlist: W,
}

impl<W: WatchlistRepository> RemoveFromWatchlistUseCase<W> {
    pub async fn execute(&self, user_id: Uuid, movie_id: Uuid) -> Result<(), CatalogError> {
        if !self.watchlist.remove(user_id, movie_id).await? {
            return Err(CatalogError::NotInWatchlist);
        }
        info!(%user_id, %movie_id, "removed from watchlist");
        Ok(())
    }
}
