use tracing::info;
use uuid::Uuid;

use filmrate_domain::pagination::{PageRequest, Paginated, Sort};
use filmrate_domain::user::UserRole;

use crate::domain::filter::{MovieFilter, MovieQuery, MovieSort, SortField};
use crate::domain::repository::{
    MovieRepository, RatingRepository, ReviewRepository, UserRepository,
};
use crate::domain::types::{DashboardStats, User, UserFilter, UserStats};
use crate::error::CatalogError;
use crate::usecase::rating::recalculate_movie_rating;

pub const DASHBOARD_RECENT: u64 = 5;
pub const DASHBOARD_TOP: u64 = 10;
pub const DASHBOARD_TOP_MIN_RATINGS: i64 = 5;

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Paginated<User>, CatalogError> {
        let items = self.users.list(filter, page).await?;
        let total = self.users.count(filter).await?;
        Ok(Paginated::new(items, page, total))
    }
}

// ── GetUserDetail ────────────────────────────────────────────────────────────

pub struct GetUserDetailUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUserDetailUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(User, UserStats), CatalogError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(CatalogError::UserNotFound)?;
        let stats = self.users.stats(user_id).await?;
        Ok((user, stats))
    }
}

// ── SetUserRole ──────────────────────────────────────────────────────────────

pub struct SetUserRoleUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> SetUserRoleUseCase<U> {
    pub async fn execute(&self, user_id: Uuid, role: UserRole) -> Result<User, CatalogError> {
        if !self.users.set_role(user_id, role).await? {
            return Err(CatalogError::UserNotFound);
        }
        info!(%user_id, role = role.as_str(), "user role changed");
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(CatalogError::UserNotFound)
    }
}

// ── SetUserActive ────────────────────────────────────────────────────────────

pub struct SetUserActiveUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> SetUserActiveUseCase<U> {
    pub async fn execute(&self, user_id: Uuid, is_active: bool) -> Result<User, CatalogError> {
        if !self.users.set_active(user_id, is_active).await? {
            return Err(CatalogError::UserNotFound);
        }
        info!(%user_id, is_active, "user status changed");
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(CatalogError::UserNotFound)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<
    U: UserRepository,
    M: MovieRepository,
    R: RatingRepository,
    V: ReviewRepository,
> {
    pub users: U,
    pub movies: M,
    pub ratings: R,
    pub reviews: V,
}

impl<U: UserRepository, M: MovieRepository, R: RatingRepository, V: ReviewRepository>
    DeleteUserUseCase<U, M, R, V>
{
    /// Everything the user authored goes with the account, so every movie
    /// they rated or reviewed gets its rating fields recomputed.
    pub async fn execute(&self, admin_id: Uuid, user_id: Uuid) -> Result<(), CatalogError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(CatalogError::UserNotFound);
        }
        if admin_id == user_id {
            return Err(CatalogError::CannotDeleteSelf);
        }

        let mut touched = self.ratings.movie_ids_by_user(user_id, None).await?;
        touched.extend(self.reviews.movie_ids_by_author(user_id).await?);
        touched.sort_unstable();
        touched.dedup();

        if !self.users.delete(user_id).await? {
            return Err(CatalogError::UserNotFound);
        }
        info!(%user_id, %admin_id, movies = touched.len(), "user deleted");

        for movie_id in touched {
            recalculate_movie_rating(&self.movies, &self.ratings, &self.reviews, movie_id).await?;
        }
        Ok(())
    }
}

// ── Dashboard ────────────────────────────────────────────────────────────────

pub struct GetDashboardUseCase<
    U: UserRepository,
    M: MovieRepository,
    V: ReviewRepository,
    R: RatingRepository,
> {
    pub users: U,
    pub movies: M,
    pub reviews: V,
    pub ratings: R,
}

impl<U: UserRepository, M: MovieRepository, V: ReviewRepository, R: RatingRepository>
    GetDashboardUseCase<U, M, V, R>
{
    pub async fn execute(&self) -> Result<DashboardStats, CatalogError> {
        let top_movies = self
            .movies
            .find(&MovieQuery::top(
                MovieFilter::all().min_total_ratings(DASHBOARD_TOP_MIN_RATINGS),
                MovieSort::By(SortField::AverageRating, Sort::Desc),
                DASHBOARD_TOP,
            ))
            .await?;
        Ok(DashboardStats {
            total_users: self.users.count_all().await?,
            total_movies: self.movies.count_all().await?,
            total_reviews: self.reviews.count_all().await?,
            total_ratings: self.ratings.count_all().await?,
            recent_users: self.users.recent(DASHBOARD_RECENT).await?,
            recent_reviews: self.reviews.recent(DASHBOARD_RECENT).await?,
            top_movies,
        })
    }
}
