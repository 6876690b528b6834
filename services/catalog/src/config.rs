use std::time::Duration;

use serde::Deserialize;

use filmrate_core::config::Config;

/// Catalog service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for access tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// Access-token lifetime in days (default 7). Env var: `JWT_EXPIRE_DAYS`.
    #[serde(default = "default_jwt_expire_days")]
    pub jwt_expire_days: u64,
    /// bcrypt work factor for new password hashes (default 10). Env var: `BCRYPT_COST`.
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    /// TCP port for the HTTP server (default 5000). Env var: `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origin. Env var: `CLIENT_URL`.
    #[serde(default = "default_client_url")]
    pub client_url: String,
    /// Rate-limit window in minutes (default 15). Env var: `RATE_LIMIT_WINDOW`.
    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window: u64,
    /// Requests allowed per window (default 100). Env var: `RATE_LIMIT_MAX_REQUESTS`.
    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: u64,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "max_page_size")]
    pub max_page_size: u32,
}

fn default_port() -> u16 {
    5000
}

fn default_jwt_expire_days() -> u64 {
    7
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_client_url() -> String {
    "http://localhost:3000".to_owned()
}

fn default_rate_limit_window() -> u64 {
    15
}

fn default_rate_limit_max_requests() -> u64 {
    100
}

fn default_page_size() -> u32 {
    filmrate_domain::pagination::DEFAULT_LIMIT
}

fn max_page_size() -> u32 {
    filmrate_domain::pagination::MAX_LIMIT
}

impl Config for CatalogConfig {}

impl CatalogConfig {
    pub fn rate_limit_period(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window.max(1) * 60)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.jwt_expire_days.max(1) * 24 * 60 * 60)
    }

    /// Config for tests and local tooling; no environment involved.
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            jwt_secret: "filmrate-local-secret".to_owned(),
            jwt_expire_days: default_jwt_expire_days(),
            bcrypt_cost: 4, // bcrypt minimum cost (bcrypt::MIN_COST is private)
            port: default_port(),
            client_url: default_client_url(),
            rate_limit_window: default_rate_limit_window(),
            rate_limit_max_requests: default_rate_limit_max_requests(),
            default_page_size: default_page_size(),
            max_page_size: max_page_size(),
        }
    }
}
