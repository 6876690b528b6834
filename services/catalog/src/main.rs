use std::net::SocketAddr;

use anyhow::Context;
use sea_orm::Database;
use tracing::info;

use filmrate_catalog::config::CatalogConfig;
use filmrate_catalog::router::build_router;
use filmrate_catalog::state::AppState;
use filmrate_core::config::Config;
use filmrate_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let config = CatalogConfig::from_env().context("failed to load configuration")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    info!("database connected");

    let addr = format!("0.0.0.0:{}", config.port);
    let state = AppState::new(db, config);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("catalog service listening on {addr}");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;
    Ok(())
}
