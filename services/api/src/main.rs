use anyhow::{Result, bail};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{
    AppConfig, AppState, create_router,
    repositories::{
        PgContactRepository, PgOrderRepository, PgPremiumAccountRepository, PgProductRepository,
    },
    upload::UploadStore,
};
use auth::{Authenticator, JwtService, PgAdminRepository};
use common::database::{health_check, init_pool, run_migrations};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting API service");

    let config = AppConfig::from_env()?;

    // Initialize database connection pool
    let pool = init_pool(&config.database).await?;
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        bail!("Failed to connect to database");
    }
    run_migrations(&pool).await?;

    let jwt_service = JwtService::new(&config.jwt)?;
    let authenticator =
        Authenticator::new(Arc::new(PgAdminRepository::new(pool.clone())), jwt_service)?;

    let state = AppState {
        authenticator,
        products: Arc::new(PgProductRepository::new(pool.clone())),
        premium_accounts: Arc::new(PgPremiumAccountRepository::new(pool.clone())),
        orders: Arc::new(PgOrderRepository::new(pool.clone())),
        contacts: Arc::new(PgContactRepository::new(pool.clone())),
        uploads: UploadStore::new(&config.server.upload_dir),
        health: Arc::new(pool),
    };

    let app = create_router(state, &config.server);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;
    info!("API service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
