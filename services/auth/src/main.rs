//! Out-of-band admin provisioning
//!
//! Creates the admin account, or rotates its password when it already
//! exists. Reads `DATABASE_URL`, `ADMIN_EMAIL` and `ADMIN_PASSWORD` from
//! the environment.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use auth::{PgAdminRepository, provision_admin};
use common::database::{DatabaseConfig, init_pool, run_migrations};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let email = std::env::var("ADMIN_EMAIL").context("ADMIN_EMAIL environment variable not set")?;
    let password =
        std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD environment variable not set")?;

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    run_migrations(&pool).await?;

    let admins = PgAdminRepository::new(pool);
    let admin = provision_admin(&admins, &email, &password).await?;
    info!("Admin {} is ready ({})", admin.email, admin.id);

    Ok(())
}
