//! Integration tests for the database infrastructure
//!
//! These run against a live PostgreSQL instance and are skipped when
//! `DATABASE_URL` is not set.

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use sqlx::Row;

#[tokio::test]
async fn test_migrations_create_schema() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set, skipping");
        return Ok(());
    }

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    run_migrations(&pool).await?;
    // Re-running is a no-op once every migration is recorded.
    run_migrations(&pool).await?;

    for table in ["admins", "products", "premium_accounts", "orders", "contact_messages"] {
        let row = sqlx::query("SELECT to_regclass($1) IS NOT NULL AS present")
            .bind(format!("public.{table}"))
            .fetch_one(&pool)
            .await?;
        let present: bool = row.get("present");
        assert!(present, "table {table} missing after migrations");
    }

    Ok(())
}
