//! Admin repository for database operations

use async_trait::async_trait;
use common::error::StoreResult;
use sqlx::PgPool;
use tracing::info;

use crate::models::Admin;

/// Persistence for admin credentials
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Find an admin by email; `email` must already be lowercased
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Admin>>;

    /// Create the admin, or replace the password hash of an existing one
    async fn upsert(&self, email: &str, password_hash: &str) -> StoreResult<Admin>;
}

/// PostgreSQL-backed admin repository
#[derive(Clone)]
pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    /// Create a new admin repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, email, password_hash, is_admin, created_at, updated_at
            FROM admins
            WHERE lower(email) = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn upsert(&self, email: &str, password_hash: &str) -> StoreResult<Admin> {
        info!("Upserting admin: {}", email);

        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (email, password_hash)
            VALUES ($1, $2)
            ON CONFLICT ((lower(email)))
            DO UPDATE SET password_hash = EXCLUDED.password_hash, updated_at = NOW()
            RETURNING id, email, password_hash, is_admin, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }
}
