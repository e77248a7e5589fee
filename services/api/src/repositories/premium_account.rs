//! Premium account repository for database operations

use async_trait::async_trait;
use common::error::StoreResult;
use sqlx::PgPool;
use uuid::Uuid;

use super::PremiumAccountRepository;
use crate::models::{
    AccountFilter, NewPremiumAccount, PremiumAccount, PremiumAccountPatch, PremiumAccountSummary,
};

#[derive(Clone)]
pub struct PgPremiumAccountRepository {
    pool: PgPool,
}

impl PgPremiumAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PremiumAccountRepository for PgPremiumAccountRepository {
    async fn create(&self, account: &NewPremiumAccount) -> StoreResult<PremiumAccount> {
        let account = sqlx::query_as::<_, PremiumAccount>(
            r#"
            INSERT INTO premium_accounts
                (title, slug, img, gallery, description, price, is_available, badges, account_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&account.title)
        .bind(&account.slug)
        .bind(&account.img)
        .bind(&account.gallery)
        .bind(&account.description)
        .bind(account.price)
        .bind(account.is_available)
        .bind(&account.badges)
        .bind(account.account_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(account)
    }

    async fn list(&self, filter: &AccountFilter) -> StoreResult<Vec<PremiumAccountSummary>> {
        let accounts = sqlx::query_as::<_, PremiumAccountSummary>(
            r#"
            SELECT id, title, slug, description, img, badges, price, is_available, account_type
            FROM premium_accounts
            WHERE ($1::account_type IS NULL OR account_type = $1)
              AND ($2::text IS NULL
                   OR to_tsvector('simple', title || ' ' || description)
                      @@ plainto_tsquery('simple', $2))
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.account_type)
        .bind(filter.search.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<PremiumAccount>> {
        let account =
            sqlx::query_as::<_, PremiumAccount>("SELECT * FROM premium_accounts WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<PremiumAccount>> {
        let account =
            sqlx::query_as::<_, PremiumAccount>("SELECT * FROM premium_accounts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(account)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &PremiumAccountPatch,
    ) -> StoreResult<Option<PremiumAccount>> {
        let account = sqlx::query_as::<_, PremiumAccount>(
            r#"
            UPDATE premium_accounts SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                img = COALESCE($4, img),
                gallery = COALESCE($5, gallery),
                description = COALESCE($6, description),
                price = COALESCE($7, price),
                is_available = COALESCE($8, is_available),
                badges = COALESCE($9, badges),
                account_type = COALESCE($10, account_type),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.slug.as_deref())
        .bind(patch.img.as_deref())
        .bind(patch.gallery.as_ref())
        .bind(patch.description.as_deref())
        .bind(patch.price)
        .bind(patch.is_available)
        .bind(patch.badges.as_ref())
        .bind(patch.account_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM premium_accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
