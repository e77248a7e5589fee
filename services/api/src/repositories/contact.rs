//! Contact message repository for database operations

use async_trait::async_trait;
use common::error::StoreResult;
use sqlx::PgPool;
use uuid::Uuid;

use super::ContactRepository;
use crate::models::{ContactMessage, NewContactMessage};

#[derive(Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn create(&self, message: &NewContactMessage) -> StoreResult<ContactMessage> {
        let message = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, message)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, message, read, created_at, updated_at
            "#,
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    async fn list(&self) -> StoreResult<Vec<ContactMessage>> {
        let messages = sqlx::query_as::<_, ContactMessage>(
            r#"
            SELECT id, name, email, message, read, created_at, updated_at
            FROM contact_messages
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn mark_read(&self, id: Uuid) -> StoreResult<Option<ContactMessage>> {
        let message = sqlx::query_as::<_, ContactMessage>(
            r#"
            UPDATE contact_messages
            SET read = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, message, read, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
