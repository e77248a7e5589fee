//! Order repository for database operations

use async_trait::async_trait;
use common::error::StoreResult;
use sqlx::PgPool;
use uuid::Uuid;

use super::OrderRepository;
use crate::models::{NewOrder, Order, OrderStatusUpdate};

#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: &NewOrder) -> StoreResult<Order> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (product_name, plan, price, email, telegram, screenshot)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&order.product_name)
        .bind(&order.plan)
        .bind(order.price)
        .bind(&order.email)
        .bind(order.telegram.as_deref())
        .bind(order.screenshot.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    async fn list(&self) -> StoreResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    async fn update_status(
        &self,
        id: Uuid,
        update: &OrderStatusUpdate,
    ) -> StoreResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET
                payment_status = COALESCE($2, payment_status),
                order_status = COALESCE($3, order_status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.payment_status)
        .bind(update.order_status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
