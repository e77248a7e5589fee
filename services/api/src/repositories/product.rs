//! Product repository for database operations

use async_trait::async_trait;
use common::error::StoreResult;
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use super::ProductRepository;
use crate::models::{NewProduct, Product, ProductPatch};

const PRODUCT_COLUMNS: &str = r#"
    id, name, slug, description, image, version, size, updated, category,
    product_type, status_enabled, status_label, price_day, price_week,
    download_link, features_enabled, features_data, created_at, updated_at
"#;

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: &NewProduct) -> StoreResult<Product> {
        let sql = format!(
            r#"
            INSERT INTO products (
                name, slug, description, image, version, size, updated, category,
                product_type, status_enabled, status_label, price_day, price_week,
                download_link, features_enabled, features_data
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(&product.name)
            .bind(&product.slug)
            .bind(&product.description)
            .bind(&product.image)
            .bind(&product.version)
            .bind(&product.size)
            .bind(&product.updated)
            .bind(&product.category)
            .bind(&product.product_type)
            .bind(product.status_enabled)
            .bind(&product.status_label)
            .bind(product.prices.day)
            .bind(product.prices.week)
            .bind(&product.download_link)
            .bind(product.features_enabled)
            .bind(Json(&product.features_data))
            .fetch_one(&self.pool)
            .await?;

        Ok(product)
    }

    async fn list(&self) -> StoreResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn update(&self, id: Uuid, patch: &ProductPatch) -> StoreResult<Option<Product>> {
        // NULL binds leave the column as it is
        let sql = format!(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                image = COALESCE($5, image),
                version = COALESCE($6, version),
                size = COALESCE($7, size),
                updated = COALESCE($8, updated),
                category = COALESCE($9, category),
                product_type = COALESCE($10, product_type),
                status_enabled = COALESCE($11, status_enabled),
                status_label = COALESCE($12, status_label),
                price_day = COALESCE($13, price_day),
                price_week = COALESCE($14, price_week),
                download_link = COALESCE($15, download_link),
                features_enabled = COALESCE($16, features_enabled),
                features_data = COALESCE($17, features_data),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(patch.name.as_deref())
            .bind(patch.slug.as_deref())
            .bind(patch.description.as_deref())
            .bind(patch.image.as_deref())
            .bind(patch.version.as_deref())
            .bind(patch.size.as_deref())
            .bind(patch.updated.as_deref())
            .bind(patch.category.as_deref())
            .bind(patch.product_type.as_deref())
            .bind(patch.status_enabled)
            .bind(patch.status_label.as_deref())
            .bind(patch.price_day)
            .bind(patch.price_week)
            .bind(patch.download_link.as_deref())
            .bind(patch.features_enabled)
            .bind(patch.features_data.as_ref().map(Json))
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
