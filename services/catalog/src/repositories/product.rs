//! Product repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::ProductStore;
use crate::models::{NewProduct, Product, ProductChanges};

/// PostgreSQL-backed product repository
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn product_from_row(row: &PgRow) -> Product {
    Product {
        id: row.get("id"),
        owner: row.get("user_id"),
        title: row.get("title"),
        price: row.get("price"),
        color: row.get("color"),
        details: row.get("details"),
        created: row.get("created"),
        updated: row.get("updated"),
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn list(&self, owner: Uuid) -> DatabaseResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, price, color, details, created, updated
            FROM products
            WHERE user_id = $1
            ORDER BY id DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(rows.iter().map(product_from_row).collect())
    }

    async fn get(&self, owner: Uuid, id: i64) -> DatabaseResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, title, price, color, details, created, updated
            FROM products
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(product_from_row))
    }

    async fn create(&self, owner: Uuid, product: NewProduct) -> DatabaseResult<Product> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (user_id, title, price, color, details)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, price, color, details, created, updated
            "#,
        )
        .bind(owner)
        .bind(&product.title)
        .bind(product.price)
        .bind(&product.color)
        .bind(&product.details)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        let product = product_from_row(&row);
        info!("Created product {} for user {}", product.id, owner);
        Ok(product)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: i64,
        changes: ProductChanges,
    ) -> DatabaseResult<Option<Product>> {
        // Optional columns need an explicit flag so that "clear" and
        // "leave alone" stay distinguishable.
        let row = sqlx::query(
            r#"
            UPDATE products
            SET title = COALESCE($3, title),
                price = COALESCE($4, price),
                color = CASE WHEN $5 THEN $6 ELSE color END,
                details = CASE WHEN $7 THEN $8 ELSE details END,
                updated = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, price, color, details, created, updated
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(changes.title)
        .bind(changes.price)
        .bind(changes.color.is_some())
        .bind(changes.color.flatten())
        .bind(changes.details.is_some())
        .bind(changes.details.flatten())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(row.as_ref().map(product_from_row))
    }

    async fn delete(&self, owner: Uuid, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM products
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}
