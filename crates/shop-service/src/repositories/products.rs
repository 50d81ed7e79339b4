//! Product repository.
//!
//! The search query binds its pattern as a parameter; concatenating request
//! input into SQL is excluded from this codebase.

use crate::errors::ApiError;
use crate::models::Product;
use sqlx::PgPool;
use uuid::Uuid;

/// List products, newest first, optionally filtered by category.
pub async fn list(
    pool: &PgPool,
    category: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Product>, ApiError> {
    let products = sqlx::query_as::<_, Product>(
        r#"
        SELECT
            product_id, name, description, price_cents, stock, category,
            created_at, updated_at
        FROM products
        WHERE ($1::text IS NULL OR category = $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(category)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to list products: {}", e)))?;

    Ok(products)
}

/// Get a product by id.
pub async fn get_by_id(pool: &PgPool, product_id: Uuid) -> Result<Option<Product>, ApiError> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT
            product_id, name, description, price_cents, stock, category,
            created_at, updated_at
        FROM products
        WHERE product_id = $1
        "#,
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to fetch product: {}", e)))?;

    Ok(product)
}

/// Case-insensitive search over name and description.
pub async fn search(pool: &PgPool, query: &str) -> Result<Vec<Product>, ApiError> {
    let pattern = format!("%{}%", query);

    let products = sqlx::query_as::<_, Product>(
        r#"
        SELECT
            product_id, name, description, price_cents, stock, category,
            created_at, updated_at
        FROM products
        WHERE name ILIKE $1 OR description ILIKE $1
        ORDER BY name
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to search products: {}", e)))?;

    Ok(products)
}

/// Create a product, returning the inserted row.
pub async fn create(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
    price_cents: i64,
    stock: i32,
    category: Option<&str>,
) -> Result<Product, ApiError> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (name, description, price_cents, stock, category)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING
            product_id, name, description, price_cents, stock, category,
            created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(price_cents)
    .bind(stock)
    .bind(category)
    .fetch_one(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to create product: {}", e)))?;

    Ok(product)
}

/// Replace a product's fields. Returns the updated row, or None if absent.
pub async fn update(
    pool: &PgPool,
    product_id: Uuid,
    name: &str,
    description: Option<&str>,
    price_cents: i64,
    stock: i32,
    category: Option<&str>,
) -> Result<Option<Product>, ApiError> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET name = $2, description = $3, price_cents = $4, stock = $5,
            category = $6, updated_at = NOW()
        WHERE product_id = $1
        RETURNING
            product_id, name, description, price_cents, stock, category,
            created_at, updated_at
        "#,
    )
    .bind(product_id)
    .bind(name)
    .bind(description)
    .bind(price_cents)
    .bind(stock)
    .bind(category)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to update product: {}", e)))?;

    Ok(product)
}

/// Delete a product. Returns whether a row was removed.
pub async fn delete(pool: &PgPool, product_id: Uuid) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
        .bind(product_id)
        .execute(pool)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to delete product: {}", e)))?;

    Ok(result.rows_affected() > 0)
}
