//! Order repository.

use crate::errors::ApiError;
use crate::models::Order;
use sqlx::PgPool;
use uuid::Uuid;

/// List a user's orders, newest first.
pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Order>, ApiError> {
    let orders = sqlx::query_as::<_, Order>(
        r#"
        SELECT order_id, user_id, status, total_cents, created_at
        FROM orders
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to list orders: {}", e)))?;

    Ok(orders)
}

/// List every order, newest first (admin view).
pub async fn list_all(pool: &PgPool) -> Result<Vec<Order>, ApiError> {
    let orders = sqlx::query_as::<_, Order>(
        r#"
        SELECT order_id, user_id, status, total_cents, created_at
        FROM orders
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to list orders: {}", e)))?;

    Ok(orders)
}

/// Get an order by id.
pub async fn get_by_id(pool: &PgPool, order_id: Uuid) -> Result<Option<Order>, ApiError> {
    let order = sqlx::query_as::<_, Order>(
        r#"
        SELECT order_id, user_id, status, total_cents, created_at
        FROM orders
        WHERE order_id = $1
        "#,
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to fetch order: {}", e)))?;

    Ok(order)
}
