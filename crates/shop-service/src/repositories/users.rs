//! User repository.
//!
//! Database access for user records, plus the [`UserStore`] implementation
//! the identity resolver consumes.

use crate::auth::UserStore;
use crate::errors::ApiError;
use crate::models::User;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Get a user by id.
pub async fn get_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT
            user_id, email, password_hash, display_name, role,
            is_active, created_at, updated_at
        FROM users
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to fetch user by id: {}", e)))?;

    Ok(user)
}

/// Get a user by email (unique constraint on the column).
pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT
            user_id, email, password_hash, display_name, role,
            is_active, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to fetch user by email: {}", e)))?;

    Ok(user)
}

/// List every user record, newest first.
pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, ApiError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT
            user_id, email, password_hash, display_name, role,
            is_active, created_at, updated_at
        FROM users
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to list users: {}", e)))?;

    Ok(users)
}

/// Update a user's profile fields. Absent fields are left untouched.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    email: Option<&str>,
    display_name: Option<&str>,
) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET email = COALESCE($2, email),
            display_name = COALESCE($3, display_name),
            updated_at = NOW()
        WHERE user_id = $1
        RETURNING
            user_id, email, password_hash, display_name, role,
            is_active, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(email)
    .bind(display_name)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to update user profile: {}", e)))?;

    Ok(user)
}

/// Delete a user. Returns whether a row was removed.
pub async fn delete(pool: &PgPool, user_id: Uuid) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to delete user: {}", e)))?;

    Ok(result.rows_affected() > 0)
}

/// PostgreSQL-backed [`UserStore`].
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, ApiError> {
        get_by_id(&self.pool, user_id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        get_by_email(&self.pool, email).await
    }
}
