//! User store fixtures.
//!
//! In-memory [`UserStore`] implementations so the full admission pipeline can
//! be exercised without a database. `InMemoryUserStore` supports mutating a
//! user's role or active flag between requests, which is how tests prove the
//! service re-resolves identity on every request instead of trusting tokens.

use async_trait::async_trait;
use chrono::Utc;
use shop_service::auth::UserStore;
use shop_service::errors::ApiError;
use shop_service::models::User;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Bcrypt cost for test fixtures. The minimum bcrypt allows, so seeding
/// users stays fast.
const TEST_BCRYPT_COST: u32 = 4;

/// Hash a password the way the service stores it, at test-friendly cost.
pub fn test_password_hash(password: &str) -> String {
    bcrypt::hash(password, TEST_BCRYPT_COST).expect("bcrypt hash failed")
}

/// In-memory user store.
///
/// Interior mutability lets tests flip roles or deactivate accounts while
/// the store is already shared with a running router.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user with the given email, role, and password. Returns the
    /// generated user id.
    pub fn seed_user(&self, email: &str, role: &str, password: &str) -> Uuid {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let user = User {
            user_id,
            email: email.to_string(),
            password_hash: test_password_hash(password),
            display_name: email.split('@').next().unwrap_or("user").to_string(),
            role: role.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.users
            .lock()
            .expect("user fixture lock poisoned")
            .insert(user_id, user);
        user_id
    }

    /// Change a user's stored role. Existing tokens are untouched.
    pub fn set_role(&self, user_id: Uuid, role: &str) {
        let mut users = self.users.lock().expect("user fixture lock poisoned");
        let user = users.get_mut(&user_id).expect("unknown test user id");
        user.role = role.to_string();
        user.updated_at = Utc::now();
    }

    /// Deactivate a user. Existing tokens are untouched.
    pub fn deactivate(&self, user_id: Uuid) {
        let mut users = self.users.lock().expect("user fixture lock poisoned");
        let user = users.get_mut(&user_id).expect("unknown test user id");
        user.is_active = false;
        user.updated_at = Utc::now();
    }

    /// Remove a user entirely.
    pub fn remove(&self, user_id: Uuid) {
        self.users
            .lock()
            .expect("user fixture lock poisoned")
            .remove(&user_id);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .expect("user fixture lock poisoned")
            .get(&user_id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .expect("user fixture lock poisoned")
            .values()
            .find(|user| user.email == email)
            .cloned())
    }
}

/// A user store whose lookups always fail.
///
/// Used to assert that store outages surface as service failures (500), not
/// as authentication denials (401).
pub struct FailingUserStore;

#[async_trait]
impl UserStore for FailingUserStore {
    async fn find_by_id(&self, _user_id: Uuid) -> Result<Option<User>, ApiError> {
        Err(ApiError::Database("injected store failure".to_string()))
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, ApiError> {
        Err(ApiError::Database("injected store failure".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_and_lookup() {
        let store = InMemoryUserStore::new();
        let id = store.seed_user("alice@example.com", "customer", "hunter2");

        let by_id = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");
        assert!(by_id.is_active);

        let by_email = store.find_by_email("alice@example.com").await.unwrap();
        assert!(by_email.is_some());
    }

    #[tokio::test]
    async fn test_role_mutation_visible_on_next_lookup() {
        let store = InMemoryUserStore::new();
        let id = store.seed_user("bob@example.com", "admin", "pw");

        store.set_role(id, "customer");

        let user = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.role, "customer");
    }

    #[tokio::test]
    async fn test_failing_store_fails() {
        let result = FailingUserStore.find_by_id(Uuid::new_v4()).await;
        assert!(matches!(result, Err(ApiError::Database(_))));
    }
}
