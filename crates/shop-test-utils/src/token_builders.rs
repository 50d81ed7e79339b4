//! Builder patterns for test data construction
//!
//! Provides a fluent API for creating signed test access tokens. Tokens are
//! real HS256 JWTs so they exercise the production verification path.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use uuid::Uuid;

/// Fixed signing secret for tests. Long enough to satisfy the service's
/// minimum secret length.
pub const TEST_SIGNING_SECRET: &str = "test-signing-secret-0123456789abcdef-0123456789abcdef";

/// Builder for creating signed test access tokens
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_user(user_id)
///     .with_role("admin")
///     .expires_in(3600)
///     .sign();
/// ```
pub struct TestTokenBuilder {
    sub: Uuid,
    role: String,
    exp: i64,
    iat: i64,
    secret: String,
}

impl TestTokenBuilder {
    /// Create a new token builder with defaults: a random subject, the
    /// customer role, a one-hour lifetime, and the shared test secret.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            sub: Uuid::new_v4(),
            role: "customer".to_string(),
            exp: (now + Duration::seconds(3600)).timestamp(),
            iat: now.timestamp(),
            secret: TEST_SIGNING_SECRET.to_string(),
        }
    }

    /// Set the subject user id
    pub fn for_user(mut self, user_id: Uuid) -> Self {
        self.sub = user_id;
        self
    }

    /// Set the role claim embedded in the token.
    ///
    /// The service treats this claim as advisory; tests use it to prove the
    /// embedded role does not drive authorization.
    pub fn with_role(mut self, role: &str) -> Self {
        self.role = role.to_string();
        self
    }

    /// Set expiration in seconds from now (negative for already-expired)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    /// Set issued-at timestamp
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self
    }

    /// Sign with a different secret (for wrong-key tests)
    pub fn signed_with(mut self, secret: &str) -> Self {
        self.secret = secret.to_string();
        self
    }

    /// Build and sign the token
    pub fn sign(self) -> String {
        let claims = json!({
            "sub": self.sub,
            "role": self.role,
            "iat": self.iat,
            "exp": self.exp,
        });

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("failed to sign test token")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
