//! Identity resolution.
//!
//! Maps verified token claims to the trusted, per-request `Identity` by
//! re-reading the user record from the store. The role on the resolved
//! identity is the authoritative one for all authorization decisions:
//! trusting the role embedded in a client-held credential would let a stale
//! or tampered token outlive a role revocation.

use crate::auth::claims::Claims;
use crate::errors::{ApiError, CredentialFailure};
use crate::models::User;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Requester role.
///
/// Anything other than the literal `admin` role is a standard customer, which
/// keeps unknown role strings from ever granting elevated access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    /// Parse a persisted role string.
    pub fn from_db(role: &str) -> Self {
        if role == "admin" {
            Role::Admin
        } else {
            Role::Customer
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }
}

/// The server-trusted representation of the requester.
///
/// Constructed once per request by [`resolve`], attached to the request
/// extensions, and discarded at request end. Never persisted or cached
/// across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Key-value lookup over persisted user records.
///
/// The production implementation queries PostgreSQL; tests substitute an
/// in-memory map.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user record by id. `Ok(None)` when no record exists.
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, ApiError>;

    /// Look up a user record by email. `Ok(None)` when no record exists.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
}

/// Identity resolution failures.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The claims' subject has no active persisted record.
    #[error("user not found")]
    UserNotFound,

    /// The store itself failed. Surfaces as a service failure, not an
    /// authentication failure, so callers can tell outage from denial.
    #[error(transparent)]
    Store(ApiError),
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            // Collapsed into the generic invalid-credential outcome to avoid
            // existence probing
            ResolveError::UserNotFound => {
                ApiError::Unauthenticated(CredentialFailure::InvalidCredential)
            }
            ResolveError::Store(e) => e,
        }
    }
}

/// Resolve verified claims to a trusted identity.
///
/// Performs a fresh store lookup on every call. The resolved role comes from
/// the looked-up record, not from the claims. Deactivated users resolve as
/// not found.
pub async fn resolve(store: &dyn UserStore, claims: &Claims) -> Result<Identity, ResolveError> {
    let user = store
        .find_by_id(claims.sub)
        .await
        .map_err(ResolveError::Store)?
        .ok_or(ResolveError::UserNotFound)?;

    if !user.is_active {
        tracing::debug!(target: "shop.auth.identity", "Deactivated user presented a valid token");
        return Err(ResolveError::UserNotFound);
    }

    Ok(Identity {
        user_id: user.user_id,
        email: user.email,
        role: Role::from_db(&user.role),
    })
}
