//! Authorization guard.
//!
//! Every protected operation declares exactly one [`Requirement`] and passes
//! it through [`authorize`] (or the [`require`] shorthand) before touching
//! business logic. There is no implicit default: an operation with no
//! declared requirement simply cannot be written, which turns the
//! missing-authorization-check class of defect into a compile-time absence.

use crate::auth::Identity;
use crate::errors::{ApiError, CredentialFailure};
use uuid::Uuid;

/// Declared authorization policy for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any resolved identity may proceed.
    AuthenticatedOnly,
    /// Only admins may proceed.
    AdminOnly,
    /// The target user themselves, or any admin, may proceed.
    SelfOrAdmin(Uuid),
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No identity present (401).
    Unauthenticated,
    /// Identity present but insufficient (403).
    Forbidden,
}

/// Terminal outcome of the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Decide whether a request may proceed to a protected capability.
pub fn authorize(identity: Option<&Identity>, requirement: &Requirement) -> Decision {
    let Some(identity) = identity else {
        return Decision::Deny(DenyReason::Unauthenticated);
    };

    let allowed = match requirement {
        Requirement::AuthenticatedOnly => true,
        Requirement::AdminOnly => identity.role.is_admin(),
        Requirement::SelfOrAdmin(target_id) => {
            identity.user_id == *target_id || identity.role.is_admin()
        }
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::Forbidden)
    }
}

/// Guard shorthand for handlers: evaluate and convert a deny into the
/// terminal error response.
pub fn require(identity: Option<&Identity>, requirement: &Requirement) -> Result<(), ApiError> {
    match authorize(identity, requirement) {
        Decision::Allow => Ok(()),
        Decision::Deny(DenyReason::Unauthenticated) => Err(ApiError::Unauthenticated(
            CredentialFailure::MissingCredential,
        )),
        Decision::Deny(DenyReason::Forbidden) => Err(ApiError::Forbidden),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn identity(role: Role) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_absent_identity_is_unauthenticated_for_every_requirement() {
        for requirement in [
            Requirement::AuthenticatedOnly,
            Requirement::AdminOnly,
            Requirement::SelfOrAdmin(Uuid::new_v4()),
        ] {
            assert_eq!(
                authorize(None, &requirement),
                Decision::Deny(DenyReason::Unauthenticated)
            );
        }
    }

    #[test]
    fn test_authenticated_only_allows_any_identity() {
        let customer = identity(Role::Customer);
        let admin = identity(Role::Admin);

        assert_eq!(
            authorize(Some(&customer), &Requirement::AuthenticatedOnly),
            Decision::Allow
        );
        assert_eq!(
            authorize(Some(&admin), &Requirement::AuthenticatedOnly),
            Decision::Allow
        );
    }

    #[test]
    fn test_admin_only() {
        let customer = identity(Role::Customer);
        let admin = identity(Role::Admin);

        assert_eq!(
            authorize(Some(&customer), &Requirement::AdminOnly),
            Decision::Deny(DenyReason::Forbidden)
        );
        assert_eq!(
            authorize(Some(&admin), &Requirement::AdminOnly),
            Decision::Allow
        );
    }

    #[test]
    fn test_self_or_admin_matrix() {
        let target = identity(Role::Customer);
        let other = identity(Role::Customer);
        let admin = identity(Role::Admin);

        // User X acting on X: allow
        assert_eq!(
            authorize(Some(&target), &Requirement::SelfOrAdmin(target.user_id)),
            Decision::Allow
        );
        // Non-admin user Y acting on X: forbidden
        assert_eq!(
            authorize(Some(&other), &Requirement::SelfOrAdmin(target.user_id)),
            Decision::Deny(DenyReason::Forbidden)
        );
        // Admin Y acting on X: allow
        assert_eq!(
            authorize(Some(&admin), &Requirement::SelfOrAdmin(target.user_id)),
            Decision::Allow
        );
    }

    #[test]
    fn test_require_maps_deny_reasons_to_errors() {
        let customer = identity(Role::Customer);

        assert!(matches!(
            require(None, &Requirement::AuthenticatedOnly),
            Err(ApiError::Unauthenticated(
                CredentialFailure::MissingCredential
            ))
        ));
        assert!(matches!(
            require(Some(&customer), &Requirement::AdminOnly),
            Err(ApiError::Forbidden)
        ));
        assert!(require(Some(&customer), &Requirement::AuthenticatedOnly).is_ok());
    }
}
