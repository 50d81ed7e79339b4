//! Access token claims.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried inside an access token.
///
/// These are client-influenced until the signature verifies, and even then the
/// `role` field is only an issuance-time hint: authorization decisions always
/// use the role on the freshly resolved user record, never this value. A role
/// revoked after a token was issued must take effect immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user this token was issued to.
    pub sub: Uuid,

    /// Role at issuance time. Advisory only.
    pub role: String,

    /// Issued-at timestamp (Unix seconds).
    pub iat: i64,

    /// Expiry timestamp (Unix seconds).
    pub exp: i64,
}
