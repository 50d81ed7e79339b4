//! Access token signing and verification.
//!
//! Tokens are HS256 JWTs signed with the process-wide secret from
//! configuration. Verification failures map to a small taxonomy that the
//! pipeline collapses into 401 responses.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - Only HS256 is accepted
//! - Expiry is validated with configurable leeway (default none)
//! - Client-visible failure detail is limited to missing/invalid/expired

use crate::auth::claims::Claims;
use crate::config::Config;
use crate::errors::{ApiError, CredentialFailure};
use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use thiserror::Error;
use uuid::Uuid;

/// Maximum token size accepted before any parsing (8 KiB).
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

/// Token verification/issuance failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("missing credential")]
    MissingCredential,

    #[error("malformed credential")]
    MalformedCredential,

    #[error("invalid token")]
    InvalidToken,

    #[error("expired token")]
    ExpiredToken,

    #[error("token signing failed")]
    Signing,
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingCredential => {
                ApiError::Unauthenticated(CredentialFailure::MissingCredential)
            }
            TokenError::MalformedCredential | TokenError::InvalidToken => {
                ApiError::Unauthenticated(CredentialFailure::InvalidCredential)
            }
            TokenError::ExpiredToken => {
                ApiError::Unauthenticated(CredentialFailure::ExpiredCredential)
            }
            TokenError::Signing => ApiError::Internal,
        }
    }
}

/// Signs and verifies access tokens with the configured HS256 secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
    leeway_seconds: u64,
}

impl TokenService {
    /// Build a token service from configuration.
    pub fn new(config: &Config) -> Self {
        let secret = config.token_signing_secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.token_leeway_seconds;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds: config.token_ttl_seconds,
            leeway_seconds: config.token_leeway_seconds,
        }
    }

    /// Issue a signed access token for a user.
    ///
    /// Returns the token string and its lifetime in seconds. The embedded role
    /// is a snapshot for diagnostics only; verification re-resolves the role.
    pub fn issue(&self, user_id: Uuid, role: &str) -> Result<(String, u64), TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.ttl_seconds as i64)).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!(target: "shop.auth.token", error = %e, "Token signing failed");
                TokenError::Signing
            })?;

        Ok((token, self.ttl_seconds))
    }

    /// Verify a bearer credential and return its claims.
    ///
    /// # Errors
    ///
    /// - `MalformedCredential` for oversized or undecodable tokens
    /// - `InvalidToken` for signature mismatches
    /// - `ExpiredToken` when the expiry has elapsed
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        // Reject oversized tokens before any parsing
        if token.len() > MAX_TOKEN_SIZE_BYTES {
            tracing::debug!(target: "shop.auth.token", size = token.len(), "Token exceeds size limit");
            return Err(TokenError::MalformedCredential);
        }

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!(target: "shop.auth.token", error = %e, "Token verification failed");
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                    ErrorKind::InvalidSignature => TokenError::InvalidToken,
                    _ => TokenError::MalformedCredential,
                }
            })?;

        // Expiry is inclusive: a token is already invalid at its exp second.
        // The library's own check is strict, so close the one-second gap here.
        if Utc::now().timestamp() >= token_data.claims.exp + self.leeway_seconds as i64 {
            return Err(TokenError::ExpiredToken);
        }

        Ok(token_data.claims)
    }
}

/// Extract the bearer credential from request headers.
///
/// # Errors
///
/// - `MissingCredential` if there is no `Authorization` header
/// - `MalformedCredential` if the header is not a Bearer credential
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, TokenError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(TokenError::MissingCredential)?
        .to_str()
        .map_err(|_| TokenError::MalformedCredential)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(TokenError::MalformedCredential)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::collections::HashMap;

    fn test_config(secret: &str) -> Config {
        let vars = HashMap::from([
            (
                "DATABASE_URL".to_string(),
                "postgresql://localhost/shop".to_string(),
            ),
            ("TOKEN_SIGNING_SECRET".to_string(), secret.to_string()),
        ]);
        Config::from_vars(&vars).expect("test config")
    }

    fn service() -> TokenService {
        TokenService::new(&test_config("0123456789abcdef0123456789abcdef"))
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let tokens = service();
        let user_id = Uuid::new_v4();

        let (token, expires_in) = tokens.issue(user_id, "customer").unwrap();
        assert_eq!(expires_in, 3600);

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "customer");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let issuer = TokenService::new(&test_config("0123456789abcdef0123456789abcdef"));
        let verifier = TokenService::new(&test_config("another-secret-of-32-bytes-here!"));

        let (token, _) = issuer.issue(Uuid::new_v4(), "admin").unwrap();

        assert_eq!(verifier.verify(&token), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let tokens = service();
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: "customer".to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"0123456789abcdef0123456789abcdef"),
        )
        .unwrap();

        assert_eq!(tokens.verify(&token), Err(TokenError::ExpiredToken));
    }

    #[test]
    fn test_verify_rejects_token_at_exact_expiry_second() {
        // Expiry is inclusive: exp == now is already invalid
        let tokens = service();
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: "customer".to_string(),
            iat: (now - Duration::hours(1)).timestamp(),
            exp: now.timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"0123456789abcdef0123456789abcdef"),
        )
        .unwrap();

        assert_eq!(tokens.verify(&token), Err(TokenError::ExpiredToken));
    }

    #[test]
    fn test_token_service_is_clone() {
        // Required because TokenService is a field of the shared app state
        fn assert_clone<T: Clone>() {}
        assert_clone::<TokenService>();
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let tokens = service();
        assert_eq!(
            tokens.verify("not-a-jwt"),
            Err(TokenError::MalformedCredential)
        );
        assert_eq!(
            tokens.verify("a.b.c"),
            Err(TokenError::MalformedCredential)
        );
        assert_eq!(tokens.verify(""), Err(TokenError::MalformedCredential));
    }

    #[test]
    fn test_verify_rejects_oversized_token() {
        let tokens = service();
        let huge = "x".repeat(MAX_TOKEN_SIZE_BYTES + 1);
        assert_eq!(tokens.verify(&huge), Err(TokenError::MalformedCredential));
    }

    #[test]
    fn test_extract_bearer_success() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );

        assert_eq!(extract_bearer(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_extract_bearer_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), Err(TokenError::MissingCredential));
    }

    #[test]
    fn test_extract_bearer_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );

        assert_eq!(
            extract_bearer(&headers),
            Err(TokenError::MalformedCredential)
        );
    }

    #[test]
    fn test_error_mapping_collapses_to_reason_codes() {
        assert!(matches!(
            ApiError::from(TokenError::MissingCredential),
            ApiError::Unauthenticated(CredentialFailure::MissingCredential)
        ));
        assert!(matches!(
            ApiError::from(TokenError::InvalidToken),
            ApiError::Unauthenticated(CredentialFailure::InvalidCredential)
        ));
        assert!(matches!(
            ApiError::from(TokenError::MalformedCredential),
            ApiError::Unauthenticated(CredentialFailure::InvalidCredential)
        ));
        assert!(matches!(
            ApiError::from(TokenError::ExpiredToken),
            ApiError::Unauthenticated(CredentialFailure::ExpiredCredential)
        ));
    }
}
