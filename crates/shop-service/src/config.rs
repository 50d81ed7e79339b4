//! Storefront API configuration.
//!
//! Configuration is loaded from environment variables. Sensitive fields are
//! redacted in Debug output. The token-signing secret is mandatory and has no
//! default: a deployment that does not provide one fails at startup instead
//! of silently signing with a well-known value.

use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default rate-limit window in seconds (15 minutes).
pub const DEFAULT_RATE_LIMIT_WINDOW_SECONDS: u64 = 900;

/// Default rate-limit capacity per window.
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 100;

/// Default access-token lifetime in seconds.
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;

/// Minimum accepted signing-secret length in bytes.
pub const MIN_SIGNING_SECRET_BYTES: usize = 32;

/// Storefront API configuration.
///
/// Loaded from environment variables. The database URL and signing secret are
/// redacted in Debug output to prevent credential leakage in logs.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// HMAC secret used to sign and verify access tokens.
    pub token_signing_secret: SecretString,

    /// Clock skew tolerance in seconds applied to expiry validation.
    pub token_leeway_seconds: u64,

    /// Lifetime of issued access tokens in seconds.
    pub token_ttl_seconds: u64,

    /// Fixed rate-limit window duration in seconds.
    pub rate_limit_window_seconds: u64,

    /// Requests admitted per client key per window.
    pub rate_limit_max_requests: u32,

    /// Path prefixes exempt from rate limiting.
    pub rate_limit_exempt_paths: Vec<String>,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("token_signing_secret", &"[REDACTED]")
            .field("token_leeway_seconds", &self.token_leeway_seconds)
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("rate_limit_window_seconds", &self.rate_limit_window_seconds)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_exempt_paths", &self.rate_limit_exempt_paths)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid signing secret: {0}")]
    InvalidSigningSecret(String),

    #[error("Invalid rate limit configuration: {0}")]
    InvalidRateLimit(String),

    #[error("Invalid token configuration: {0}")]
    InvalidToken(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let secret = vars
            .get("TOKEN_SIGNING_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("TOKEN_SIGNING_SECRET".to_string()))?;

        if secret.len() < MIN_SIGNING_SECRET_BYTES {
            return Err(ConfigError::InvalidSigningSecret(format!(
                "TOKEN_SIGNING_SECRET must be at least {} bytes, got {}",
                MIN_SIGNING_SECRET_BYTES,
                secret.len()
            )));
        }

        let token_signing_secret = SecretString::from(secret.clone());

        let token_leeway_seconds =
            parse_u64(vars, "TOKEN_LEEWAY_SECONDS", 0, ConfigError::InvalidToken)?;

        let token_ttl_seconds = parse_u64(
            vars,
            "TOKEN_TTL_SECONDS",
            DEFAULT_TOKEN_TTL_SECONDS,
            ConfigError::InvalidToken,
        )?;
        if token_ttl_seconds == 0 {
            return Err(ConfigError::InvalidToken(
                "TOKEN_TTL_SECONDS must be positive".to_string(),
            ));
        }

        let rate_limit_window_seconds = parse_u64(
            vars,
            "RATE_LIMIT_WINDOW_SECONDS",
            DEFAULT_RATE_LIMIT_WINDOW_SECONDS,
            ConfigError::InvalidRateLimit,
        )?;
        if rate_limit_window_seconds == 0 {
            return Err(ConfigError::InvalidRateLimit(
                "RATE_LIMIT_WINDOW_SECONDS must be positive".to_string(),
            ));
        }

        let rate_limit_max_requests = if let Some(value_str) = vars.get("RATE_LIMIT_MAX_REQUESTS") {
            let value: u32 = value_str.parse().map_err(|e| {
                ConfigError::InvalidRateLimit(format!(
                    "RATE_LIMIT_MAX_REQUESTS must be a valid integer, got '{}': {}",
                    value_str, e
                ))
            })?;
            if value == 0 {
                return Err(ConfigError::InvalidRateLimit(
                    "RATE_LIMIT_MAX_REQUESTS must be positive".to_string(),
                ));
            }
            value
        } else {
            DEFAULT_RATE_LIMIT_MAX_REQUESTS
        };

        let rate_limit_exempt_paths = vars
            .get("RATE_LIMIT_EXEMPT_PATHS")
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["/health".to_string()]);

        Ok(Config {
            database_url,
            bind_address,
            token_signing_secret,
            token_leeway_seconds,
            token_ttl_seconds,
            rate_limit_window_seconds,
            rate_limit_max_requests,
            rate_limit_exempt_paths,
        })
    }
}

fn parse_u64(
    vars: &HashMap<String, String>,
    key: &str,
    default: u64,
    err: fn(String) -> ConfigError,
) -> Result<u64, ConfigError> {
    match vars.get(key) {
        Some(value_str) => value_str.parse().map_err(|e| {
            err(format!(
                "{} must be a valid integer, got '{}': {}",
                key, value_str, e
            ))
        }),
        None => Ok(default),
    }
}
