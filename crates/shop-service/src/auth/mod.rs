//! Authentication: token claims, signing/verification, identity resolution.

pub mod claims;
pub mod identity;
pub mod token;

pub use claims::Claims;
pub use identity::{resolve, Identity, ResolveError, Role, UserStore};
pub use token::{extract_bearer, TokenError, TokenService};
