//! # Shop Test Utilities
//!
//! Shared test utilities for the shop API service.
//!
//! This crate provides:
//! - Test data builders (TestTokenBuilder for signed access tokens)
//! - User store fixtures (InMemoryUserStore, FailingUserStore)
//! - A fixed signing secret so tokens and services agree in tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shop_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let store = InMemoryUserStore::new();
//!     let alice = store.seed_user("alice@example.com", "customer", "hunter2");
//!
//!     let token = TestTokenBuilder::new()
//!         .for_user(alice)
//!         .with_role("customer")
//!         .sign();
//! }
//! ```

pub mod server_harness;
pub mod token_builders;
pub mod user_fixtures;

// Re-export commonly used items
pub use server_harness::*;
pub use token_builders::*;
pub use user_fixtures::*;
