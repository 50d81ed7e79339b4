//! HTTP request handlers.
//!
//! Every protected handler declares exactly one authorization requirement and
//! passes it through the guard before doing anything else.

pub mod auth_handler;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;
