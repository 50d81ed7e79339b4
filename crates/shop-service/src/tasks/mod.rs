//! Background tasks for the shop API.
//!
//! # Tasks
//!
//! - `window_sweeper` - Evicts stale rate-limiter windows so the key map
//!   does not grow without bound

pub mod window_sweeper;

pub use window_sweeper::start_window_sweeper;
