//! Resilience helpers for calls that leave the process
//!
//! Remote store calls are bounded by a deadline; the sync coordinator
//! itself has none, so every network-bound operation goes through
//! [`Timeout`].
//!
//! # Example
//!
//! ```rust
//! use quotesync_resilience::Timeout;
//! use std::time::Duration;
//!
//! # async fn demo() {
//! let timeout = Timeout::new(Duration::from_secs(5));
//! let value = timeout.execute(async { 42 }).await.unwrap();
//! assert_eq!(value, 42);
//! # }
//! ```

mod error;
mod timeout;

pub use error::{ResilienceError, ResilienceResult};
pub use timeout::{with_timeout, Timeout};
