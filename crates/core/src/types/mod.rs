//! Domain types for QuoteSync
//!
//! - `quote`: the versioned quote record and its identifier
//! - `ids`: id generators
//! - `catalog`: default seed data and category helpers

mod catalog;
mod ids;
mod quote;

pub use catalog::{categories, default_quotes, filter_by_category};
pub use ids::{IdGenerator, SequentialIds, UuidGenerator};
pub use quote::{normalize_category, QuoteRecord, RecordId, DEFAULT_AUTHOR};
