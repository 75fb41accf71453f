//! Domain model shared by every QuoteSync crate
//!
//! - `QuoteRecord` and its `RecordId`
//! - Category normalization and filtering
//! - The default seed collection
//! - Pluggable id generation

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, CoreResult};
pub use types::{
    categories, default_quotes, filter_by_category, normalize_category, IdGenerator, QuoteRecord,
    RecordId, SequentialIds, UuidGenerator, DEFAULT_AUTHOR,
};
