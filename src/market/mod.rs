//! The energy market: a time-indexed price table and the per-tick feed.

/// Per-tick market price with gap tolerance and a random-walk fallback.
pub mod feed;
/// Immutable `(month, day, hour)` price lookup loaded from CSV.
pub mod table;

// Re-export the main types for convenience
pub use feed::PriceFeed;
pub use table::{PriceTable, TableError};
