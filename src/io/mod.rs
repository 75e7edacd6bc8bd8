//! File input/output helpers.

/// CSV export of tick records.
pub mod export;

pub use export::{ExportError, export_csv, write_csv};
