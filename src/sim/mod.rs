/// Calendar clock, one tick per simulated hour.
pub mod clock;
pub mod engine;
/// Post-hoc run summary.
pub mod summary;
pub mod types;
/// Guarded cash ledger.
pub mod wallet;

// Re-export the main types for convenience
pub use clock::Clock;
pub use engine::{Engine, Snapshot};
pub use summary::SummaryReport;
pub use types::TickResult;
pub use wallet::Wallet;
