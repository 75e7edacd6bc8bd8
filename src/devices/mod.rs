//! Household asset models: battery storage and the consuming load.

/// Battery storage with cost-basis accounting and health decay.
pub mod battery;
/// Hourly household load with a diurnal demand profile.
pub mod house;

// Re-export the main types for convenience
pub use battery::Battery;
pub use house::{ConsumeOutcome, House, UsageSample};
