//! Hourly simulator of a single household's energy economy: a price-volatile
//! market, a battery with weighted-average cost-basis accounting, and a house
//! load that draws from storage before buying from the grid.

pub mod config;
pub mod devices;
pub mod io;
/// Market price table (CSV ingest) and per-tick price feed.
pub mod market;
/// Simulation engine, clock, wallet, and tick records.
pub mod sim;
