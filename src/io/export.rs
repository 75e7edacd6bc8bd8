//! CSV export for simulation tick records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use crate::sim::types::TickResult;

/// Error writing the telemetry CSV.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write telemetry file: {0}")]
    Io(#[from] io::Error),
    #[error("cannot encode telemetry row: {0}")]
    Csv(#[from] csv::Error),
}

/// Schema v1 column header for CSV telemetry export.
const HEADER: &str = "tick,timestamp,price_usd_per_kwh,demand_kwh,storage_kwh,\
                      market_kwh,energy_cost_usd,energy_paid,income_usd,\
                      auto_buy_kwh,battery_charge_kwh,battery_health,\
                      battery_avg_cost,balance_usd";

/// Exports tick records to a CSV file at the given path.
///
/// Writes a header row followed by one data row per tick. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an [`ExportError`] if file creation or writing fails.
pub fn export_csv(results: &[TickResult], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(results, buf)
}

/// Writes tick records as CSV to any writer.
///
/// # Errors
///
/// Returns an [`ExportError`] if writing fails.
pub fn write_csv(results: &[TickResult], writer: impl Write) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    // Data rows
    for r in results {
        wtr.write_record(&[
            r.tick.to_string(),
            r.timestamp.clone(),
            format!("{:.4}", r.price_usd_per_kwh),
            format!("{:.4}", r.demand_kwh),
            format!("{:.4}", r.storage_kwh),
            format!("{:.4}", r.market_kwh),
            format!("{:.4}", r.energy_cost_usd),
            r.energy_paid.to_string(),
            format!("{:.2}", r.income_usd),
            format!("{:.4}", r.auto_buy_kwh),
            format!("{:.4}", r.battery_charge_kwh),
            format!("{:.6}", r.battery_health),
            format!("{:.4}", r.battery_avg_cost),
            format!("{:.4}", r.balance_usd),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
