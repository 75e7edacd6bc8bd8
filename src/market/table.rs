//! CSV ingest of the yearly market price table.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Conversion from the source system marginal price (KRW per kWh) into the
/// simulation's USD per kWh, at a flat exchange rate.
pub const DEFAULT_CONVERSION: f64 = 1.0 / 1300.0;

/// Error loading or parsing a price table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("cannot read price table: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed price table: {0}")]
    Csv(#[from] csv::Error),
}

/// One source row: `Month,Day,Hour,SMP`.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Month")]
    month: u32,
    #[serde(rename = "Day")]
    day: u32,
    #[serde(rename = "Hour")]
    hour: u32,
    #[serde(rename = "SMP")]
    smp: f64,
}

/// Immutable hourly price lookup for one calendar year.
///
/// Keys are `(month 1-12, day 1-31, hour 0-23)` exactly as the source data is
/// indexed; callers working with a 0-indexed calendar month shift before
/// looking up. Populated once at load, never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<(u32, u32, u32), f64>,
}

impl PriceTable {
    /// Returns a table with no entries; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads a table from a CSV file at `path`.
    ///
    /// Source prices are multiplied by `conversion` into USD per kWh.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] if the file cannot be read or any row fails
    /// to parse. Callers treat this as non-fatal and fall back to an empty
    /// table or the random-walk feed.
    pub fn from_csv_path(path: &Path, conversion: f64) -> Result<Self, TableError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file, conversion)
    }

    /// Loads a table from any CSV reader with a `Month,Day,Hour,SMP` header.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] on malformed rows.
    pub fn from_csv_reader<R: Read>(reader: R, conversion: f64) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
        let mut prices = HashMap::new();
        for record in rdr.deserialize() {
            let row: RawRow = record?;
            prices.insert((row.month, row.day, row.hour), row.smp * conversion);
        }
        Ok(Self { prices })
    }

    /// Looks up the price for `(month 1-12, day, hour)` in USD per kWh.
    pub fn get(&self, month: u32, day: u32, hour: u32) -> Option<f64> {
        self.prices.get(&(month, day, hour)).copied()
    }

    /// Returns the number of hourly entries loaded.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Returns `true` when no entries were loaded.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Month,Day,Hour,SMP
1,1,0,120.39
1,1,1,118.20
3,1,1,117.39
12,31,23,105.57
";

    #[test]
    fn parses_rows_and_converts_units() {
        let table = PriceTable::from_csv_reader(SAMPLE.as_bytes(), DEFAULT_CONVERSION)
            .expect("sample should parse");
        assert_eq!(table.len(), 4);
        let p = table.get(1, 1, 0).expect("entry should exist");
        assert!((p - 120.39 / 1300.0).abs() < 1e-12);
    }

    #[test]
    fn header_row_is_not_a_data_row() {
        let table = PriceTable::from_csv_reader(SAMPLE.as_bytes(), 1.0).expect("should parse");
        // Nothing keyed off the header text.
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn missing_combination_is_none() {
        let table = PriceTable::from_csv_reader(SAMPLE.as_bytes(), 1.0).expect("should parse");
        assert!(table.get(3, 1, 0).is_none());
        assert!(table.get(6, 15, 12).is_none());
    }

    #[test]
    fn malformed_row_is_an_error() {
        let bad = "Month,Day,Hour,SMP\n1,1,zero,120.39\n";
        let result = PriceTable::from_csv_reader(bad.as_bytes(), 1.0);
        assert!(result.is_err());
    }

    #[test]
    fn empty_table_misses_everything() {
        let table = PriceTable::empty();
        assert!(table.is_empty());
        assert!(table.get(1, 1, 0).is_none());
    }

    #[test]
    fn nonexistent_file_is_an_io_error() {
        let result =
            PriceTable::from_csv_path(Path::new("/no/such/smp_data.csv"), DEFAULT_CONVERSION);
        assert!(matches!(result, Err(TableError::Io(_))));
    }
}
