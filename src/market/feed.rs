//! Per-tick market price feed.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::warn;

use crate::market::table::PriceTable;
use crate::sim::clock::Clock;

/// Recent prices kept for observability before the oldest is evicted.
const PRICE_HISTORY_CAP: usize = 100;

/// Price band and per-tick delta for the fallback random walk (USD/kWh).
const WALK_MIN_PRICE: f64 = 0.05;
const WALK_MAX_PRICE: f64 = 0.15;
const WALK_STEP: f64 = 0.01;

/// Where the feed sources each tick's price.
#[derive(Debug, Clone)]
enum Source {
    /// Time-indexed table lookup; misses retain the previous price.
    Table(PriceTable),
    /// Bounded symmetric random walk, used only when no table is available.
    Walk { rng: StdRng },
}

/// The market price, updated once per tick from the clock position.
///
/// With a table, each tick looks up `(month, day, hour)`; a miss is tolerated
/// (the previous price carries over) and logged as a warning, never an error.
/// Without a table, the price follows a seeded random walk clamped to a fixed
/// band.
#[derive(Debug, Clone)]
pub struct PriceFeed {
    source: Source,
    current_price: f64,
    recent_prices: Vec<f64>,
}

impl PriceFeed {
    /// Creates a feed backed by a price table.
    ///
    /// `initial_price` is the price reported before the first update and
    /// whenever early lookups miss.
    pub fn with_table(table: PriceTable, initial_price: f64) -> Self {
        Self {
            source: Source::Table(table),
            current_price: initial_price,
            recent_prices: Vec::with_capacity(PRICE_HISTORY_CAP),
        }
    }

    /// Creates a table-less feed driven by a seeded random walk.
    pub fn fallback(initial_price: f64, seed: u64) -> Self {
        Self {
            source: Source::Walk {
                rng: StdRng::seed_from_u64(seed),
            },
            current_price: initial_price,
            recent_prices: Vec::with_capacity(PRICE_HISTORY_CAP),
        }
    }

    /// Advances the feed to the clock's calendar position.
    ///
    /// The calendar month is 0-indexed while the table is 1-indexed; the
    /// shift happens here.
    pub fn update(&mut self, clock: &Clock) {
        match &mut self.source {
            Source::Table(table) => {
                let (month, day, hour) = (clock.month0() + 1, clock.day(), clock.hour());
                match table.get(month, day, hour) {
                    Some(price) => self.current_price = price,
                    None => {
                        warn!(
                            month,
                            day, hour, "no market price for this hour, keeping previous price"
                        );
                    }
                }
            }
            Source::Walk { rng } => {
                let delta = (rng.random::<f64>() - 0.5) * WALK_STEP;
                self.current_price =
                    (self.current_price + delta).clamp(WALK_MIN_PRICE, WALK_MAX_PRICE);
            }
        }

        self.recent_prices.push(self.current_price);
        if self.recent_prices.len() > PRICE_HISTORY_CAP {
            self.recent_prices.remove(0);
        }
    }

    /// Returns the current price in USD per kWh.
    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// Returns the bounded recent-price history, oldest first.
    pub fn recent_prices(&self) -> &[f64] {
        &self.recent_prices
    }
}
