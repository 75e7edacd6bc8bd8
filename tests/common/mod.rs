//! Shared test fixtures for integration tests.

use chrono::NaiveDate;
use homegrid_sim::devices::{Battery, House};
use homegrid_sim::market::{PriceFeed, PriceTable};
use homegrid_sim::sim::clock::Clock;
use homegrid_sim::sim::engine::Engine;
use homegrid_sim::sim::wallet::Wallet;

/// Default clock starting 2025-01-01 00:00.
pub fn default_clock() -> Clock {
    Clock::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
}

/// Default battery (150 kWh, 50 kWh held at $0.10, 12-year lifespan).
pub fn default_battery() -> Battery {
    Battery::new(150.0, 50.0, 0.10, 12 * 365 * 24, 336.87)
}

/// Default house load (0.4 kWh base rate, seed 42).
pub fn default_house() -> House {
    House::new(0.4, 42)
}

/// Default wallet ($5,000).
pub fn default_wallet() -> Wallet {
    Wallet::new(5000.0)
}

/// Default engine on the fallback price walk ($200 monthly income).
pub fn default_engine() -> Engine {
    Engine::new(
        default_clock(),
        PriceFeed::fallback(0.10, 42),
        default_battery(),
        default_house(),
        default_wallet(),
        200.0,
        336.87,
    )
}

/// Engine identical to [`default_engine`] but reading prices from `table`.
pub fn engine_with_table(table: PriceTable) -> Engine {
    Engine::new(
        default_clock(),
        PriceFeed::with_table(table, 0.10),
        default_battery(),
        default_house(),
        default_wallet(),
        200.0,
        336.87,
    )
}

/// Builds a full-January price CSV with a deterministic per-hour price
/// (`100 + hour` in source units).
pub fn january_price_csv() -> String {
    let mut csv = String::from("Month,Day,Hour,SMP\n");
    for day in 1..=31 {
        for hour in 0..24 {
            csv.push_str(&format!("1,{day},{hour},{:.2}\n", 100.0 + hour as f64));
        }
    }
    csv
}
