//! Per-tick simulation records.

use std::fmt;

/// Complete record of one simulated hour.
///
/// One `TickResult` is produced per tick, capturing the market price, the
/// demand split, the wallet movements, and the battery state after the tick.
#[derive(Debug, Clone)]
pub struct TickResult {
    /// Tick index, starting at 0.
    pub tick: u64,
    /// Calendar timestamp after the tick, e.g. `2025-01-01 01:00`.
    pub timestamp: String,
    /// Market price for this hour (USD/kWh).
    pub price_usd_per_kwh: f64,
    /// Household demand this hour (kWh).
    pub demand_kwh: f64,
    /// Demand portion drawn from the battery (kWh).
    pub storage_kwh: f64,
    /// Demand portion bought from the market (kWh).
    pub market_kwh: f64,
    /// Market spend billed to the wallet for this hour (USD).
    pub energy_cost_usd: f64,
    /// Whether the wallet covered the market spend.
    pub energy_paid: bool,
    /// Periodic income credited on this tick (USD, 0 except on month rollover).
    pub income_usd: f64,
    /// Energy bought by the automated policy on this tick (kWh).
    pub auto_buy_kwh: f64,
    /// Battery charge after the tick (kWh).
    pub battery_charge_kwh: f64,
    /// Battery state of health after the tick (0.0 to 1.0).
    pub battery_health: f64,
    /// Battery average energy cost after the tick (USD/kWh).
    pub battery_avg_cost: f64,
    /// Wallet balance after the tick (USD).
    pub balance_usd: f64,
}

impl fmt::Display for TickResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>5} [{}] | price={:.3} $/kWh | demand={:.2} kWh \
             (bat={:.2}, grid={:.2}) cost={:.3} $ paid={} | \
             auto={:.1} kWh income={:.0} $ | \
             bat={:.1} kWh (SoH={:.1}%, avg={:.3} $/kWh) | balance={:.2} $",
            self.tick,
            self.timestamp,
            self.price_usd_per_kwh,
            self.demand_kwh,
            self.storage_kwh,
            self.market_kwh,
            self.energy_cost_usd,
            self.energy_paid,
            self.auto_buy_kwh,
            self.income_usd,
            self.battery_charge_kwh,
            self.battery_health * 100.0,
            self.battery_avg_cost,
            self.balance_usd,
        )
    }
}
