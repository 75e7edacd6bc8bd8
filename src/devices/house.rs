use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::devices::battery::Battery;
use crate::sim::clock::Clock;

/// Hourly demand multiplier by hour of day (0-23).
///
/// Smooth gradient: low night, morning ramp, day plateau, evening peak, drop.
const DIURNAL_PROFILE: [f64; 24] = [
    0.4, 0.4, 0.35, 0.35, 0.4, 0.5, // 00-05: deep night
    0.7, 1.0, 1.1, 1.0, 0.9, 0.9, // 06-11: morning ramp
    1.0, 1.1, 1.0, 1.1, 1.3, 1.6, // 12-17: afternoon, pre-peak
    2.3, 2.5, 2.4, 1.8, 1.2, 0.7, // 18-23: evening peak, drop
];

/// Multiplicative demand noise band: uniform in [0.9, 1.1).
const NOISE_BAND: (f64, f64) = (0.9, 1.1);

/// Usage samples kept for observability before the oldest is evicted.
const USAGE_HISTORY_CAP: usize = 50;

/// One recorded demand sample, tagged with the hour it occurred.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct UsageSample {
    /// Demand for that hour in kWh.
    pub kwh: f64,
    /// Hour of day (0-23).
    pub hour: u32,
}

/// Result of satisfying one hour of household demand.
///
/// `storage_kwh + market_kwh == demand_kwh` holds for every call: the load is
/// never curtailed, whatever storage cannot cover is bought from the grid.
#[derive(Debug, Clone, Copy)]
pub struct ConsumeOutcome {
    /// Total demand this hour in kWh.
    pub demand_kwh: f64,
    /// Portion drawn from the battery in kWh.
    pub storage_kwh: f64,
    /// Portion bought at the market price in kWh.
    pub market_kwh: f64,
    /// Total cost attributed to this hour in USD (storage energy at the
    /// battery's pre-discharge average cost plus market energy at the
    /// market price).
    pub cost_usd: f64,
}

/// The consuming household load.
///
/// Each tick, `House` computes hourly demand from a fixed diurnal profile
/// with bounded multiplicative noise, satisfies it storage-first and
/// market-second, and aggregates statistics per calendar month.
#[derive(Debug, Clone)]
pub struct House {
    /// Baseline consumption in kWh per hour.
    base_rate_kwh: f64,

    /// Energy consumed in the current calendar month (kWh).
    monthly_energy_kwh: f64,

    /// Cost attributed to the current calendar month (USD).
    monthly_cost_usd: f64,

    /// Last calendar month seen (0-indexed); `None` before the first tick.
    current_month: Option<u32>,

    /// Bounded recent-demand history, oldest evicted first.
    recent_usage: Vec<UsageSample>,

    rng: StdRng,
}

impl House {
    /// Creates a new house load.
    ///
    /// # Arguments
    ///
    /// * `base_rate_kwh` - Baseline hourly consumption in kWh (must be > 0)
    /// * `seed` - Seed for the demand-noise RNG
    ///
    /// # Panics
    ///
    /// Panics if `base_rate_kwh` is not strictly positive.
    pub fn new(base_rate_kwh: f64, seed: u64) -> Self {
        assert!(base_rate_kwh > 0.0);
        Self {
            base_rate_kwh,
            monthly_energy_kwh: 0.0,
            monthly_cost_usd: 0.0,
            current_month: None,
            recent_usage: Vec::with_capacity(USAGE_HISTORY_CAP),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Satisfies one hour of demand, storage-first.
    ///
    /// Draws `min(demand, battery.charge_kwh())` from the battery at its
    /// pre-discharge average cost, buys the remainder at `market_price`, and
    /// updates the monthly accumulators (reset on calendar-month rollover).
    ///
    /// Returns the split; the caller bills only the market portion, since
    /// storage energy was paid for when it was charged.
    pub fn consume(
        &mut self,
        battery: &mut Battery,
        market_price: f64,
        clock: &Clock,
    ) -> ConsumeOutcome {
        let hour = clock.hour();
        let month = clock.month0();

        // Monthly accounting is keyed by calendar month, not a trailing
        // 30-day window.
        if self.current_month != Some(month) {
            self.current_month = Some(month);
            self.monthly_energy_kwh = 0.0;
            self.monthly_cost_usd = 0.0;
        }

        let noise = self.rng.random_range(NOISE_BAND.0..NOISE_BAND.1);
        let demand_kwh = self.base_rate_kwh * DIURNAL_PROFILE[hour as usize] * noise;

        let mut cost_usd = 0.0;
        let mut storage_kwh = 0.0;

        // Priority 1: battery. The draw is bounded by the stored energy, so
        // the discharge cannot fail.
        if battery.charge_kwh() > 0.0 {
            storage_kwh = demand_kwh.min(battery.charge_kwh());
            let avg_price = battery.average_cost();
            battery.discharge(storage_kwh);
            cost_usd += storage_kwh * avg_price;
        }

        // Priority 2: grid of last resort, never curtailed.
        let market_kwh = demand_kwh - storage_kwh;
        if market_kwh > 0.0 {
            cost_usd += market_kwh * market_price;
        }

        self.monthly_energy_kwh += demand_kwh;
        self.monthly_cost_usd += cost_usd;

        self.recent_usage.push(UsageSample {
            kwh: demand_kwh,
            hour,
        });
        if self.recent_usage.len() > USAGE_HISTORY_CAP {
            self.recent_usage.remove(0);
        }

        ConsumeOutcome {
            demand_kwh,
            storage_kwh,
            market_kwh,
            cost_usd,
        }
    }

    /// Returns the average unit cost of this month's consumption, or 0.0
    /// before anything was consumed this month.
    pub fn monthly_average_cost(&self) -> f64 {
        if self.monthly_energy_kwh > 0.0 {
            self.monthly_cost_usd / self.monthly_energy_kwh
        } else {
            0.0
        }
    }

    /// Returns the energy consumed in the current calendar month (kWh).
    pub fn monthly_energy_kwh(&self) -> f64 {
        self.monthly_energy_kwh
    }

    /// Returns the cost accumulated in the current calendar month (USD).
    pub fn monthly_cost_usd(&self) -> f64 {
        self.monthly_cost_usd
    }

    /// Returns the bounded recent-demand history, oldest first.
    pub fn recent_usage(&self) -> &[UsageSample] {
        &self.recent_usage
    }
}
