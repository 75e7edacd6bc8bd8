//! Post-hoc run summary computed from tick records.

use std::fmt;

use super::types::TickResult;

/// Aggregate figures for a complete simulation run.
///
/// Computed after the fact from `&[TickResult]` so the summary can never
/// disagree with the per-tick records.
#[derive(Debug, Clone)]
pub struct SummaryReport {
    /// Total household consumption (kWh).
    pub total_energy_kwh: f64,
    /// Consumption covered from storage (kWh).
    pub storage_energy_kwh: f64,
    /// Consumption bought from the market (kWh).
    pub market_energy_kwh: f64,
    /// Market spend on consumption (USD, paid ticks only).
    pub market_spend_usd: f64,
    /// Energy bought by the automated policy (kWh).
    pub auto_bought_kwh: f64,
    /// Periodic income credited over the run (USD).
    pub income_usd: f64,
    /// Lowest market price seen (USD/kWh).
    pub min_price: f64,
    /// Highest market price seen (USD/kWh).
    pub max_price: f64,
    /// Battery energy throughput (kWh, discharges plus automated charges).
    pub battery_throughput_kwh: f64,
    /// Battery equivalent full cycles (throughput / 2*nameplate capacity).
    pub battery_equivalent_cycles: f64,
    /// Battery state of health at the end of the run.
    pub final_health: f64,
    /// Wallet balance at the end of the run (USD).
    pub final_balance_usd: f64,
    /// Cash plus the book value of stored energy at the end of the run (USD).
    pub net_position_usd: f64,
    /// Ticks where the wallet could not cover the market spend.
    pub unpaid_tick_count: usize,
}

impl SummaryReport {
    /// Computes the summary from the complete tick record vector.
    ///
    /// `battery_capacity_kwh` is the nameplate capacity used for the
    /// equivalent-cycle calculation.
    pub fn from_results(results: &[TickResult], battery_capacity_kwh: f64) -> Self {
        if results.is_empty() {
            return Self {
                total_energy_kwh: 0.0,
                storage_energy_kwh: 0.0,
                market_energy_kwh: 0.0,
                market_spend_usd: 0.0,
                auto_bought_kwh: 0.0,
                income_usd: 0.0,
                min_price: 0.0,
                max_price: 0.0,
                battery_throughput_kwh: 0.0,
                battery_equivalent_cycles: 0.0,
                final_health: 0.0,
                final_balance_usd: 0.0,
                net_position_usd: 0.0,
                unpaid_tick_count: 0,
            };
        }

        let mut total = 0.0;
        let mut storage = 0.0;
        let mut market = 0.0;
        let mut spend = 0.0;
        let mut auto = 0.0;
        let mut income = 0.0;
        let mut min_price = f64::INFINITY;
        let mut max_price = f64::NEG_INFINITY;
        let mut unpaid = 0_usize;

        for r in results {
            total += r.demand_kwh;
            storage += r.storage_kwh;
            market += r.market_kwh;
            auto += r.auto_buy_kwh;
            income += r.income_usd;
            min_price = min_price.min(r.price_usd_per_kwh);
            max_price = max_price.max(r.price_usd_per_kwh);
            if r.energy_paid {
                spend += r.energy_cost_usd;
            } else {
                unpaid += 1;
            }
        }

        let throughput = storage + auto;
        let cycles = if battery_capacity_kwh > 0.0 {
            throughput / (2.0 * battery_capacity_kwh)
        } else {
            0.0
        };

        let last = &results[results.len() - 1];

        Self {
            total_energy_kwh: total,
            storage_energy_kwh: storage,
            market_energy_kwh: market,
            market_spend_usd: spend,
            auto_bought_kwh: auto,
            income_usd: income,
            min_price,
            max_price,
            battery_throughput_kwh: throughput,
            battery_equivalent_cycles: cycles,
            final_health: last.battery_health,
            final_balance_usd: last.balance_usd,
            net_position_usd: last.balance_usd + last.battery_charge_kwh * last.battery_avg_cost,
            unpaid_tick_count: unpaid,
        }
    }

    /// Share of consumption covered from storage, in percent.
    pub fn storage_share_pct(&self) -> f64 {
        if self.total_energy_kwh > 0.0 {
            100.0 * self.storage_energy_kwh / self.total_energy_kwh
        } else {
            0.0
        }
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Run Summary ---")?;
        writeln!(
            f,
            "Consumption:        {:.1} kWh ({:.1}% from storage)",
            self.total_energy_kwh,
            self.storage_share_pct()
        )?;
        writeln!(
            f,
            "Market purchases:   {:.1} kWh for {:.2} $",
            self.market_energy_kwh, self.market_spend_usd
        )?;
        writeln!(f, "Auto-buy volume:    {:.1} kWh", self.auto_bought_kwh)?;
        writeln!(f, "Income received:    {:.2} $", self.income_usd)?;
        writeln!(
            f,
            "Price range:        {:.3} - {:.3} $/kWh",
            self.min_price, self.max_price
        )?;
        writeln!(
            f,
            "Battery throughput: {:.1} kWh ({:.2} equivalent cycles)",
            self.battery_throughput_kwh, self.battery_equivalent_cycles
        )?;
        writeln!(
            f,
            "Battery health:     {:.1}%",
            self.final_health * 100.0
        )?;
        writeln!(f, "Unpaid ticks:       {}", self.unpaid_tick_count)?;
        writeln!(f, "Final balance:      {:.2} $", self.final_balance_usd)?;
        write!(f, "Net position:       {:.2} $", self.net_position_usd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tick(demand: f64, storage: f64, price: f64, paid: bool) -> TickResult {
        let market = demand - storage;
        TickResult {
            tick: 0,
            timestamp: "2025-01-01 00:00".to_string(),
            price_usd_per_kwh: price,
            demand_kwh: demand,
            storage_kwh: storage,
            market_kwh: market,
            energy_cost_usd: market * price,
            energy_paid: paid,
            income_usd: 0.0,
            auto_buy_kwh: 0.0,
            battery_charge_kwh: 10.0,
            battery_health: 0.9,
            battery_avg_cost: 0.10,
            balance_usd: 4200.0,
        }
    }

    #[test]
    fn totals_and_split() {
        let results = vec![
            make_tick(1.0, 1.0, 0.10, true),
            make_tick(2.0, 0.5, 0.12, true),
            make_tick(1.0, 0.0, 0.08, true),
        ];
        let s = SummaryReport::from_results(&results, 150.0);
        assert!((s.total_energy_kwh - 4.0).abs() < 1e-12);
        assert!((s.storage_energy_kwh - 1.5).abs() < 1e-12);
        assert!((s.market_energy_kwh - 2.5).abs() < 1e-12);
        assert!((s.storage_share_pct() - 37.5).abs() < 1e-9);
        assert_eq!(s.min_price, 0.08);
        assert_eq!(s.max_price, 0.12);
    }

    #[test]
    fn unpaid_ticks_are_counted_and_excluded_from_spend() {
        let results = vec![
            make_tick(1.0, 0.0, 0.10, true),
            make_tick(1.0, 0.0, 0.10, false),
        ];
        let s = SummaryReport::from_results(&results, 150.0);
        assert_eq!(s.unpaid_tick_count, 1);
        assert!((s.market_spend_usd - 0.10).abs() < 1e-12);
    }

    #[test]
    fn final_state_comes_from_last_tick() {
        let mut results = vec![make_tick(1.0, 0.0, 0.10, true); 3];
        results[2].balance_usd = 1234.0;
        results[2].battery_health = 0.5;
        let s = SummaryReport::from_results(&results, 150.0);
        assert_eq!(s.final_balance_usd, 1234.0);
        assert_eq!(s.final_health, 0.5);
    }

    #[test]
    fn throughput_counts_discharges_and_auto_buys() {
        let mut results = vec![
            make_tick(1.0, 1.0, 0.10, true),
            make_tick(2.0, 0.5, 0.10, true),
        ];
        results[1].auto_buy_kwh = 3.5;
        let s = SummaryReport::from_results(&results, 10.0);
        // 1.0 + 0.5 discharged, 3.5 charged back in
        assert!((s.battery_throughput_kwh - 5.0).abs() < 1e-12);
        assert!((s.battery_equivalent_cycles - 0.25).abs() < 1e-12);
    }

    #[test]
    fn net_position_adds_stored_energy_book_value() {
        // Last tick: 10 kWh in the battery at 0.10 $/kWh on a 4200 $ balance.
        let s = SummaryReport::from_results(&[make_tick(1.0, 0.0, 0.10, true)], 150.0);
        assert!((s.net_position_usd - 4201.0).abs() < 1e-12);
    }

    #[test]
    fn zero_capacity_yields_zero_cycles() {
        let s = SummaryReport::from_results(&[make_tick(1.0, 1.0, 0.10, true)], 0.0);
        assert_eq!(s.battery_equivalent_cycles, 0.0);
    }

    #[test]
    fn empty_results() {
        let s = SummaryReport::from_results(&[], 150.0);
        assert_eq!(s.total_energy_kwh, 0.0);
        assert_eq!(s.storage_share_pct(), 0.0);
        assert_eq!(s.battery_equivalent_cycles, 0.0);
        assert_eq!(s.unpaid_tick_count, 0);
    }

    #[test]
    fn display_does_not_panic() {
        let s = SummaryReport::from_results(&[make_tick(1.0, 0.5, 0.10, true)], 150.0);
        let text = format!("{s}");
        assert!(text.contains("Run Summary"));
        assert!(text.contains("Net position"));
    }
}
