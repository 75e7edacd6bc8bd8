//! Simulation engine that orchestrates the clock, market, battery, house,
//! and wallet through the fixed hourly tick cycle.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::config::ScenarioConfig;
use crate::devices::{Battery, House, UsageSample};
use crate::market::{PriceFeed, PriceTable};

use super::clock::Clock;
use super::types::TickResult;
use super::wallet::Wallet;

/// Seed offset for the price-walk RNG to avoid correlation with demand noise.
const FEED_SEED_OFFSET: u64 = 1;

/// Read-only view of the whole simulation for an external presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Formatted current time.
    pub time: String,
    /// Current market price (USD/kWh).
    pub price_usd_per_kwh: f64,
    /// Bounded recent-price history, oldest first.
    pub recent_prices: Vec<f64>,
    /// Battery state.
    pub battery: BatterySnapshot,
    /// Average unit cost of this month's consumption (USD/kWh).
    pub monthly_average_cost: f64,
    /// Bounded recent-demand history, oldest first.
    pub recent_usage: Vec<UsageSample>,
    /// Wallet balance (USD).
    pub balance_usd: f64,
}

/// Battery portion of a [`Snapshot`].
#[derive(Debug, Clone, Serialize)]
pub struct BatterySnapshot {
    pub charge_kwh: f64,
    pub capacity_kwh: f64,
    pub effective_capacity_kwh: f64,
    pub health: f64,
    pub average_cost: f64,
    pub total_investment_usd: f64,
}

/// The orchestrator.
///
/// Owns exactly one of each component for the simulation's lifetime and
/// advances them in a fixed order each tick: clock, battery aging, price
/// feed, consumption (with the market spend debited), monthly income, and
/// the optional automated purchase policy. Failures inside a tick
/// (insufficient funds, battery full) change state but never abort the tick.
///
/// External inputs — manual trades, policy toggles, capacity expansion — are
/// plain method calls applied between ticks.
#[derive(Debug, Clone)]
pub struct Engine {
    clock: Clock,
    feed: PriceFeed,
    battery: Battery,
    house: House,
    wallet: Wallet,
    monthly_income_usd: f64,
    expansion_cost_per_kwh: f64,
    auto_buy_enabled: bool,
    auto_buy_threshold: f64,
    auto_buy_amount_kwh: f64,
    last_month: u32,
    ticks: u64,
}

impl Engine {
    /// Creates an engine from already-built components.
    ///
    /// Auto-buy starts disabled; enable it with [`Engine::set_auto_buy`].
    pub fn new(
        clock: Clock,
        feed: PriceFeed,
        battery: Battery,
        house: House,
        wallet: Wallet,
        monthly_income_usd: f64,
        expansion_cost_per_kwh: f64,
    ) -> Self {
        let last_month = clock.month0();
        Self {
            clock,
            feed,
            battery,
            house,
            wallet,
            monthly_income_usd,
            expansion_cost_per_kwh,
            auto_buy_enabled: false,
            auto_buy_threshold: 0.0,
            auto_buy_amount_kwh: 0.0,
            last_month,
            ticks: 0,
        }
    }

    /// Builds an engine from a validated scenario configuration.
    ///
    /// `table` is the loaded price table, or `None` to run the feed on its
    /// random-walk fallback.
    pub fn from_config(cfg: &ScenarioConfig, table: Option<PriceTable>) -> Self {
        let s = &cfg.simulation;
        // The start date is checked by `ScenarioConfig::validate`; an invalid
        // one that slipped through falls back to the epoch rather than panic.
        let clock = Clock::new(
            NaiveDate::from_ymd_opt(s.start_year, s.start_month, s.start_day).unwrap_or_default(),
        );

        let m = &cfg.market;
        let feed = match table {
            Some(table) => PriceFeed::with_table(table, m.initial_price),
            None => PriceFeed::fallback(m.initial_price, s.seed.wrapping_add(FEED_SEED_OFFSET)),
        };

        let b = &cfg.battery;
        let battery = Battery::new(
            b.capacity_kwh,
            b.initial_charge_kwh,
            b.initial_cost_per_kwh,
            (b.lifespan_years * 365.0 * 24.0) as u64,
            b.asset_cost_per_kwh,
        );

        let house = House::new(cfg.house.base_rate_kwh, s.seed);
        let wallet = Wallet::new(cfg.wallet.initial_balance_usd);

        let mut engine = Self::new(
            clock,
            feed,
            battery,
            house,
            wallet,
            s.monthly_income_usd,
            b.asset_cost_per_kwh,
        );

        let a = &cfg.auto_buy;
        engine.set_auto_buy_threshold(a.threshold_usd_per_kwh);
        engine.set_auto_buy_amount(a.amount_kwh);
        engine.set_auto_buy(a.enabled);
        engine
    }

    /// Executes one simulated hour and returns its record.
    pub fn tick(&mut self) -> TickResult {
        // Fixed cycle order; every failure below is absorbed and the tick
        // always completes.
        self.clock.tick();
        self.battery.degrade();
        self.feed.update(&self.clock);
        let price = self.feed.current_price();

        let outcome = self.house.consume(&mut self.battery, price, &self.clock);
        let energy_cost_usd = outcome.market_kwh * price;
        let energy_paid = if energy_cost_usd > 0.0 {
            let paid = self.wallet.debit(energy_cost_usd);
            if !paid {
                debug!(
                    cost = energy_cost_usd,
                    balance = self.wallet.balance_usd(),
                    "market spend not covered by wallet"
                );
            }
            paid
        } else {
            true
        };

        let mut income_usd = 0.0;
        if self.clock.month0() != self.last_month {
            self.last_month = self.clock.month0();
            self.wallet.credit(self.monthly_income_usd);
            income_usd = self.monthly_income_usd;
        }

        let mut auto_buy_kwh = 0.0;
        if self.auto_buy_enabled
            && price <= self.auto_buy_threshold
            && self.buy(self.auto_buy_amount_kwh)
        {
            auto_buy_kwh = self.auto_buy_amount_kwh;
        }

        let result = TickResult {
            tick: self.ticks,
            timestamp: self.clock.formatted(),
            price_usd_per_kwh: price,
            demand_kwh: outcome.demand_kwh,
            storage_kwh: outcome.storage_kwh,
            market_kwh: outcome.market_kwh,
            energy_cost_usd,
            energy_paid,
            income_usd,
            auto_buy_kwh,
            battery_charge_kwh: self.battery.charge_kwh(),
            battery_health: self.battery.health(),
            battery_avg_cost: self.battery.average_cost(),
            balance_usd: self.wallet.balance_usd(),
        };
        self.ticks += 1;
        result
    }

    /// Executes `hours` ticks and returns the complete record vector.
    pub fn run(&mut self, hours: u64) -> Vec<TickResult> {
        let mut results = Vec::with_capacity(hours as usize);
        for _ in 0..hours {
            results.push(self.tick());
        }
        results
    }

    /// Buys `amount_kwh` at the current market price into the battery.
    ///
    /// Fails (and leaves wallet and battery untouched) when the wallet cannot
    /// cover the cost or the battery lacks headroom: the purchase is debited
    /// first and refunded if the capacity check rejects the charge, so money
    /// and stored energy stay conserved.
    pub fn buy(&mut self, amount_kwh: f64) -> bool {
        if amount_kwh <= 0.0 {
            return false;
        }
        let price = self.feed.current_price();
        let cost = amount_kwh * price;
        if !self.wallet.debit(cost) {
            return false;
        }
        if self.battery.charge(amount_kwh, price) {
            true
        } else {
            self.wallet.credit(cost);
            false
        }
    }

    /// Sells `amount_kwh` from the battery at the current market price.
    ///
    /// Fails when the battery holds less than `amount_kwh`. The wallet is
    /// credited at the market price, not the battery's cost basis.
    pub fn sell(&mut self, amount_kwh: f64) -> bool {
        if amount_kwh <= 0.0 {
            return false;
        }
        if self.battery.discharge(amount_kwh) {
            self.wallet.credit(amount_kwh * self.feed.current_price());
            true
        } else {
            false
        }
    }

    /// Buys `amount_kwh` of additional battery capacity at the fixed asset
    /// price. Fails when the wallet cannot cover the cost.
    pub fn expand_capacity(&mut self, amount_kwh: f64) -> bool {
        if amount_kwh <= 0.0 {
            return false;
        }
        let cost = amount_kwh * self.expansion_cost_per_kwh;
        if !self.wallet.debit(cost) {
            return false;
        }
        self.battery.expand_capacity(amount_kwh, self.expansion_cost_per_kwh);
        true
    }

    /// Enables or disables the automated purchase policy.
    pub fn set_auto_buy(&mut self, enabled: bool) {
        self.auto_buy_enabled = enabled;
    }

    /// Sets the price at or below which the automated policy buys.
    pub fn set_auto_buy_threshold(&mut self, threshold_usd_per_kwh: f64) {
        self.auto_buy_threshold = threshold_usd_per_kwh;
    }

    /// Sets the fixed purchase size of the automated policy.
    pub fn set_auto_buy_amount(&mut self, amount_kwh: f64) {
        self.auto_buy_amount_kwh = amount_kwh;
    }

    /// Returns a read-only snapshot of the whole simulation.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.clock.formatted(),
            price_usd_per_kwh: self.feed.current_price(),
            recent_prices: self.feed.recent_prices().to_vec(),
            battery: BatterySnapshot {
                charge_kwh: self.battery.charge_kwh(),
                capacity_kwh: self.battery.capacity_kwh(),
                effective_capacity_kwh: self.battery.effective_capacity_kwh(),
                health: self.battery.health(),
                average_cost: self.battery.average_cost(),
                total_investment_usd: self.battery.total_investment_usd(),
            },
            monthly_average_cost: self.house.monthly_average_cost(),
            recent_usage: self.house.recent_usage().to_vec(),
            balance_usd: self.wallet.balance_usd(),
        }
    }

    /// Returns a reference to the battery.
    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    /// Returns a reference to the house load.
    pub fn house(&self) -> &House {
        &self.house
    }

    /// Returns a reference to the wallet.
    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Returns a reference to the clock.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Returns a reference to the price feed.
    pub fn feed(&self) -> &PriceFeed {
        &self.feed
    }
}
