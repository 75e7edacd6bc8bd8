/// A battery energy storage asset with economic bookkeeping.
///
/// `Battery` tracks the energy it holds together with the cumulative cost of
/// that energy (weighted-average cost basis, not FIFO), a state of health that
/// decays linearly with age, and the cumulative capital invested in capacity.
///
/// # Accounting Convention
/// - `cost_basis_usd` is the total cost of the energy currently stored.
/// - Discharging removes energy at the current average cost, so the average
///   cost of the remaining energy is unchanged by a discharge.
/// - Charging at a different price blends the average.
///
/// All fallible operations return `bool` and leave the battery untouched on
/// failure.
#[derive(Debug, Clone)]
pub struct Battery {
    /// Nameplate capacity in kilowatt-hours.
    capacity_kwh: f64,

    /// Energy currently stored in kilowatt-hours.
    charge_kwh: f64,

    /// Total cost of the currently stored energy in USD.
    cost_basis_usd: f64,

    /// State of health as a fraction (1.0 = new, 0.0 = end of life).
    health: f64,

    /// Hours the battery has existed, degraded once per simulated hour.
    age_hours: u64,

    /// Fixed lifespan in hours; health reaches zero at this age.
    lifespan_hours: u64,

    /// Cumulative capital spent on capacity in USD. Monotone; independent of
    /// the charge/discharge accounting.
    total_investment_usd: f64,
}

impl Battery {
    /// Creates a new battery.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Nameplate capacity in kWh (must be > 0)
    /// * `initial_charge_kwh` - Energy pre-loaded at construction (0..=capacity)
    /// * `initial_cost_per_kwh` - Assumed unit cost of the pre-loaded energy
    /// * `lifespan_hours` - Hours until health reaches zero (must be > 0)
    /// * `asset_cost_per_kwh` - Capital cost per kWh of capacity, used for the
    ///   initial investment figure and by capacity expansions
    ///
    /// # Panics
    ///
    /// Panics if capacity or lifespan is zero/negative, or the initial charge
    /// is out of range.
    pub fn new(
        capacity_kwh: f64,
        initial_charge_kwh: f64,
        initial_cost_per_kwh: f64,
        lifespan_hours: u64,
        asset_cost_per_kwh: f64,
    ) -> Self {
        assert!(capacity_kwh > 0.0);
        assert!((0.0..=capacity_kwh).contains(&initial_charge_kwh));
        assert!(initial_cost_per_kwh >= 0.0);
        assert!(lifespan_hours > 0);

        Self {
            capacity_kwh,
            charge_kwh: initial_charge_kwh,
            cost_basis_usd: initial_charge_kwh * initial_cost_per_kwh,
            health: 1.0,
            age_hours: 0,
            lifespan_hours,
            total_investment_usd: capacity_kwh * asset_cost_per_kwh,
        }
    }

    /// Stores `amount_kwh` of energy bought at `unit_price`.
    ///
    /// Fails without mutation when the result would exceed the health-derated
    /// capacity (`capacity_kwh * health`, not the nameplate value).
    ///
    /// # Panics
    ///
    /// Panics if `amount_kwh` is not strictly positive.
    pub fn charge(&mut self, amount_kwh: f64, unit_price: f64) -> bool {
        assert!(amount_kwh > 0.0);

        if self.charge_kwh + amount_kwh > self.effective_capacity_kwh() {
            return false;
        }

        self.charge_kwh += amount_kwh;
        self.cost_basis_usd += amount_kwh * unit_price;
        true
    }

    /// Removes `amount_kwh` of energy at the current average cost.
    ///
    /// Fails without mutation when more energy is requested than is stored.
    /// A residual charge at or below zero after floating-point correction
    /// snaps both charge and cost basis to exactly zero.
    ///
    /// # Panics
    ///
    /// Panics if `amount_kwh` is not strictly positive.
    pub fn discharge(&mut self, amount_kwh: f64) -> bool {
        assert!(amount_kwh > 0.0);

        if amount_kwh > self.charge_kwh {
            return false;
        }

        let avg_price = self.average_cost();
        self.charge_kwh -= amount_kwh;
        self.cost_basis_usd -= amount_kwh * avg_price;

        // Residual float drift must not leave a negative charge or a phantom
        // cost basis on an empty battery.
        if self.charge_kwh <= 0.0 {
            self.charge_kwh = 0.0;
            self.cost_basis_usd = 0.0;
        }

        true
    }

    /// Ages the battery by one simulated hour.
    ///
    /// Health decays linearly from 1.0 to 0.0 over the fixed lifespan,
    /// independent of charge/discharge activity (calendar aging only, no
    /// cycle wear).
    pub fn degrade(&mut self) {
        self.age_hours += 1;
        self.health = (1.0 - self.age_hours as f64 / self.lifespan_hours as f64).max(0.0);
    }

    /// Adds `amount_kwh` of nameplate capacity bought at `unit_price` per kWh.
    ///
    /// Always succeeds; funding checks belong to the caller.
    ///
    /// # Panics
    ///
    /// Panics if `amount_kwh` is not strictly positive.
    pub fn expand_capacity(&mut self, amount_kwh: f64, unit_price: f64) {
        assert!(amount_kwh > 0.0);
        self.capacity_kwh += amount_kwh;
        self.total_investment_usd += amount_kwh * unit_price;
    }

    /// Returns the blended unit cost of the stored energy, or 0.0 when empty.
    pub fn average_cost(&self) -> f64 {
        if self.charge_kwh == 0.0 {
            0.0
        } else {
            self.cost_basis_usd / self.charge_kwh
        }
    }

    /// Returns the capacity usable at the current state of health.
    pub fn effective_capacity_kwh(&self) -> f64 {
        self.capacity_kwh * self.health
    }

    /// Returns the nameplate capacity in kWh.
    pub fn capacity_kwh(&self) -> f64 {
        self.capacity_kwh
    }

    /// Returns the stored energy in kWh.
    pub fn charge_kwh(&self) -> f64 {
        self.charge_kwh
    }

    /// Returns the total cost of the stored energy in USD.
    pub fn cost_basis_usd(&self) -> f64 {
        self.cost_basis_usd
    }

    /// Returns the state of health as a fraction in [0.0, 1.0].
    pub fn health(&self) -> f64 {
        self.health
    }

    /// Returns the battery age in simulated hours.
    pub fn age_hours(&self) -> u64 {
        self.age_hours
    }

    /// Returns the cumulative capital invested in capacity, in USD.
    pub fn total_investment_usd(&self) -> f64 {
        self.total_investment_usd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Battery {
        // 150 kWh nameplate, 50 kWh pre-loaded at $0.10/kWh, 12-year lifespan.
        Battery::new(150.0, 50.0, 0.10, 12 * 365 * 24, 336.87)
    }

    #[test]
    fn test_new_battery() {
        let b = fresh();
        assert_eq!(b.capacity_kwh(), 150.0);
        assert_eq!(b.charge_kwh(), 50.0);
        assert!((b.cost_basis_usd() - 5.0).abs() < 1e-12);
        assert_eq!(b.health(), 1.0);
        assert!((b.total_investment_usd() - 150.0 * 336.87).abs() < 1e-9);
    }

    #[test]
    #[should_panic]
    fn test_invalid_capacity() {
        Battery::new(0.0, 0.0, 0.10, 1000, 336.87);
    }

    #[test]
    #[should_panic]
    fn test_initial_charge_above_capacity() {
        Battery::new(10.0, 11.0, 0.10, 1000, 336.87);
    }

    #[test]
    fn charge_blends_average_cost() {
        // Scenario from the economic model: 50 kWh at $0.10, then 30 kWh at
        // $0.20 -> 80 kWh with basis $11.0 and average $0.1375.
        let mut b = fresh();
        assert!(b.charge(30.0, 0.20));
        assert!((b.charge_kwh() - 80.0).abs() < 1e-12);
        assert!((b.cost_basis_usd() - 11.0).abs() < 1e-12);
        assert!((b.average_cost() - 0.1375).abs() < 1e-12);
    }

    #[test]
    fn full_discharge_snaps_to_exact_zero() {
        let mut b = fresh();
        assert!(b.charge(30.0, 0.20));
        assert!(b.discharge(80.0));
        assert_eq!(b.charge_kwh(), 0.0);
        assert_eq!(b.cost_basis_usd(), 0.0);
        assert_eq!(b.average_cost(), 0.0);
    }

    #[test]
    fn charge_rejected_beyond_effective_capacity() {
        let mut b = fresh();
        assert!(!b.charge(101.0, 0.10), "150 nameplate, 50 held: 101 must fail");
        assert_eq!(b.charge_kwh(), 50.0);
        assert!((b.cost_basis_usd() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn charge_headroom_shrinks_with_health() {
        let mut b = Battery::new(100.0, 0.0, 0.0, 100, 336.87);
        for _ in 0..50 {
            b.degrade();
        }
        assert!((b.health() - 0.5).abs() < 1e-12);
        assert!((b.effective_capacity_kwh() - 50.0).abs() < 1e-9);
        assert!(!b.charge(60.0, 0.10));
        assert!(b.charge(50.0, 0.10));
    }

    #[test]
    fn discharge_rejected_beyond_stock() {
        let mut b = fresh();
        assert!(!b.discharge(50.1));
        assert_eq!(b.charge_kwh(), 50.0);
    }

    #[test]
    fn discharge_preserves_average_cost() {
        let mut b = fresh();
        assert!(b.charge(30.0, 0.20));
        let avg_before = b.average_cost();
        assert!(b.discharge(20.0));
        assert!((b.average_cost() - avg_before).abs() < 1e-12);
    }

    #[test]
    fn discharge_then_recharge_at_same_price_round_trips() {
        let mut b = fresh();
        let charge_before = b.charge_kwh();
        let basis_before = b.cost_basis_usd();
        assert!(b.discharge(25.0));
        assert!(b.charge(25.0, 0.10));
        assert!((b.charge_kwh() - charge_before).abs() < 1e-9);
        assert!((b.cost_basis_usd() - basis_before).abs() < 1e-9);
    }

    #[test]
    fn health_decays_linearly_to_exact_zero() {
        let mut b = Battery::new(10.0, 0.0, 0.0, 4, 336.87);
        let mut last = b.health();
        for _ in 0..4 {
            b.degrade();
            assert!(b.health() <= last);
            last = b.health();
        }
        assert_eq!(b.health(), 0.0);
        assert_eq!(b.age_hours(), 4);

        // Past end-of-life the health floor holds.
        b.degrade();
        assert_eq!(b.health(), 0.0);
    }

    #[test]
    fn basis_and_charge_stay_nonnegative_and_coupled() {
        let mut b = Battery::new(20.0, 0.0, 0.0, 1000, 336.87);
        let ops: [(f64, f64); 6] = [
            (5.0, 0.08),
            (-3.0, 0.0),
            (4.0, 0.12),
            (-6.0, 0.0),
            (2.0, 0.05),
            (-2.0, 0.0),
        ];
        for (amount, price) in ops {
            if amount > 0.0 {
                assert!(b.charge(amount, price));
            } else {
                assert!(b.discharge(-amount));
            }
            assert!(b.charge_kwh() >= 0.0);
            assert!(b.cost_basis_usd() >= 0.0);
            assert_eq!(b.charge_kwh() == 0.0, b.cost_basis_usd() == 0.0);
        }
        assert_eq!(b.charge_kwh(), 0.0);
        assert_eq!(b.cost_basis_usd(), 0.0);
    }

    #[test]
    fn expand_capacity_tracks_investment() {
        let mut b = fresh();
        let invested = b.total_investment_usd();
        b.expand_capacity(50.0, 336.87);
        assert_eq!(b.capacity_kwh(), 200.0);
        assert!((b.total_investment_usd() - (invested + 50.0 * 336.87)).abs() < 1e-9);
        // Expansion never touches the energy accounting.
        assert_eq!(b.charge_kwh(), 50.0);
        assert!((b.cost_basis_usd() - 5.0).abs() < 1e-12);
    }
}
