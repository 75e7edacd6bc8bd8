/// The household's cash ledger.
///
/// A single scalar balance with a guarded debit: every spend in the system
/// (market energy, manual and automated buys, capacity expansion) routes
/// through [`Wallet::debit`], and there is no overdraft.
#[derive(Debug, Clone)]
pub struct Wallet {
    balance_usd: f64,
}

impl Wallet {
    /// Creates a wallet holding `initial_balance_usd`.
    ///
    /// # Panics
    ///
    /// Panics if the initial balance is negative.
    pub fn new(initial_balance_usd: f64) -> Self {
        assert!(initial_balance_usd >= 0.0);
        Self {
            balance_usd: initial_balance_usd,
        }
    }

    /// Adds `amount_usd` to the balance, unconditionally.
    pub fn credit(&mut self, amount_usd: f64) {
        self.balance_usd += amount_usd;
    }

    /// Removes `amount_usd` from the balance.
    ///
    /// Fails without mutation when the balance is insufficient.
    pub fn debit(&mut self, amount_usd: f64) -> bool {
        if amount_usd > self.balance_usd {
            return false;
        }
        self.balance_usd -= amount_usd;
        true
    }

    /// Returns the current balance in USD.
    pub fn balance_usd(&self) -> f64 {
        self.balance_usd
    }
}
