use serde::{Deserialize, Serialize};

/// Per-investor cash ledger: spendable funds vs. funds committed to
/// approved-but-unexecuted investments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalletAccount {
    available: f64,
    locked: f64,
    total_deposited: f64,
    total_withdrawn: f64,
}

impl WalletAccount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn available(&self) -> f64 {
        self.available
    }

    pub fn locked(&self) -> f64 {
        self.locked
    }

    pub fn total_deposited(&self) -> f64 {
        self.total_deposited
    }

    pub fn total_withdrawn(&self) -> f64 {
        self.total_withdrawn
    }

    /// Adds spendable funds and tracks the cumulative deposit total.
    pub fn deposit(&mut self, amount: f64) {
        self.available += amount;
        self.total_deposited += amount;
    }

    /// Credits spendable funds without touching the deposit total. Profit
    /// payouts are earnings, not deposits.
    pub fn credit_available(&mut self, amount: f64) {
        self.available += amount;
    }

    /// Moves funds from available to locked, capped by what is available.
    /// Returns the amount actually locked.
    pub fn lock(&mut self, amount: f64) -> f64 {
        let moved = amount.min(self.available).max(0.0);
        self.available -= moved;
        self.locked += moved;
        moved
    }

    /// Consumes committed funds. The locked balance is floored at zero: a
    /// shortfall indicates upstream inconsistency, not a reason to carry a
    /// negative balance. Returns the amount actually debited.
    pub fn debit_locked(&mut self, amount: f64) -> f64 {
        let debited = amount.min(self.locked).max(0.0);
        self.locked -= debited;
        debited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_locked_clamps_at_zero() {
        let mut wallet = WalletAccount::new();
        wallet.deposit(1000.0);
        wallet.lock(400.0);

        let debited = wallet.debit_locked(900.0);
        assert_eq!(debited, 400.0);
        assert_eq!(wallet.locked(), 0.0);
        assert_eq!(wallet.available(), 600.0);
    }

    #[test]
    fn test_lock_capped_by_available() {
        let mut wallet = WalletAccount::new();
        wallet.deposit(250.0);

        let locked = wallet.lock(400.0);
        assert_eq!(locked, 250.0);
        assert_eq!(wallet.available(), 0.0);
        assert_eq!(wallet.locked(), 250.0);
    }

    #[test]
    fn test_payout_credit_leaves_deposit_total_alone() {
        let mut wallet = WalletAccount::new();
        wallet.deposit(100.0);
        wallet.credit_available(30.0);

        assert_eq!(wallet.available(), 130.0);
        assert_eq!(wallet.total_deposited(), 100.0);
    }
}
