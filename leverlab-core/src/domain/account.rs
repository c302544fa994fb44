//! Account state — balances, committed risk, and cumulative accounting.

use serde::{Deserialize, Serialize};

/// Account snapshot for one settings-grid row.
///
/// Treated as an immutable value: every lifecycle transition builds a new
/// `AccountState` and replaces the old one wholesale. Never shared across
/// grid rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountState {
    /// Settings-grid row this account belongs to.
    pub set_idx: usize,
    /// Bar of the most recent transition.
    pub bar_idx: usize,
    /// Timestamp (epoch ms) of the most recent transition.
    pub timestamp: i64,
    pub equity: f64,
    pub available_balance: f64,
    pub cash_used: f64,
    pub cash_borrowed: f64,
    /// Cumulative realized PnL across all closed positions in this row.
    pub realized_pnl: f64,
    /// Cumulative fees paid across all entries and exits in this row.
    pub fees_paid: f64,
    /// Currency amount lost if every stacked entry's stop-loss is hit.
    pub possible_loss: f64,
    /// Entries stacked into the current position (resets when it closes).
    pub total_trades: usize,
}

impl AccountState {
    pub fn new(set_idx: usize, starting_equity: f64) -> Self {
        Self {
            set_idx,
            bar_idx: 0,
            timestamp: 0,
            equity: starting_equity,
            available_balance: starting_equity,
            cash_used: 0.0,
            cash_borrowed: 0.0,
            realized_pnl: 0.0,
            fees_paid: 0.0,
            possible_loss: 0.0,
            total_trades: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_holds_only_equity() {
        let account = AccountState::new(3, 1_000.0);
        assert_eq!(account.set_idx, 3);
        assert_eq!(account.equity, 1_000.0);
        assert_eq!(account.available_balance, 1_000.0);
        assert_eq!(account.cash_used, 0.0);
        assert_eq!(account.cash_borrowed, 0.0);
        assert_eq!(account.possible_loss, 0.0);
        assert_eq!(account.total_trades, 0);
    }
}
