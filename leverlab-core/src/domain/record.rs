//! Order records — the per-event output rows of a simulation.

use serde::{Deserialize, Serialize};

use super::account::AccountState;
use super::position::{OrderStatus, Position};

/// Flat snapshot of account + position at a state-changing event.
///
/// One record is appended for every entry fill, stop move, and exit. The
/// schema is fixed; consumers (exports, dashboards) index columns, never
/// re-derive state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub set_idx: usize,
    pub bar_idx: usize,
    pub timestamp: i64,
    pub status: OrderStatus,

    // Account columns
    pub equity: f64,
    pub available_balance: f64,
    pub cash_used: f64,
    pub cash_borrowed: f64,
    pub realized_pnl: f64,
    pub fees_paid: f64,
    pub possible_loss: f64,
    pub total_trades: usize,

    // Position columns
    pub average_entry: f64,
    pub entry_price: f64,
    pub entry_size_usd: f64,
    pub position_size_usd: f64,
    pub leverage: f64,
    pub liq_price: f64,
    pub sl_price: f64,
    pub tp_price: f64,
    pub exit_price: f64,
}

impl OrderRecord {
    /// Snapshot the current account and position.
    pub fn snapshot(account: &AccountState, position: &Position) -> Self {
        Self {
            set_idx: account.set_idx,
            bar_idx: account.bar_idx,
            timestamp: account.timestamp,
            status: position.status,
            equity: account.equity,
            available_balance: account.available_balance,
            cash_used: account.cash_used,
            cash_borrowed: account.cash_borrowed,
            realized_pnl: account.realized_pnl,
            fees_paid: account.fees_paid,
            possible_loss: account.possible_loss,
            total_trades: account.total_trades,
            average_entry: position.average_entry,
            entry_price: position.entry_price,
            entry_size_usd: position.entry_size_usd,
            position_size_usd: position.position_size_usd,
            leverage: position.leverage,
            liq_price: position.liq_price,
            sl_price: position.sl_price,
            tp_price: position.tp_price,
            exit_price: position.exit_price,
        }
    }
}
