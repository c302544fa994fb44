//! Summary rows — one per settings-grid row — and result filters.

use serde::{Deserialize, Serialize};

use leverlab_core::domain::AccountState;

use crate::metrics;

/// Aggregate result of one (indicator-setting × dynamic-order-setting)
/// combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Flat grid-row index: `ind_set_idx * dos_count + dos_idx`.
    pub set_idx: usize,
    pub ind_set_idx: usize,
    pub dos_idx: usize,
    /// Blake3 fingerprint of the full settings of this combination.
    pub fingerprint: String,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub gains_pct: f64,
    pub qf_score: f64,
    pub upside_score: f64,
    pub total_pnl: f64,
    pub fees_paid: f64,
    pub ending_equity: f64,
}

impl SummaryRow {
    /// Build a row from the per-trade PnL array and the final account.
    pub fn from_run(
        set_idx: usize,
        ind_set_idx: usize,
        dos_idx: usize,
        fingerprint: String,
        trade_pnls: &[f64],
        starting_equity: f64,
        account: &AccountState,
    ) -> Self {
        let wins = trade_pnls.iter().filter(|&&pnl| pnl > 0.0).count();
        Self {
            set_idx,
            ind_set_idx,
            dos_idx,
            fingerprint,
            trades: trade_pnls.len(),
            wins,
            losses: trade_pnls.len() - wins,
            win_rate: metrics::win_rate(trade_pnls),
            gains_pct: metrics::gains_pct(starting_equity, account.equity),
            qf_score: metrics::qf_score(trade_pnls),
            upside_score: metrics::upside_score(trade_pnls),
            total_pnl: metrics::total_pnl(trade_pnls),
            fees_paid: account.fees_paid,
            ending_equity: account.equity,
        }
    }
}

/// Keep-or-drop thresholds applied to each summary row.
///
/// The default filter keeps everything, including zero-trade rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryFilter {
    pub min_gains_pct: f64,
    pub min_trades: usize,
    pub min_qf_score: f64,
}

impl Default for SummaryFilter {
    fn default() -> Self {
        Self {
            min_gains_pct: f64::NEG_INFINITY,
            min_trades: 0,
            min_qf_score: f64::NEG_INFINITY,
        }
    }
}

impl SummaryFilter {
    pub fn passes(&self, row: &SummaryRow) -> bool {
        row.gains_pct >= self.min_gains_pct
            && row.trades >= self.min_trades
            && row.qf_score >= self.min_qf_score
    }
}
