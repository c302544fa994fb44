//! Take-profit pricing, break-even pricing, and exit PnL accounting.

use crate::domain::Side;

/// Breakdown of a position close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitPnl {
    /// Price PnL before fees.
    pub gross: f64,
    /// Open fee on the entry notional plus close fee on the exit notional.
    pub fees: f64,
    /// `gross - fees`.
    pub net: f64,
}

/// Exit price such that the net profit after fees equals
/// `risk_amount * risk_reward`.
///
/// Long side: with total asset size `T = position_size_usd / average_entry`
/// and profit target `G`, solves `T * tp * (1 - fee_close) -
/// position_size_usd * (1 + fee_open) = G` for `tp`.
pub fn take_profit_price(
    risk_amount: f64,
    risk_reward: f64,
    average_entry: f64,
    position_size_usd: f64,
    fee_open_pct: f64,
    fee_close_pct: f64,
) -> f64 {
    let target = risk_amount * risk_reward;
    let size_asset = position_size_usd / average_entry;
    (target + position_size_usd * (1.0 + fee_open_pct)) / (size_asset * (1.0 - fee_close_pct))
}

/// Exit price at which net PnL after fees is exactly zero (long side).
pub fn break_even_price(average_entry: f64, fee_open_pct: f64, fee_close_pct: f64) -> f64 {
    average_entry * (1.0 + fee_open_pct) / (1.0 - fee_close_pct)
}

/// PnL of closing `size_asset` at `exit_price`.
///
/// `fee_open_pct` is the rate paid on the entry notional, `fee_close_pct`
/// the rate paid on the exit notional (market for stops/liquidations,
/// limit for take-profits). Short gross is the sign flip of long.
pub fn realized_pnl(
    average_entry: f64,
    exit_price: f64,
    size_asset: f64,
    fee_open_pct: f64,
    fee_close_pct: f64,
    side: Side,
) -> ExitPnl {
    let gross = match side {
        Side::Long => size_asset * (exit_price - average_entry),
        Side::Short => size_asset * (average_entry - exit_price),
    };
    let fees = size_asset * average_entry * fee_open_pct + size_asset * exit_price * fee_close_pct;
    ExitPnl {
        gross,
        fees,
        net: gross - fees,
    }
}
