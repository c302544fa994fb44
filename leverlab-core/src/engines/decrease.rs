//! Decrease position engine — exit accounting and flat reset.

use crate::domain::{AccountState, OrderStatus, Position, Side};
use crate::formulas::realized_pnl;
use crate::outcome::ExitKind;
use crate::settings::ExchangeSettings;

/// Close the whole position at `exit_price`.
///
/// Stop-loss and liquidation exits pay the market fee on the closing leg,
/// take-profit exits the limit fee; the opening leg always pays the market
/// fee. Returns the replacement account and position values: equity
/// absorbs the net PnL, margin bookkeeping is zeroed, the position is flat
/// with the terminal status and exit price recorded.
pub fn close_position(
    account: &AccountState,
    position: &Position,
    exchange: &ExchangeSettings,
    exit_price: f64,
    kind: ExitKind,
    bar_idx: usize,
    timestamp: i64,
) -> (AccountState, Position) {
    let fee_close_pct = match kind {
        ExitKind::StopLoss | ExitKind::Liquidation => exchange.market_fee_pct,
        ExitKind::TakeProfit => exchange.limit_fee_pct,
    };
    let exit = realized_pnl(
        position.average_entry,
        exit_price,
        position.position_size_asset,
        exchange.market_fee_pct,
        fee_close_pct,
        Side::Long,
    );

    let equity = account.equity + exit.net;
    let next_account = AccountState {
        set_idx: account.set_idx,
        bar_idx,
        timestamp,
        equity,
        available_balance: equity,
        cash_used: 0.0,
        cash_borrowed: 0.0,
        realized_pnl: account.realized_pnl + exit.net,
        fees_paid: account.fees_paid + exit.fees,
        possible_loss: 0.0,
        total_trades: 0,
    };

    let status = match kind {
        ExitKind::StopLoss => OrderStatus::StopLossFilled,
        ExitKind::TakeProfit => OrderStatus::TakeProfitFilled,
        ExitKind::Liquidation => OrderStatus::LiquidationFilled,
    };
    let mut next_position = Position::flat();
    next_position.status = status;
    next_position.exit_price = exit_price;

    (next_account, next_position)
}
