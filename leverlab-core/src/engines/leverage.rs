//! Leverage engine — static or dynamic leverage, margin, and liquidation.

use crate::domain::{AccountState, Side};
use crate::formulas::{
    bankruptcy_price, dynamic_leverage, floor_to_step, liquidation_price, margin_required,
    round_to_step,
};
use crate::outcome::RejectReason;
use crate::settings::{ExchangeSettings, LeverageMode};

use super::sizing::SizingOutcome;

/// Pure result of a leverage assignment; applied by the orchestrator only
/// after sizing also succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct LeverageOutcome {
    pub leverage: f64,
    pub liq_price: f64,
    pub available_balance: f64,
    pub cash_used: f64,
    pub cash_borrowed: f64,
}

/// Assign leverage for the (possibly blended) position described by
/// `sizing` and re-book its margin.
///
/// Static mode clamps the configured leverage into the exchange bounds;
/// dynamic mode solves for the leverage whose liquidation price sits just
/// beyond the stop, clamps, and floors to the leverage tick step (flooring
/// is the conservative direction: less leverage pushes liquidation further
/// from the stop). Margin for the whole position is recomputed; the
/// previously used cash is released first, so adds re-book cleanly.
pub fn assign_leverage(
    mode: LeverageMode,
    account: &AccountState,
    sizing: &SizingOutcome,
    exchange: &ExchangeSettings,
    sl_price: f64,
) -> Result<LeverageOutcome, RejectReason> {
    let raw = match mode {
        LeverageMode::Static(leverage) => leverage,
        LeverageMode::Dynamic => {
            dynamic_leverage(sizing.average_entry, sl_price, exchange.mmr_pct, Side::Long)
        }
    };
    let leverage = floor_to_step(
        raw.clamp(exchange.min_leverage, exchange.max_leverage),
        exchange.leverage_tick_step,
    );
    if !leverage.is_finite() || leverage < exchange.min_leverage {
        return Err(RejectReason::CashUsedExceeded);
    }

    let bankruptcy = bankruptcy_price(sizing.average_entry, leverage, Side::Long);
    let margin = margin_required(
        sizing.position_size_usd,
        sizing.average_entry,
        leverage,
        exchange.market_fee_pct,
        exchange.market_fee_pct,
        bankruptcy,
    );
    // Release the margin already booked for the position, then charge the
    // recomputed total.
    let releasable = account.available_balance + account.cash_used;
    if !margin.is_finite() || margin > releasable {
        return Err(RejectReason::CashUsedExceeded);
    }

    let liq_price = round_to_step(
        liquidation_price(sizing.average_entry, leverage, exchange.mmr_pct, Side::Long),
        exchange.price_tick_step,
    );

    Ok(LeverageOutcome {
        leverage,
        liq_price,
        available_balance: releasable - margin,
        cash_used: margin,
        cash_borrowed: sizing.position_size_usd - margin,
    })
}
