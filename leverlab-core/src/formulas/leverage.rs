//! Leverage, liquidation, and margin formulas.

use crate::domain::Side;

/// Buffer between the stop-loss and the solved liquidation price, so the
/// stop always fires first under non-gapping price paths.
pub const SL_BUFFER_PCT: f64 = 0.001;

/// Price at which a position's margin is fully consumed.
///
/// Long: `avg * (lev - 1) / lev`. Short: `avg * (lev + 1) / lev`.
pub fn bankruptcy_price(average_entry: f64, leverage: f64, side: Side) -> f64 {
    match side {
        Side::Long => average_entry * (leverage - 1.0) / leverage,
        Side::Short => average_entry * (leverage + 1.0) / leverage,
    }
}

/// Price at which the exchange force-closes the position.
///
/// Long: `avg * (1 - 1/lev + mmr)`. Short: `avg * (1 + 1/lev - mmr)`.
pub fn liquidation_price(average_entry: f64, leverage: f64, mmr_pct: f64, side: Side) -> f64 {
    match side {
        Side::Long => average_entry * (1.0 - 1.0 / leverage + mmr_pct),
        Side::Short => average_entry * (1.0 + 1.0 / leverage - mmr_pct),
    }
}

/// Leverage such that the liquidation price coincides with the stop-loss
/// buffered by [`SL_BUFFER_PCT`] in the loss direction.
///
/// Unclamped and unrounded: the leverage engine clamps to the exchange
/// bounds and floors to the leverage tick step. Returns `f64::INFINITY`
/// when the buffered stop is too close to the entry for any finite
/// leverage to satisfy it (the clamp then takes over).
pub fn dynamic_leverage(average_entry: f64, sl_price: f64, mmr_pct: f64, side: Side) -> f64 {
    let denominator = match side {
        Side::Long => {
            let buffered = sl_price * (1.0 - SL_BUFFER_PCT);
            1.0 + mmr_pct - buffered / average_entry
        }
        Side::Short => {
            let buffered = sl_price * (1.0 + SL_BUFFER_PCT);
            buffered / average_entry - 1.0 + mmr_pct
        }
    };
    if denominator <= 0.0 {
        f64::INFINITY
    } else {
        1.0 / denominator
    }
}

/// Initial margin plus the open fee plus the worst-case close fee at the
/// bankruptcy price.
pub fn margin_required(
    position_size_usd: f64,
    average_entry: f64,
    leverage: f64,
    fee_open_pct: f64,
    fee_close_pct: f64,
    bankruptcy_price: f64,
) -> f64 {
    let size_asset = position_size_usd / average_entry;
    position_size_usd / leverage
        + position_size_usd * fee_open_pct
        + size_asset * bankruptcy_price * fee_close_pct
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liquidation_price_long_reference() {
        // avg 100, 10x, mmr 0.5% -> 100 * (1 - 0.1 + 0.005) = 90.5
        let liq = liquidation_price(100.0, 10.0, 0.005, Side::Long);
        assert!((liq - 90.5).abs() < 1e-12);
    }

    #[test]
    fn liquidation_price_short_mirrors_long() {
        let liq = liquidation_price(100.0, 10.0, 0.005, Side::Short);
        assert!((liq - 109.5).abs() < 1e-12);
    }

    #[test]
    fn bankruptcy_beyond_liquidation() {
        // Long: bankruptcy sits below liquidation (mmr gap)
        let bankruptcy = bankruptcy_price(100.0, 10.0, Side::Long);
        let liq = liquidation_price(100.0, 10.0, 0.005, Side::Long);
        assert!((bankruptcy - 90.0).abs() < 1e-12);
        assert!(bankruptcy < liq);

        let bankruptcy = bankruptcy_price(100.0, 10.0, Side::Short);
        let liq = liquidation_price(100.0, 10.0, 0.005, Side::Short);
        assert!((bankruptcy - 110.0).abs() < 1e-12);
        assert!(bankruptcy > liq);
    }

    #[test]
    fn one_x_long_liquidates_near_zero() {
        let liq = liquidation_price(100.0, 1.0, 0.005, Side::Long);
        assert!((liq - 0.5).abs() < 1e-12);
    }

    #[test]
    fn dynamic_leverage_puts_liquidation_at_buffered_sl() {
        let avg = 100.0;
        let sl = 95.0;
        let mmr = 0.005;
        let lev = dynamic_leverage(avg, sl, mmr, Side::Long);
        assert!(lev.is_finite() && lev > 1.0);

        let liq = liquidation_price(avg, lev, mmr, Side::Long);
        let buffered = sl * (1.0 - SL_BUFFER_PCT);
        assert!((liq - buffered).abs() < 1e-9);
        assert!(liq < sl, "liquidation must sit beyond the stop");
    }

    #[test]
    fn dynamic_leverage_short_side() {
        let lev = dynamic_leverage(100.0, 105.0, 0.005, Side::Short);
        assert!(lev.is_finite() && lev > 1.0);
        let liq = liquidation_price(100.0, lev, 0.005, Side::Short);
        assert!(liq > 105.0, "short liquidation must sit above the stop");
        assert!((liq - 105.0 * (1.0 + SL_BUFFER_PCT)).abs() < 1e-9);
    }

    #[test]
    fn dynamic_leverage_sl_at_entry_is_huge_but_finite() {
        // Buffered stop still below entry * (1 + mmr): enormous leverage,
        // left for the exchange clamp.
        let lev = dynamic_leverage(100.0, 100.0, 0.005, Side::Long);
        assert!(lev.is_finite());
        assert!(lev > 100.0);
    }

    #[test]
    fn dynamic_leverage_sl_above_entry_is_unbounded() {
        // A long stop above entry has no liquidation-matching leverage.
        let lev = dynamic_leverage(100.0, 106.0, 0.005, Side::Long);
        assert!(lev.is_infinite());
    }

    #[test]
    fn margin_covers_notional_over_leverage_plus_fees() {
        let margin = margin_required(1_000.0, 100.0, 10.0, 0.0006, 0.0006, 90.0);
        // 100 initial + 0.6 open fee + (10 asset * 90) * 0.0006 close fee
        let expected = 100.0 + 0.6 + 0.54;
        assert!((margin - expected).abs() < 1e-9);
    }
}
