//! Static order settings — side and strategy-variant selectors.
//!
//! These pick *which* formula each engine uses. They are fixed for an
//! entire run; the numeric knobs live in `DynamicOrderSettings` and vary
//! per grid row. Variants are resolved into concrete engine objects once
//! per row, never re-branched per bar.

use serde::{Deserialize, Serialize};

use crate::domain::{CandleBodyPart, Side};

/// How leverage is chosen for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LeverageMode {
    /// Fixed leverage, clamped to the exchange bounds.
    Static(f64),
    /// Solve for the leverage whose liquidation price sits just beyond the
    /// stop-loss.
    Dynamic,
}

/// Where the stop goes on a break-even move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakEvenMode {
    /// Break-even moves disabled.
    Off,
    /// Move the stop to the average entry price.
    ToEntry,
    /// Move the stop to the price at which net PnL after fees is zero.
    ToZeroPnl,
}

/// Where the take-profit price comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TakeProfitVariant {
    /// Solve for the price whose net profit equals `possible_loss * risk_reward`.
    RiskReward,
    /// Fixed percentage above the average entry.
    FixedPct(f64),
    /// Per-bar price provided by the strategy.
    Provided,
    /// Strategy-provided price scaled up by a fixed percentage.
    ProvidedFixedPct(f64),
    /// Risk:reward price as a floor, raised by the provided price.
    ProvidedRiskReward,
}

/// Run-wide order management configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticOrderSettings {
    pub side: Side,
    pub leverage_mode: LeverageMode,
    /// Candle body the initial stop-loss extreme is taken from.
    pub sl_body: CandleBodyPart,
    pub break_even: BreakEvenMode,
    /// Candle body checked against the break-even trigger.
    pub be_trigger_body: CandleBodyPart,
    /// Trailing stop enabled.
    pub trailing: bool,
    /// Candle body the trailing candidate is derived from.
    pub trail_body: CandleBodyPart,
    pub take_profit: TakeProfitVariant,
}

impl StaticOrderSettings {
    /// Long-side defaults: dynamic leverage, SL under the lookback low,
    /// break-even to entry, trailing from candle lows, risk:reward TP.
    pub fn long_defaults() -> Self {
        Self {
            side: Side::Long,
            leverage_mode: LeverageMode::Dynamic,
            sl_body: CandleBodyPart::Low,
            break_even: BreakEvenMode::ToEntry,
            be_trigger_body: CandleBodyPart::High,
            trailing: true,
            trail_body: CandleBodyPart::Low,
            take_profit: TakeProfitVariant::RiskReward,
        }
    }
}
