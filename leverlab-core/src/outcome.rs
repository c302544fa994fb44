//! Tagged per-bar outcomes.
//!
//! Rejections and exits are ordinary values returned from the per-bar
//! step, not errors: nothing here aborts a grid row or a batch. Fatal,
//! pre-loop configuration problems live in
//! [`GridError`](crate::settings::GridError) and
//! [`ConfigError`](crate::lifecycle::ConfigError) instead.

use serde::{Deserialize, Serialize};

/// Why an entry attempt was skipped. Local to one bar; state is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Committed risk would exceed `equity * max_equity_risk_pct`.
    RiskTooBig,
    /// The position already holds `max_trades` stacked entries.
    MaxTradesReached,
    EntrySizeTooSmall,
    EntrySizeTooBig,
    /// Required margin exceeds the available balance.
    CashUsedExceeded,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RiskTooBig => "risk_too_big",
            Self::MaxTradesReached => "max_trades_reached",
            Self::EntrySizeTooSmall => "entry_size_too_small",
            Self::EntrySizeTooBig => "entry_size_too_big",
            Self::CashUsedExceeded => "cash_used_exceeded",
        }
    }
}

/// Which exit closed the position this bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitKind {
    StopLoss,
    TakeProfit,
    Liquidation,
}

/// Which rule moved the stop this bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlMoveKind {
    BreakEven,
    Trailing,
}

/// Result of this bar's entry evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryDecision {
    Filled,
    Rejected(RejectReason),
}

/// Everything that happened in one bar, for callers to switch on.
///
/// At most one exit fires per bar (fixed priority); a break-even and a
/// trailing move can both apply, in which case `sl_move` reports the
/// trailing move (it supersedes break-even). The entry decision is
/// independent of the exit/move fields.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BarReport {
    pub exit: Option<ExitKind>,
    pub sl_move: Option<SlMoveKind>,
    pub entry: Option<EntryDecision>,
}

impl BarReport {
    pub fn is_quiet(&self) -> bool {
        self.exit.is_none() && self.sl_move.is_none() && self.entry.is_none()
    }
}
