//! Take-profit engine — price sources behind one hit-check contract.
//!
//! Every variant exits the same way (candle high touches the target, fill
//! at the target, limit fee); they differ only in where the target price
//! comes from. The variant is resolved into a price-source object once per
//! grid row.

use crate::domain::{Candle, Position};
use crate::formulas::{round_to_step, take_profit_price};
use crate::settings::{ExchangeSettings, TakeProfitVariant};

/// Inputs available when a target is (re)priced at entry time.
#[derive(Debug, Clone, Copy)]
pub struct TpContext {
    pub possible_loss: f64,
    pub risk_reward: f64,
    pub average_entry: f64,
    pub position_size_usd: f64,
}

/// Where the take-profit price comes from.
pub trait TpPriceSource: Send + Sync {
    /// Target at entry/add time. None when the price only arrives per bar.
    fn on_entry(&self, ctx: &TpContext) -> Option<f64>;

    /// Per-bar refresh from the strategy-provided price. Default: keep the
    /// current target.
    fn on_bar(&self, provided: Option<f64>, current_tp: f64) -> Option<f64> {
        let _ = (provided, current_tp);
        None
    }
}

/// Solve for the price whose net profit equals `possible_loss * risk_reward`.
struct RiskRewardSource {
    fee_open_pct: f64,
    fee_close_pct: f64,
}

impl TpPriceSource for RiskRewardSource {
    fn on_entry(&self, ctx: &TpContext) -> Option<f64> {
        Some(take_profit_price(
            ctx.possible_loss,
            ctx.risk_reward,
            ctx.average_entry,
            ctx.position_size_usd,
            self.fee_open_pct,
            self.fee_close_pct,
        ))
    }
}

/// Fixed percentage above the average entry.
struct FixedPctSource {
    tp_pct: f64,
}

impl TpPriceSource for FixedPctSource {
    fn on_entry(&self, ctx: &TpContext) -> Option<f64> {
        Some(ctx.average_entry * (1.0 + self.tp_pct))
    }
}

/// Target comes from the strategy, bar by bar.
struct ProvidedSource;

impl TpPriceSource for ProvidedSource {
    fn on_entry(&self, _ctx: &TpContext) -> Option<f64> {
        None
    }

    fn on_bar(&self, provided: Option<f64>, _current_tp: f64) -> Option<f64> {
        provided
    }
}

/// Strategy-provided target scaled up by a fixed percentage.
struct ProvidedFixedPctSource {
    tp_pct: f64,
}

impl TpPriceSource for ProvidedFixedPctSource {
    fn on_entry(&self, _ctx: &TpContext) -> Option<f64> {
        None
    }

    fn on_bar(&self, provided: Option<f64>, _current_tp: f64) -> Option<f64> {
        provided.map(|price| price * (1.0 + self.tp_pct))
    }
}

/// Risk:reward target as a floor; a provided price only ever raises it.
struct ProvidedRiskRewardSource {
    fee_open_pct: f64,
    fee_close_pct: f64,
}

impl TpPriceSource for ProvidedRiskRewardSource {
    fn on_entry(&self, ctx: &TpContext) -> Option<f64> {
        Some(take_profit_price(
            ctx.possible_loss,
            ctx.risk_reward,
            ctx.average_entry,
            ctx.position_size_usd,
            self.fee_open_pct,
            self.fee_close_pct,
        ))
    }

    fn on_bar(&self, provided: Option<f64>, current_tp: f64) -> Option<f64> {
        provided.filter(|&price| price > current_tp)
    }
}

/// Take-profit engine for one settings-grid row.
pub struct TakeProfitEngine {
    source: Box<dyn TpPriceSource>,
    price_tick: u32,
}

impl TakeProfitEngine {
    pub fn from_variant(variant: TakeProfitVariant, exchange: &ExchangeSettings) -> Self {
        let source: Box<dyn TpPriceSource> = match variant {
            TakeProfitVariant::RiskReward => Box::new(RiskRewardSource {
                fee_open_pct: exchange.market_fee_pct,
                fee_close_pct: exchange.limit_fee_pct,
            }),
            TakeProfitVariant::FixedPct(tp_pct) => Box::new(FixedPctSource { tp_pct }),
            TakeProfitVariant::Provided => Box::new(ProvidedSource),
            TakeProfitVariant::ProvidedFixedPct(tp_pct) => {
                Box::new(ProvidedFixedPctSource { tp_pct })
            }
            TakeProfitVariant::ProvidedRiskReward => Box::new(ProvidedRiskRewardSource {
                fee_open_pct: exchange.market_fee_pct,
                fee_close_pct: exchange.limit_fee_pct,
            }),
        };
        Self {
            source,
            price_tick: exchange.price_tick_step,
        }
    }

    /// Target at entry/add time. `(0.0, 0.0)` when the price only arrives
    /// per bar; a zero target never registers a hit.
    pub fn on_entry(&self, ctx: &TpContext) -> (f64, f64) {
        match self.source.on_entry(ctx) {
            Some(price) => {
                let tp_price = round_to_step(price, self.price_tick);
                let tp_pct = (tp_price - ctx.average_entry) / ctx.average_entry;
                (tp_price, tp_pct)
            }
            None => (0.0, 0.0),
        }
    }

    /// Per-bar target refresh. Some only when the target changed.
    pub fn on_bar(&self, provided: Option<f64>, position: &Position) -> Option<(f64, f64)> {
        let price = self.source.on_bar(provided, position.tp_price)?;
        let tp_price = round_to_step(price, self.price_tick);
        if tp_price == position.tp_price {
            return None;
        }
        let tp_pct = (tp_price - position.average_entry) / position.average_entry;
        Some((tp_price, tp_pct))
    }

    /// Shared hit check: the candle's high touches the target.
    pub fn check_hit(&self, candle: &Candle, tp_price: f64) -> bool {
        tp_price > 0.0 && candle.high >= tp_price
    }
}
