//! Stop-loss engine — initial placement, hit detection, break-even and
//! trailing moves.
//!
//! Per open position the stop walks `Armed → ArmedAtBreakEven → Trailing`:
//! the break-even move is one-shot, and a trailing move supersedes it.
//! Disabled rules are no-op implementations behind the same trait,
//! resolved once per grid row — the hot loop never re-branches on
//! configuration.

use crate::domain::{window_min, Candle, CandleBodyPart, Position};
use crate::formulas::{break_even_price, round_to_step};
use crate::settings::{
    BreakEvenMode, DynamicOrderSettings, ExchangeSettings, StaticOrderSettings,
};

/// Candidate price for the one-shot break-even relocation.
pub trait BreakEvenRule: Send + Sync {
    /// Some(price) when this candle arms the move. The engine still
    /// requires the candidate to improve on the current stop.
    fn candidate(&self, candle: &Candle, position: &Position) -> Option<f64>;
}

/// Candidate price for a trailing-stop advance.
pub trait TrailRule: Send + Sync {
    fn candidate(&self, candle: &Candle, position: &Position) -> Option<f64>;
}

/// Passthrough for configurations without a break-even move.
struct NoBreakEven;

impl BreakEvenRule for NoBreakEven {
    fn candidate(&self, _candle: &Candle, _position: &Position) -> Option<f64> {
        None
    }
}

/// Move the stop to the average entry once price has run far enough.
struct BreakEvenToEntry {
    trigger_pct: f64,
    trigger_body: CandleBodyPart,
    price_tick: u32,
}

impl BreakEvenRule for BreakEvenToEntry {
    fn candidate(&self, candle: &Candle, position: &Position) -> Option<f64> {
        let armed = candle.body(self.trigger_body)
            >= position.average_entry * (1.0 + self.trigger_pct);
        armed.then(|| round_to_step(position.average_entry, self.price_tick))
    }
}

/// Move the stop to the zero-net-PnL price (entry plus both fee legs).
struct BreakEvenToZeroPnl {
    trigger_pct: f64,
    trigger_body: CandleBodyPart,
    fee_open_pct: f64,
    fee_close_pct: f64,
    price_tick: u32,
}

impl BreakEvenRule for BreakEvenToZeroPnl {
    fn candidate(&self, candle: &Candle, position: &Position) -> Option<f64> {
        let armed = candle.body(self.trigger_body)
            >= position.average_entry * (1.0 + self.trigger_pct);
        armed.then(|| {
            round_to_step(
                break_even_price(position.average_entry, self.fee_open_pct, self.fee_close_pct),
                self.price_tick,
            )
        })
    }
}

/// Passthrough for configurations without a trailing stop.
struct NoTrailing;

impl TrailRule for NoTrailing {
    fn candidate(&self, _candle: &Candle, _position: &Position) -> Option<f64> {
        None
    }
}

/// Trail the stop a fixed fraction below the configured candle body once
/// price has run past the trigger.
struct TrailByPct {
    trigger_pct: f64,
    offset_pct: f64,
    body: CandleBodyPart,
    price_tick: u32,
}

impl TrailRule for TrailByPct {
    fn candidate(&self, candle: &Candle, position: &Position) -> Option<f64> {
        let body = candle.body(self.body);
        let armed = body >= position.average_entry * (1.0 + self.trigger_pct);
        armed.then(|| round_to_step(body * (1.0 - self.offset_pct), self.price_tick))
    }
}

/// Stop-loss engine for one settings-grid row.
pub struct StopLossEngine {
    lookback: usize,
    offset_pct: f64,
    body: CandleBodyPart,
    price_tick: u32,
    break_even: Box<dyn BreakEvenRule>,
    trail: Box<dyn TrailRule>,
}

impl StopLossEngine {
    /// Resolve the configured rules into concrete objects, once per row.
    pub fn from_settings(
        statics: &StaticOrderSettings,
        dos: &DynamicOrderSettings,
        exchange: &ExchangeSettings,
    ) -> Self {
        let break_even: Box<dyn BreakEvenRule> = match statics.break_even {
            BreakEvenMode::Off => Box::new(NoBreakEven),
            BreakEvenMode::ToEntry => Box::new(BreakEvenToEntry {
                trigger_pct: dos.be_trigger_pct,
                trigger_body: statics.be_trigger_body,
                price_tick: exchange.price_tick_step,
            }),
            BreakEvenMode::ToZeroPnl => Box::new(BreakEvenToZeroPnl {
                trigger_pct: dos.be_trigger_pct,
                trigger_body: statics.be_trigger_body,
                fee_open_pct: exchange.market_fee_pct,
                fee_close_pct: exchange.market_fee_pct,
                price_tick: exchange.price_tick_step,
            }),
        };
        let trail: Box<dyn TrailRule> = if statics.trailing {
            Box::new(TrailByPct {
                trigger_pct: dos.trail_trigger_pct,
                offset_pct: dos.trail_offset_pct,
                body: statics.trail_body,
                price_tick: exchange.price_tick_step,
            })
        } else {
            Box::new(NoTrailing)
        };

        Self {
            lookback: dos.sl_lookback.max(1),
            offset_pct: dos.sl_offset_pct,
            body: statics.sl_body,
            price_tick: exchange.price_tick_step,
            break_even,
            trail,
        }
    }

    /// Initial stop: lookback extreme of the configured body, offset down,
    /// rounded to the price tick. The window ends at the signal bar and
    /// saturates at bar 0.
    pub fn initial_stop(&self, candles: &[Candle], signal_bar: usize) -> Option<f64> {
        let start = signal_bar.saturating_sub(self.lookback - 1);
        let extreme = window_min(candles, self.body, start, signal_bar)?;
        let sl = round_to_step(extreme * (1.0 - self.offset_pct), self.price_tick);
        (sl.is_finite() && sl > 0.0).then_some(sl)
    }

    /// A long stop fires when the candle's low touches it.
    pub fn check_hit(&self, candle: &Candle, sl_price: f64) -> bool {
        candle.low <= sl_price
    }

    /// One-shot break-even relocation. Only while the position still holds
    /// its entry permission, and only if the candidate improves the stop.
    pub fn try_break_even(&self, candle: &Candle, position: &Position) -> Option<f64> {
        if !position.can_move_sl_to_be {
            return None;
        }
        self.break_even
            .candidate(candle, position)
            .filter(|&candidate| candidate > position.sl_price)
    }

    /// Trailing advance: strictly monotonic, never adverse. Re-running the
    /// same candle against the same state is a no-op.
    pub fn try_trail(&self, candle: &Candle, position: &Position) -> Option<f64> {
        self.trail
            .candidate(candle, position)
            .filter(|&candidate| candidate > position.sl_price)
    }
}
