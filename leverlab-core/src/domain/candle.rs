//! Candle — the fundamental market data unit.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// OHLC candle for a single symbol on a single timeframe.
///
/// `timestamp` is epoch milliseconds (exchange convention). Candles are
/// fully materialized before the simulation loop starts; nothing in the
/// engine fetches data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Basic OHLC sanity check: high >= low, high/low bracket open and close,
    /// all prices positive.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.low > 0.0
    }

    /// The configured body price of this candle.
    pub fn body(&self, part: CandleBodyPart) -> f64 {
        match part {
            CandleBodyPart::Open => self.open,
            CandleBodyPart::High => self.high,
            CandleBodyPart::Low => self.low,
            CandleBodyPart::Close => self.close,
        }
    }

    /// Timestamp as a UTC datetime. None if the epoch value is out of range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

/// Which price of a candle a rule reads.
///
/// Stop-loss placement and break-even/trailing triggers are configured with
/// a body part so a strategy can anchor on wicks (High/Low) or bodies
/// (Open/Close).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandleBodyPart {
    Open,
    High,
    Low,
    Close,
}

/// Minimum of the configured body part over `candles[start..=end]`.
///
/// `start` saturates at 0. Returns None for an empty slice or if any value
/// in the window is NaN.
pub fn window_min(candles: &[Candle], part: CandleBodyPart, start: usize, end: usize) -> Option<f64> {
    if start > end || end >= candles.len() {
        return None;
    }
    let mut min = f64::INFINITY;
    for candle in &candles[start..=end] {
        let v = candle.body(part);
        if v.is_nan() {
            return None;
        }
        if v < min {
            min = v;
        }
    }
    Some(min)
}

/// Maximum of the configured body part over `candles[start..=end]`.
pub fn window_max(candles: &[Candle], part: CandleBodyPart, start: usize, end: usize) -> Option<f64> {
    if start > end || end >= candles.len() {
        return None;
    }
    let mut max = f64::NEG_INFINITY;
    for candle in &candles[start..=end] {
        let v = candle.body(part);
        if v.is_nan() {
            return None;
        }
        if v > max {
            max = v;
        }
    }
    Some(max)
}
