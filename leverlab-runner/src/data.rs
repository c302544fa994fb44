//! Candle sources — the exchange collaborator seam plus offline
//! implementations.
//!
//! Real connectivity lives outside this workspace; the sweep only needs
//! "give me N ordered candles". The in-memory source serves pre-fetched
//! data and the synthetic generator produces reproducible walks for
//! tests, benches, and dry runs.

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use leverlab_core::domain::Candle;

/// Exchange data consumed by the driver.
pub trait CandleSource {
    /// The most recent `count` candles for `symbol`, oldest first.
    fn candles(&self, symbol: &str, timeframe: &str, count: usize) -> Result<Vec<Candle>>;

    /// Current equity denominated in `asset`.
    fn equity_of_asset(&self, asset: &str) -> Result<f64>;
}

/// Pre-fetched candles held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryCandles {
    symbol: String,
    candles: Vec<Candle>,
    equity: f64,
}

impl InMemoryCandles {
    pub fn new(symbol: impl Into<String>, candles: Vec<Candle>, equity: f64) -> Self {
        Self {
            symbol: symbol.into(),
            candles,
            equity,
        }
    }
}

impl CandleSource for InMemoryCandles {
    fn candles(&self, symbol: &str, _timeframe: &str, count: usize) -> Result<Vec<Candle>> {
        if symbol != self.symbol {
            bail!("unknown symbol '{symbol}' (holding '{}')", self.symbol);
        }
        let start = self.candles.len().saturating_sub(count);
        Ok(self.candles[start..].to_vec())
    }

    fn equity_of_asset(&self, _asset: &str) -> Result<f64> {
        Ok(self.equity)
    }
}

/// Seeded random-walk candles, one minute apart, oldest first.
///
/// Same seed, same series — property and integration tests rely on that.
/// `volatility` is the per-bar return scale (`0.01` ≈ 1% bars).
pub fn synthetic_candles(seed: u64, n: usize, start_price: f64, volatility: f64) -> Vec<Candle> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut close = start_price;
    let mut candles = Vec::with_capacity(n);

    for i in 0..n {
        let open = close;
        // Slight upward drift keeps long-side tests interesting
        let ret = (rng.gen::<f64>() - 0.48) * volatility;
        close = (open * (1.0 + ret)).max(start_price * 0.01);
        let wick_up = rng.gen::<f64>() * volatility * 0.5;
        let wick_down = rng.gen::<f64>() * volatility * 0.5;
        let body_high = open.max(close);
        let body_low = open.min(close);
        candles.push(Candle {
            timestamp: 1_700_000_000_000 + i as i64 * 60_000,
            open,
            high: body_high * (1.0 + wick_up),
            low: body_low * (1.0 - wick_down),
            close,
        });
    }
    candles
}
