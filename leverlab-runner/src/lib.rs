//! LeverLab Runner — backtest orchestration over settings grids.
//!
//! Drives `leverlab-core` across the (indicator-setting ×
//! dynamic-order-setting) grid:
//! - `sweep` — the grid driver (rayon-parallel, sequential fallback)
//! - `metrics` — gains, win rate, and the two smoothness scores
//! - `summary` — per-row result schema and filters
//! - `fingerprint` — deterministic combination identity
//! - `data` — candle-source seam, in-memory source, synthetic generator
//! - `export` — CSV and schema-versioned JSON

pub mod data;
pub mod export;
pub mod fingerprint;
pub mod metrics;
pub mod summary;
pub mod sweep;

pub use data::{synthetic_candles, CandleSource, InMemoryCandles};
pub use fingerprint::combination_fingerprint;
pub use summary::{SummaryFilter, SummaryRow};
pub use sweep::{BacktestInputs, CombinationRun, GridSweep, SweepError, SweepResults};
