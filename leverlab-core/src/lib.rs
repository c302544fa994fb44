//! LeverLab Core — leveraged position lifecycle simulation.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (candles, account state, positions, order records)
//! - Run settings (static selectors, per-row dynamic knobs, exchange
//!   constants) and cartesian grid expansion
//! - The pure numeric formula library (sizing, leverage, liquidation,
//!   take-profit, PnL)
//! - The five engines (sizing, leverage, stop-loss, take-profit, decrease)
//! - The per-bar lifecycle orchestrator and its tagged outcomes
//! - The strategy collaborator seam
//!
//! No I/O and no parallelism live here; the grid driver sits in
//! `leverlab-runner`.

pub mod domain;
pub mod engines;
pub mod formulas;
pub mod lifecycle;
pub mod outcome;
pub mod settings;
pub mod strategy;

pub use lifecycle::{ConfigError, LifecycleEngine};
pub use outcome::{BarReport, EntryDecision, ExitKind, RejectReason, SlMoveKind};
