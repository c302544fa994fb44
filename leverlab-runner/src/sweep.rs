//! Settings-grid backtest driver.
//!
//! Outer loop over (indicator-setting × dynamic-order-setting) rows, each
//! with a fresh account/position, run over all bars. Rows are independent
//! and share only read-only candles and settings, so the grid runs under
//! rayon by default with a sequential fallback.

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use leverlab_core::domain::{Candle, OrderRecord};
use leverlab_core::settings::{
    DynamicOrderSettings, ExchangeSettings, GridError, StaticOrderSettings,
};
use leverlab_core::strategy::Strategy;
use leverlab_core::{ConfigError, LifecycleEngine};

use crate::fingerprint::combination_fingerprint;
use crate::summary::{SummaryFilter, SummaryRow};

/// Fatal sweep errors, all detected before or at row construction.
#[derive(Debug, Error, PartialEq)]
pub enum SweepError {
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("sweep grid is empty (no indicator settings or no dynamic settings)")]
    EmptyGrid,
    #[error("combination ({ind_set_idx}, {dos_idx}) is outside the grid")]
    RowOutOfRange { ind_set_idx: usize, dos_idx: usize },
}

/// Shared, read-only inputs for every grid row.
#[derive(Clone, Copy)]
pub struct BacktestInputs<'a> {
    pub candles: &'a [Candle],
    pub statics: &'a StaticOrderSettings,
    pub exchange: &'a ExchangeSettings,
    pub starting_equity: f64,
}

/// Full output of one combination: the per-event record stream plus its
/// summary row. Returned by the single-combination mode.
#[derive(Debug, Clone)]
pub struct CombinationRun {
    pub summary: SummaryRow,
    pub records: Vec<OrderRecord>,
}

/// Settings-grid sweep executor.
pub struct GridSweep {
    parallel: bool,
}

impl GridSweep {
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Enables or disables rayon execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run every combination and collect the summary rows that pass the
    /// filter.
    ///
    /// Grid ordering: the indicator setting varies slowest, so row
    /// `set_idx == ind_set_idx * dos_rows.len() + dos_idx`. Every
    /// combination yields a summary row (zero-trade rows included) before
    /// filtering; a row that fails the filter is dropped, never an error.
    pub fn sweep(
        &self,
        strategy: &dyn Strategy,
        inputs: &BacktestInputs<'_>,
        dos_rows: &[DynamicOrderSettings],
        filter: &SummaryFilter,
    ) -> Result<SweepResults, SweepError> {
        let ind_count = strategy.num_settings();
        if ind_count == 0 || dos_rows.is_empty() {
            return Err(SweepError::EmptyGrid);
        }
        let total = ind_count * dos_rows.len();
        info!(total, bars = inputs.candles.len(), "starting grid sweep");

        let run_row = |set_idx: usize| -> Result<Option<SummaryRow>, SweepError> {
            let ind_set_idx = set_idx / dos_rows.len();
            let dos_idx = set_idx % dos_rows.len();
            let run = run_combination(
                strategy,
                inputs,
                set_idx,
                ind_set_idx,
                dos_idx,
                &dos_rows[dos_idx],
            )?;
            debug!(set_idx, trades = run.summary.trades, "combination finished");
            Ok(filter.passes(&run.summary).then_some(run.summary))
        };

        let rows: Vec<Option<SummaryRow>> = if self.parallel {
            (0..total)
                .into_par_iter()
                .map(run_row)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            (0..total)
                .map(run_row)
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(SweepResults::new(rows.into_iter().flatten().collect()))
    }

    /// Run one combination of the grid and keep its full order-record
    /// stream.
    pub fn run_single(
        &self,
        strategy: &dyn Strategy,
        inputs: &BacktestInputs<'_>,
        dos_rows: &[DynamicOrderSettings],
        ind_set_idx: usize,
        dos_idx: usize,
    ) -> Result<CombinationRun, SweepError> {
        if dos_idx >= dos_rows.len() || ind_set_idx >= strategy.num_settings() {
            return Err(SweepError::RowOutOfRange {
                ind_set_idx,
                dos_idx,
            });
        }
        let set_idx = ind_set_idx * dos_rows.len() + dos_idx;
        run_combination(
            strategy,
            inputs,
            set_idx,
            ind_set_idx,
            dos_idx,
            &dos_rows[dos_idx],
        )
    }
}

impl Default for GridSweep {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulate one grid row start to finish.
fn run_combination(
    strategy: &dyn Strategy,
    inputs: &BacktestInputs<'_>,
    set_idx: usize,
    ind_set_idx: usize,
    dos_idx: usize,
    dos: &DynamicOrderSettings,
) -> Result<CombinationRun, SweepError> {
    let mut engine = LifecycleEngine::new(
        inputs.statics,
        dos,
        inputs.exchange,
        set_idx,
        inputs.starting_equity,
    )?;

    let mut trade_pnls = Vec::new();
    let mut realized_before = 0.0;
    for bar_idx in 0..inputs.candles.len() {
        let signal = strategy.entry_signal(ind_set_idx, bar_idx);
        let provided = strategy.exit_price(ind_set_idx, bar_idx);
        let report = engine.process_bar(inputs.candles, bar_idx, signal, provided);
        if report.exit.is_some() {
            let realized = engine.account().realized_pnl;
            trade_pnls.push(realized - realized_before);
            realized_before = realized;
        }
    }

    let fingerprint = combination_fingerprint(inputs.statics, dos, inputs.exchange);
    let summary = SummaryRow::from_run(
        set_idx,
        ind_set_idx,
        dos_idx,
        fingerprint,
        &trade_pnls,
        inputs.starting_equity,
        engine.account(),
    );
    Ok(CombinationRun {
        summary,
        records: engine.into_records(),
    })
}

/// Collected summary rows from a sweep.
#[derive(Debug, Clone)]
pub struct SweepResults {
    rows: Vec<SummaryRow>,
}

impl SweepResults {
    fn new(rows: Vec<SummaryRow>) -> Self {
        Self { rows }
    }

    pub fn all(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows sorted by `qf_score`, best first.
    pub fn sorted_by_score(&self) -> Vec<&SummaryRow> {
        let mut sorted: Vec<_> = self.rows.iter().collect();
        sorted.sort_by(|a, b| {
            b.qf_score
                .partial_cmp(&a.qf_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    pub fn top_n(&self, n: usize) -> Vec<&SummaryRow> {
        self.sorted_by_score().into_iter().take(n).collect()
    }

    pub fn best(&self) -> Option<&SummaryRow> {
        self.sorted_by_score().into_iter().next()
    }
}
