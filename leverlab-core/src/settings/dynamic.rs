//! Dynamic order settings — the per-grid-row numeric knobs.

use serde::{Deserialize, Serialize};

use super::grid::{cartesian_product, GridError};

/// One settings-grid row.
///
/// All percentages are fractions (`0.01` = 1%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicOrderSettings {
    /// Fraction of equity risked per entry.
    pub risk_pct: f64,
    /// Ceiling on the total committed risk as a fraction of equity.
    pub max_equity_risk_pct: f64,
    /// Max entries stacked into one position.
    pub max_trades: usize,
    /// Take-profit target as a multiple of committed risk.
    pub risk_reward: f64,
    /// Bars (including the signal bar) the initial stop looks back over.
    pub sl_lookback: usize,
    /// Offset below the lookback extreme, as a fraction.
    pub sl_offset_pct: f64,
    /// Profit fraction past average entry that arms the break-even move.
    pub be_trigger_pct: f64,
    /// Profit fraction past average entry that arms the trailing stop.
    pub trail_trigger_pct: f64,
    /// Trailing distance below the candle body, as a fraction.
    pub trail_offset_pct: f64,
}

/// Independent axes for every `DynamicOrderSettings` field.
///
/// `expand` produces the full cartesian grid, first field varying slowest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicOrderSettingsArrays {
    pub risk_pct: Vec<f64>,
    pub max_equity_risk_pct: Vec<f64>,
    pub max_trades: Vec<usize>,
    pub risk_reward: Vec<f64>,
    pub sl_lookback: Vec<usize>,
    pub sl_offset_pct: Vec<f64>,
    pub be_trigger_pct: Vec<f64>,
    pub trail_trigger_pct: Vec<f64>,
    pub trail_offset_pct: Vec<f64>,
}

impl DynamicOrderSettingsArrays {
    /// Total number of combinations in this grid.
    pub fn size(&self) -> usize {
        self.risk_pct.len()
            * self.max_equity_risk_pct.len()
            * self.max_trades.len()
            * self.risk_reward.len()
            * self.sl_lookback.len()
            * self.sl_offset_pct.len()
            * self.be_trigger_pct.len()
            * self.trail_trigger_pct.len()
            * self.trail_offset_pct.len()
    }

    /// Expand the axes into one `DynamicOrderSettings` per combination.
    ///
    /// Field order above is the variation order: `risk_pct` varies slowest,
    /// `trail_offset_pct` fastest. Fails before any simulation starts if an
    /// axis is empty.
    pub fn expand(&self) -> Result<Vec<DynamicOrderSettings>, GridError> {
        let axes: Vec<Vec<f64>> = vec![
            self.risk_pct.clone(),
            self.max_equity_risk_pct.clone(),
            self.max_trades.iter().map(|&v| v as f64).collect(),
            self.risk_reward.clone(),
            self.sl_lookback.iter().map(|&v| v as f64).collect(),
            self.sl_offset_pct.clone(),
            self.be_trigger_pct.clone(),
            self.trail_trigger_pct.clone(),
            self.trail_offset_pct.clone(),
        ];
        let columns = cartesian_product(&axes)?;
        Ok(Self::rows_from_columns(&columns))
    }

    /// Build rows from pre-expanded aligned columns (the same nine, in
    /// field order). A length mismatch between columns is a fatal
    /// configuration error, detected before looping begins.
    pub fn from_aligned(columns: &[Vec<f64>]) -> Result<Vec<DynamicOrderSettings>, GridError> {
        if columns.len() != 9 {
            return Err(GridError::WrongColumnCount {
                expected: 9,
                got: columns.len(),
            });
        }
        let rows = columns[0].len();
        for (axis, column) in columns.iter().enumerate() {
            if column.len() != rows {
                return Err(GridError::MismatchedColumns {
                    axis,
                    expected: rows,
                    got: column.len(),
                });
            }
        }
        Ok(Self::rows_from_columns(columns))
    }

    fn rows_from_columns(columns: &[Vec<f64>]) -> Vec<DynamicOrderSettings> {
        let rows = columns[0].len();
        (0..rows)
            .map(|i| DynamicOrderSettings {
                risk_pct: columns[0][i],
                max_equity_risk_pct: columns[1][i],
                max_trades: columns[2][i] as usize,
                risk_reward: columns[3][i],
                sl_lookback: columns[4][i] as usize,
                sl_offset_pct: columns[5][i],
                be_trigger_pct: columns[6][i],
                trail_trigger_pct: columns[7][i],
                trail_offset_pct: columns[8][i],
            })
            .collect()
    }
}
