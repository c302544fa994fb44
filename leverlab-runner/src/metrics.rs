//! Row metrics — pure functions over the per-trade realized-PnL array.
//!
//! Every metric is a pure function: trade PnLs (and equities) in, scalar
//! out. Edge cases (no trades, flat curves) return 0 rather than NaN so
//! zero-trade rows still produce a well-formed summary.

/// Sum of per-trade realized PnL.
pub fn total_pnl(trade_pnls: &[f64]) -> f64 {
    trade_pnls.iter().sum()
}

/// Fraction of trades with positive realized PnL.
pub fn win_rate(trade_pnls: &[f64]) -> f64 {
    if trade_pnls.is_empty() {
        return 0.0;
    }
    let winners = trade_pnls.iter().filter(|&&pnl| pnl > 0.0).count();
    winners as f64 / trade_pnls.len() as f64
}

/// Equity change as a percentage of the starting equity.
pub fn gains_pct(starting_equity: f64, ending_equity: f64) -> f64 {
    if starting_equity <= 0.0 {
        return 0.0;
    }
    (ending_equity - starting_equity) / starting_equity * 100.0
}

/// Running sum of the per-trade PnLs.
pub fn cumulative_pnl(trade_pnls: &[f64]) -> Vec<f64> {
    let mut sum = 0.0;
    trade_pnls
        .iter()
        .map(|pnl| {
            sum += pnl;
            sum
        })
        .collect()
}

/// Least-squares line over `y` with x = 0..n. Returns (slope, intercept).
pub fn linear_fit(y: &[f64]) -> (f64, f64) {
    let n = y.len();
    if n < 2 {
        return (0.0, y.first().copied().unwrap_or(0.0));
    }
    let n_f = n as f64;
    let x_mean = (n_f - 1.0) / 2.0;
    let y_mean = y.iter().sum::<f64>() / n_f;

    let mut cov = 0.0;
    let mut var = 0.0;
    for (i, &yi) in y.iter().enumerate() {
        let dx = i as f64 - x_mean;
        cov += dx * (yi - y_mean);
        var += dx * dx;
    }
    if var < 1e-15 {
        return (0.0, y_mean);
    }
    let slope = cov / var;
    (slope, y_mean - slope * x_mean)
}

/// Smoothness score of the cumulative-PnL curve: the R² of its linear
/// fit, sign-flipped when the fitted slope is negative.
///
/// A strategy that compounds steadily scores near +1; a steady loser
/// scores near -1; a choppy curve scores near 0. Fewer than three trades
/// score 0.
pub fn qf_score(trade_pnls: &[f64]) -> f64 {
    let y = cumulative_pnl(trade_pnls);
    if y.len() < 3 {
        return 0.0;
    }
    let (slope, intercept) = linear_fit(&y);
    let y_mean = y.iter().sum::<f64>() / y.len() as f64;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (i, &yi) in y.iter().enumerate() {
        let fit = slope * i as f64 + intercept;
        ss_res += (yi - fit) * (yi - fit);
        ss_tot += (yi - y_mean) * (yi - y_mean);
    }
    if ss_tot < 1e-15 {
        return 0.0;
    }
    let r2 = 1.0 - ss_res / ss_tot;
    if slope < 0.0 {
        -r2
    } else {
        r2
    }
}

/// Variant of [`qf_score`] that only penalizes residuals *below* the
/// fitted line: persistent drawdowns hurt, upside variance does not.
pub fn upside_score(trade_pnls: &[f64]) -> f64 {
    let y = cumulative_pnl(trade_pnls);
    if y.len() < 3 {
        return 0.0;
    }
    let (slope, intercept) = linear_fit(&y);
    let y_mean = y.iter().sum::<f64>() / y.len() as f64;

    let mut ss_down = 0.0;
    let mut ss_tot = 0.0;
    for (i, &yi) in y.iter().enumerate() {
        let fit = slope * i as f64 + intercept;
        if yi < fit {
            ss_down += (yi - fit) * (yi - fit);
        }
        ss_tot += (yi - y_mean) * (yi - y_mean);
    }
    if ss_tot < 1e-15 {
        return 0.0;
    }
    let score = 1.0 - ss_down / ss_tot;
    if slope < 0.0 {
        -score
    } else {
        score
    }
}
