//! Entry-size closed forms.
//!
//! Both solvers answer the same question for a long position: what entry
//! notional makes the loss at the stop-loss, *including* the open fee and
//! the close fee paid at the stop, equal the risk budget?
//!
//! With entry price `e`, stop `s`, open/close fee fractions `f_o`/`f_c`,
//! and notional `u`, the loss at the stop is
//!
//! ```text
//! (u / e) * s * (1 - f_c) - u * (1 + f_o)
//! ```
//!
//! Setting that to `-risk` and solving for `u` gives the flat form; the
//! add form carries the existing position through the same equation so the
//! *blended* position loses exactly the accumulated budget at the blended
//! stop.

/// Entry notional opening from flat such that the loss at `sl_price`
/// (fees included) equals `risk_budget`.
///
/// Long side. Returns a non-finite or non-positive value when the inputs
/// are degenerate (e.g. `sl_price >= entry_price`); callers convert those
/// into entry rejections.
pub fn entry_size_flat(
    entry_price: f64,
    sl_price: f64,
    risk_budget: f64,
    fee_open_pct: f64,
    fee_close_pct: f64,
) -> f64 {
    risk_budget / ((1.0 + fee_open_pct) - sl_price * (1.0 - fee_close_pct) / entry_price)
}

/// Entry notional added to an existing position such that the blended
/// position's loss at `sl_price` (fees included) equals the *accumulated*
/// `total_risk_budget`.
///
/// `average_entry`/`position_size_usd` describe the position before the
/// add. Degenerate inputs produce non-finite or non-positive results, as
/// with [`entry_size_flat`]; `entry_size_add(..., avg, 0.0)` reduces to the
/// flat form.
pub fn entry_size_add(
    entry_price: f64,
    sl_price: f64,
    total_risk_budget: f64,
    fee_open_pct: f64,
    fee_close_pct: f64,
    average_entry: f64,
    position_size_usd: f64,
) -> f64 {
    let existing_at_sl = position_size_usd * sl_price * (1.0 - fee_close_pct) / average_entry
        - position_size_usd * (1.0 + fee_open_pct);
    (total_risk_budget + existing_at_sl)
        / ((1.0 + fee_open_pct) - sl_price * (1.0 - fee_close_pct) / entry_price)
}

/// Weighted-average entry after adding `add_usd` notional at `add_price`.
pub fn average_entry_after_add(
    position_size_usd: f64,
    average_entry: f64,
    add_usd: f64,
    add_price: f64,
) -> f64 {
    (position_size_usd + add_usd) / (position_size_usd / average_entry + add_usd / add_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Loss at the stop for a long of notional `u`, fees included.
    fn loss_at_sl(u: f64, entry: f64, sl: f64, fee_open: f64, fee_close: f64) -> f64 {
        (u / entry) * sl * (1.0 - fee_close) - u * (1.0 + fee_open)
    }

    #[test]
    fn flat_size_reproduces_risk_budget() {
        // Scenario: equity 1000, risk 1% -> budget 10; entry 100, SL 95,
        // fee 0.06% both ways.
        let u = entry_size_flat(100.0, 95.0, 10.0, 0.0006, 0.0006);
        assert!(u > 0.0);
        let loss = loss_at_sl(u, 100.0, 95.0, 0.0006, 0.0006);
        assert!(
            (loss + 10.0).abs() < 1e-6,
            "loss at SL should be -10, got {loss}"
        );
    }

    #[test]
    fn flat_size_without_fees_is_pure_distance() {
        // No fees: u * (1 - 95/100) = 10 -> u = 200
        let u = entry_size_flat(100.0, 95.0, 10.0, 0.0, 0.0);
        assert!((u - 200.0).abs() < 1e-9);
    }

    #[test]
    fn flat_size_degenerate_sl_above_entry() {
        // SL above entry: denominator flips sign -> negative "size"
        let u = entry_size_flat(100.0, 101.0, 10.0, 0.0, 0.0);
        assert!(u < 0.0);
    }

    #[test]
    fn add_size_with_zero_position_matches_flat() {
        let flat = entry_size_flat(100.0, 95.0, 10.0, 0.0006, 0.0006);
        let add = entry_size_add(100.0, 95.0, 10.0, 0.0006, 0.0006, 100.0, 0.0);
        assert!((flat - add).abs() < 1e-9);
    }

    #[test]
    fn add_size_blended_loss_matches_total_budget() {
        let entry1 = 100.0;
        let sl1 = 95.0;
        let fee = 0.0006;
        let u1 = entry_size_flat(entry1, sl1, 10.0, fee, fee);

        // Price moved up; add at 104 against a blended stop of 99 with a
        // total budget of 20 (10 committed + 10 new).
        let entry2 = 104.0;
        let sl2 = 99.0;
        let u2 = entry_size_add(entry2, sl2, 20.0, fee, fee, entry1, u1);
        assert!(u2 > 0.0);

        let avg = average_entry_after_add(u1, entry1, u2, entry2);
        let total_usd = u1 + u2;
        let total_asset = total_usd / avg;
        let loss = total_asset * sl2 * (1.0 - fee) - total_usd * (1.0 + fee);
        assert!(
            (loss + 20.0).abs() < 1e-6,
            "blended loss at SL should be -20, got {loss}"
        );
    }

    #[test]
    fn add_size_negative_when_budget_already_spent() {
        // Existing position already loses more at the stop than the total
        // budget allows: the solver goes negative and the caller rejects.
        let u = entry_size_add(100.0, 80.0, 5.0, 0.0, 0.0, 100.0, 100.0);
        assert!(u < 0.0);
    }

    #[test]
    fn average_entry_between_fills() {
        let avg = average_entry_after_add(200.0, 100.0, 200.0, 110.0);
        assert!(avg > 100.0 && avg < 110.0);
        // Equal notionals: harmonic weighting, not arithmetic
        let expected = 400.0 / (200.0 / 100.0 + 200.0 / 110.0);
        assert!((avg - expected).abs() < 1e-12);
    }
}
