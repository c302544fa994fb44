//! Position sizing engine — risk-budgeted entry sizing with rejection
//! outcomes.

use crate::domain::{AccountState, Position};
use crate::formulas::{
    average_entry_after_add, entry_size_add, entry_size_flat, round_to_step,
};
use crate::outcome::RejectReason;
use crate::settings::{DynamicOrderSettings, ExchangeSettings};

/// Float-noise tolerance for the equity-risk ceiling comparison.
const RISK_EPS: f64 = 1e-9;

/// Pure result of a sizing attempt. Nothing is applied until the leverage
/// engine also succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingOutcome {
    pub average_entry: f64,
    pub entry_price: f64,
    pub entry_size_asset: f64,
    pub entry_size_usd: f64,
    pub position_size_asset: f64,
    pub position_size_usd: f64,
    /// Accumulated risk committed across stacked entries.
    pub possible_loss: f64,
    pub total_trades: usize,
    /// Stop distance as a fraction of the (possibly blended) average entry.
    pub sl_pct: f64,
}

/// Size an entry (or an add to an open position) against the risk budget.
///
/// 1. Commit `equity * risk_pct` more risk; reject `RiskTooBig` past the
///    equity ceiling and `MaxTradesReached` past the stacking limit.
/// 2. Solve the flat or adding closed form for the entry notional.
/// 3. Round the asset size to the exchange tick step and enforce the size
///    bounds. NaN or non-positive solver output becomes a rejection.
/// 4. Blend the average entry and stop percentage when adding.
pub fn size_entry(
    account: &AccountState,
    position: &Position,
    dos: &DynamicOrderSettings,
    exchange: &ExchangeSettings,
    entry_price: f64,
    sl_price: f64,
) -> Result<SizingOutcome, RejectReason> {
    let possible_loss = account.possible_loss + account.equity * dos.risk_pct;
    if possible_loss > account.equity * dos.max_equity_risk_pct + RISK_EPS {
        return Err(RejectReason::RiskTooBig);
    }
    let total_trades = account.total_trades + 1;
    if total_trades > dos.max_trades {
        return Err(RejectReason::MaxTradesReached);
    }

    let fee = exchange.market_fee_pct;
    let entry_usd = if position.is_open() {
        entry_size_add(
            entry_price,
            sl_price,
            possible_loss,
            fee,
            fee,
            position.average_entry,
            position.position_size_usd,
        )
    } else {
        entry_size_flat(entry_price, sl_price, possible_loss, fee, fee)
    };
    if !entry_usd.is_finite() || entry_usd <= 0.0 {
        return Err(RejectReason::EntrySizeTooSmall);
    }

    let entry_size_asset = round_to_step(entry_usd / entry_price, exchange.asset_tick_step);
    if entry_size_asset < exchange.min_asset_size {
        return Err(RejectReason::EntrySizeTooSmall);
    }
    let position_size_asset = position.position_size_asset + entry_size_asset;
    if position_size_asset > exchange.max_asset_size {
        return Err(RejectReason::EntrySizeTooBig);
    }

    // Notional recomputed from the rounded asset size
    let entry_size_usd = entry_size_asset * entry_price;
    let position_size_usd = position.position_size_usd + entry_size_usd;

    let average_entry = if position.is_open() {
        round_to_step(
            average_entry_after_add(
                position.position_size_usd,
                position.average_entry,
                entry_size_usd,
                entry_price,
            ),
            exchange.price_tick_step,
        )
    } else {
        entry_price
    };
    let sl_pct = (average_entry - sl_price) / average_entry;

    Ok(SizingOutcome {
        average_entry,
        entry_price,
        entry_size_asset,
        entry_size_usd,
        position_size_asset,
        position_size_usd,
        possible_loss,
        total_trades,
        sl_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dos() -> DynamicOrderSettings {
        DynamicOrderSettings {
            risk_pct: 0.01,
            max_equity_risk_pct: 0.04,
            max_trades: 3,
            risk_reward: 3.0,
            sl_lookback: 20,
            sl_offset_pct: 0.001,
            be_trigger_pct: 0.02,
            trail_trigger_pct: 0.03,
            trail_offset_pct: 0.01,
        }
    }

    fn exchange() -> ExchangeSettings {
        // Fine tick steps so rounding noise stays below the assertions
        ExchangeSettings {
            asset_tick_step: 6,
            price_tick_step: 4,
            ..ExchangeSettings::default()
        }
    }

    #[test]
    fn flat_entry_commits_one_risk_unit() {
        let account = AccountState::new(0, 1_000.0);
        let position = Position::flat();
        let out = size_entry(&account, &position, &dos(), &exchange(), 100.0, 95.0).unwrap();

        assert_eq!(out.total_trades, 1);
        assert!((out.possible_loss - 10.0).abs() < 1e-9);
        assert_eq!(out.average_entry, 100.0);
        assert!((out.sl_pct - 0.05).abs() < 1e-12);
        assert!(out.entry_size_usd > 0.0);
        assert_eq!(out.position_size_usd, out.entry_size_usd);
    }

    #[test]
    fn risk_ceiling_rejects() {
        let mut account = AccountState::new(0, 1_000.0);
        account.possible_loss = 35.0; // 3.5% committed, ceiling 4%
        let position = Position::flat();
        let err = size_entry(&account, &position, &dos(), &exchange(), 100.0, 95.0).unwrap_err();
        assert_eq!(err, RejectReason::RiskTooBig);
    }

    #[test]
    fn risk_exactly_at_ceiling_is_allowed() {
        let mut account = AccountState::new(0, 1_000.0);
        account.possible_loss = 30.0; // +10 lands exactly on 40
        let position = Position::flat();
        assert!(size_entry(&account, &position, &dos(), &exchange(), 100.0, 95.0).is_ok());
    }

    #[test]
    fn max_trades_rejects() {
        let mut account = AccountState::new(0, 1_000.0);
        account.total_trades = 3;
        let position = Position::flat();
        let err = size_entry(&account, &position, &dos(), &exchange(), 100.0, 95.0).unwrap_err();
        assert_eq!(err, RejectReason::MaxTradesReached);
    }

    #[test]
    fn sl_above_entry_becomes_rejection() {
        let account = AccountState::new(0, 1_000.0);
        let position = Position::flat();
        let err = size_entry(&account, &position, &dos(), &exchange(), 100.0, 105.0).unwrap_err();
        assert_eq!(err, RejectReason::EntrySizeTooSmall);
    }

    #[test]
    fn nan_inputs_become_rejection() {
        let account = AccountState::new(0, 1_000.0);
        let position = Position::flat();
        let err =
            size_entry(&account, &position, &dos(), &exchange(), f64::NAN, 95.0).unwrap_err();
        assert_eq!(err, RejectReason::EntrySizeTooSmall);
    }

    #[test]
    fn dust_size_rejected_by_exchange_minimum() {
        let account = AccountState::new(0, 1.0); // tiny equity -> dust entry
        let position = Position::flat();
        let mut ex = exchange();
        ex.min_asset_size = 0.1;
        let err = size_entry(&account, &position, &dos(), &ex, 100.0, 95.0).unwrap_err();
        assert_eq!(err, RejectReason::EntrySizeTooSmall);
    }

    #[test]
    fn oversize_rejected_by_exchange_maximum() {
        let account = AccountState::new(0, 1_000_000_000.0);
        let position = Position::flat();
        let err = size_entry(&account, &position, &dos(), &exchange(), 100.0, 95.0).unwrap_err();
        assert_eq!(err, RejectReason::EntrySizeTooBig);
    }

    #[test]
    fn add_blends_average_entry() {
        let account = AccountState::new(0, 1_000.0);
        let flat = Position::flat();
        let ex = exchange();
        let first = size_entry(&account, &flat, &dos(), &ex, 100.0, 95.0).unwrap();

        let mut account2 = account.clone();
        account2.possible_loss = first.possible_loss;
        account2.total_trades = first.total_trades;
        let mut open = Position::flat();
        open.average_entry = first.average_entry;
        open.position_size_asset = first.position_size_asset;
        open.position_size_usd = first.position_size_usd;

        let second = size_entry(&account2, &open, &dos(), &ex, 104.0, 99.0).unwrap();
        assert_eq!(second.total_trades, 2);
        assert!((second.possible_loss - 20.0).abs() < 1e-9);
        assert!(second.average_entry > 100.0 && second.average_entry < 104.0);
        assert!(second.position_size_usd > first.position_size_usd);
        // Blended stop distance against the blended entry
        let expected_pct = (second.average_entry - 99.0) / second.average_entry;
        assert!((second.sl_pct - expected_pct).abs() < 1e-12);
    }
}
