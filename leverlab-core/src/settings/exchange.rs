//! Exchange settings — fees, margin rules, and tick steps.

use serde::{Deserialize, Serialize};

/// Exchange-imposed constants, invariant for a run and supplied externally.
///
/// Tick steps are decimal places: `asset_tick_step = 3` means asset sizes
/// are quoted to three decimals. Fees and the maintenance-margin rate are
/// fractions (`0.0006` = 0.06%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeSettings {
    /// Taker fee, charged on entries and on stop-loss/liquidation exits.
    pub market_fee_pct: f64,
    /// Maker fee, charged on take-profit exits.
    pub limit_fee_pct: f64,
    /// Maintenance margin rate.
    pub mmr_pct: f64,
    pub min_leverage: f64,
    pub max_leverage: f64,
    /// Order size bounds in asset units.
    pub min_asset_size: f64,
    pub max_asset_size: f64,
    pub asset_tick_step: u32,
    pub price_tick_step: u32,
    pub leverage_tick_step: u32,
}

impl Default for ExchangeSettings {
    /// Bybit-like linear perpetual defaults, adequate for tests.
    fn default() -> Self {
        Self {
            market_fee_pct: 0.0006,
            limit_fee_pct: 0.0001,
            mmr_pct: 0.005,
            min_leverage: 1.0,
            max_leverage: 100.0,
            min_asset_size: 0.001,
            max_asset_size: 100.0,
            asset_tick_step: 3,
            price_tick_step: 2,
            leverage_tick_step: 1,
        }
    }
}
