//! Run configuration: static selectors, per-row dynamic knobs, exchange
//! constants, and grid expansion.

pub mod dynamic;
pub mod exchange;
pub mod grid;
pub mod static_settings;

pub use dynamic::{DynamicOrderSettings, DynamicOrderSettingsArrays};
pub use exchange::ExchangeSettings;
pub use grid::{cartesian_product, GridError};
pub use static_settings::{BreakEvenMode, LeverageMode, StaticOrderSettings, TakeProfitVariant};
