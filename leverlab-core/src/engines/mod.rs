//! The five engines composed by the lifecycle orchestrator.

pub mod decrease;
pub mod leverage;
pub mod sizing;
pub mod stop_loss;
pub mod take_profit;

pub use decrease::close_position;
pub use leverage::{assign_leverage, LeverageOutcome};
pub use sizing::{size_entry, SizingOutcome};
pub use stop_loss::{BreakEvenRule, StopLossEngine, TrailRule};
pub use take_profit::{TakeProfitEngine, TpContext, TpPriceSource};
