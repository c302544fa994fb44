//! Domain types: candles, account state, positions, output records.

pub mod account;
pub mod candle;
pub mod position;
pub mod record;

pub use account::AccountState;
pub use candle::{window_max, window_min, Candle, CandleBodyPart};
pub use position::{OrderStatus, Position, Side};
pub use record::OrderRecord;
