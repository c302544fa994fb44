//! Numeric formula library — pure functions, no engine state, no I/O.
//!
//! Everything here is a closed form over `f64`. The long side is exact;
//! where a formula takes a [`Side`](crate::domain::Side), the short branch
//! is the documented sign flip of the long one. Rounding to exchange tick
//! steps happens at the same points the engines apply it, never inside the
//! solvers themselves.

pub mod leverage;
pub mod pnl;
pub mod sizing;

pub use leverage::{
    bankruptcy_price, dynamic_leverage, liquidation_price, margin_required, SL_BUFFER_PCT,
};
pub use pnl::{break_even_price, realized_pnl, take_profit_price, ExitPnl};
pub use sizing::{average_entry_after_add, entry_size_add, entry_size_flat};

/// Round to a tick step expressed as a number of decimal places.
pub fn round_to_step(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Round down to a tick step expressed as a number of decimal places.
pub fn floor_to_step(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).floor() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_step_decimals() {
        assert_eq!(round_to_step(1.23456, 3), 1.235);
        assert_eq!(round_to_step(1.23444, 3), 1.234);
        assert_eq!(round_to_step(90.4999, 2), 90.5);
        assert_eq!(round_to_step(12.3, 0), 12.0);
    }

    #[test]
    fn floor_to_step_never_rounds_up() {
        assert_eq!(floor_to_step(9.999, 2), 9.99);
        assert_eq!(floor_to_step(10.0, 2), 10.0);
        assert_eq!(floor_to_step(7.89, 0), 7.0);
    }
}
