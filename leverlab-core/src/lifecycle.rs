//! Order lifecycle orchestrator — the per-bar state machine.
//!
//! Position states walk `Flat → Open → {stop | take-profit | liquidation}
//! → Flat`, with `Open → Open` self-loops for stop moves. Exit checks run
//! in fixed priority (stop-loss, then liquidation, then take-profit); the
//! first hit closes the position and no further exit checks run that bar.
//! Entries are evaluated independently of position state and fill at the
//! *next* bar's open — signals computed on bar `t` can never trade bar
//! `t`'s own prices.

use thiserror::Error;
use tracing::debug;

use crate::domain::{AccountState, Candle, OrderRecord, OrderStatus, Position, Side};
use crate::engines::{
    assign_leverage, close_position, size_entry, StopLossEngine, TakeProfitEngine, TpContext,
};
use crate::outcome::{BarReport, EntryDecision, ExitKind, RejectReason, SlMoveKind};
use crate::settings::{
    DynamicOrderSettings, ExchangeSettings, LeverageMode, StaticOrderSettings,
};

/// Fatal configuration errors, raised at engine construction.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The short-side lifecycle is not implemented; only the pure formulas
    /// carry the short sign conventions.
    #[error("short side lifecycle is not implemented")]
    ShortSideUnsupported,
    #[error("starting equity must be positive, got {0}")]
    NonPositiveEquity(f64),
}

/// Records are appended on every state change; this is plenty for typical
/// runs and avoids regrowth in the hot loop.
const RECORDS_CAPACITY: usize = 256;

/// One settings-grid row's simulation state: engines resolved from the
/// settings plus the account/position values they evolve.
pub struct LifecycleEngine {
    dos: DynamicOrderSettings,
    exchange: ExchangeSettings,
    leverage_mode: LeverageMode,
    stop_loss: StopLossEngine,
    take_profit: TakeProfitEngine,
    account: AccountState,
    position: Position,
    records: Vec<OrderRecord>,
}

impl std::fmt::Debug for LifecycleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleEngine")
            .field("dos", &self.dos)
            .field("exchange", &self.exchange)
            .field("leverage_mode", &self.leverage_mode)
            .field("account", &self.account)
            .field("position", &self.position)
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl LifecycleEngine {
    /// Resolve all variant selectors into concrete engines and initialize
    /// a fresh account for one grid row.
    pub fn new(
        statics: &StaticOrderSettings,
        dos: &DynamicOrderSettings,
        exchange: &ExchangeSettings,
        set_idx: usize,
        starting_equity: f64,
    ) -> Result<Self, ConfigError> {
        if statics.side == Side::Short {
            return Err(ConfigError::ShortSideUnsupported);
        }
        if !(starting_equity > 0.0) {
            return Err(ConfigError::NonPositiveEquity(starting_equity));
        }
        Ok(Self {
            dos: dos.clone(),
            exchange: exchange.clone(),
            leverage_mode: statics.leverage_mode,
            stop_loss: StopLossEngine::from_settings(statics, dos, exchange),
            take_profit: TakeProfitEngine::from_variant(statics.take_profit, exchange),
            account: AccountState::new(set_idx, starting_equity),
            position: Position::flat(),
            records: Vec::with_capacity(RECORDS_CAPACITY),
        })
    }

    pub fn account(&self) -> &AccountState {
        &self.account
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<OrderRecord> {
        self.records
    }

    /// Advance one bar.
    ///
    /// `entry_signal` and `provided_exit` come from the strategy
    /// collaborator for this (setting, bar). Returns what happened for the
    /// caller to switch on; rejected entries leave every field of state
    /// untouched and emit only a debug diagnostic.
    pub fn process_bar(
        &mut self,
        candles: &[Candle],
        bar_idx: usize,
        entry_signal: bool,
        provided_exit: Option<f64>,
    ) -> BarReport {
        let mut report = BarReport::default();
        let candle = candles[bar_idx];

        if self.position.is_open() {
            // Provided TP variants may re-quote the target each bar.
            if let Some((tp_price, tp_pct)) = self.take_profit.on_bar(provided_exit, &self.position)
            {
                self.position = Position {
                    tp_price,
                    tp_pct,
                    ..self.position.clone()
                };
            }

            if self.stop_loss.check_hit(&candle, self.position.sl_price) {
                self.exit(ExitKind::StopLoss, self.position.sl_price, bar_idx, &candle);
                report.exit = Some(ExitKind::StopLoss);
            } else if candle.low <= self.position.liq_price {
                self.exit(
                    ExitKind::Liquidation,
                    self.position.liq_price,
                    bar_idx,
                    &candle,
                );
                report.exit = Some(ExitKind::Liquidation);
            } else if self.take_profit.check_hit(&candle, self.position.tp_price) {
                self.exit(ExitKind::TakeProfit, self.position.tp_price, bar_idx, &candle);
                report.exit = Some(ExitKind::TakeProfit);
            } else {
                if let Some(sl_price) = self.stop_loss.try_break_even(&candle, &self.position) {
                    self.move_stop(sl_price, OrderStatus::MovedSlToBe, bar_idx, &candle);
                    report.sl_move = Some(SlMoveKind::BreakEven);
                }
                if let Some(sl_price) = self.stop_loss.try_trail(&candle, &self.position) {
                    self.move_stop(sl_price, OrderStatus::MovedTsl, bar_idx, &candle);
                    report.sl_move = Some(SlMoveKind::Trailing);
                }
            }
        }

        // Entry evaluation is independent of the exit path above; a fresh
        // signal after an exit re-enters at the next bar. The last bar has
        // no next open to fill at, so the signal lapses.
        if entry_signal && bar_idx + 1 < candles.len() {
            match self.try_enter(candles, bar_idx) {
                Ok(()) => report.entry = Some(EntryDecision::Filled),
                Err(reason) => {
                    debug!(
                        set_idx = self.account.set_idx,
                        bar_idx,
                        reason = reason.as_str(),
                        "entry rejected"
                    );
                    report.entry = Some(EntryDecision::Rejected(reason));
                }
            }
        }

        report
    }

    /// Attempt an entry (or an add) filling at the next bar's open.
    ///
    /// Sizing and leverage both return pure outcomes; nothing is applied
    /// until both succeed, so a rejection cannot leave partial state.
    fn try_enter(&mut self, candles: &[Candle], bar_idx: usize) -> Result<(), RejectReason> {
        let next = candles[bar_idx + 1];
        let entry_price = next.open;
        let sl_price = self
            .stop_loss
            .initial_stop(candles, bar_idx)
            .ok_or(RejectReason::EntrySizeTooSmall)?;

        let sizing = size_entry(
            &self.account,
            &self.position,
            &self.dos,
            &self.exchange,
            entry_price,
            sl_price,
        )?;
        let leverage = assign_leverage(
            self.leverage_mode,
            &self.account,
            &sizing,
            &self.exchange,
            sl_price,
        )?;
        let (tp_price, tp_pct) = self.take_profit.on_entry(&TpContext {
            possible_loss: sizing.possible_loss,
            risk_reward: self.dos.risk_reward,
            average_entry: sizing.average_entry,
            position_size_usd: sizing.position_size_usd,
        });

        self.account = AccountState {
            bar_idx: bar_idx + 1,
            timestamp: next.timestamp,
            available_balance: leverage.available_balance,
            cash_used: leverage.cash_used,
            cash_borrowed: leverage.cash_borrowed,
            possible_loss: sizing.possible_loss,
            total_trades: sizing.total_trades,
            ..self.account.clone()
        };
        self.position = Position {
            average_entry: sizing.average_entry,
            entry_price: sizing.entry_price,
            entry_size_asset: sizing.entry_size_asset,
            entry_size_usd: sizing.entry_size_usd,
            position_size_asset: sizing.position_size_asset,
            position_size_usd: sizing.position_size_usd,
            leverage: leverage.leverage,
            liq_price: leverage.liq_price,
            sl_price,
            sl_pct: sizing.sl_pct,
            tp_price,
            tp_pct,
            exit_price: 0.0,
            can_move_sl_to_be: true,
            status: OrderStatus::EntryFilled,
        };
        self.records
            .push(OrderRecord::snapshot(&self.account, &self.position));
        Ok(())
    }

    fn exit(&mut self, kind: ExitKind, exit_price: f64, bar_idx: usize, candle: &Candle) {
        let (account, position) = close_position(
            &self.account,
            &self.position,
            &self.exchange,
            exit_price,
            kind,
            bar_idx,
            candle.timestamp,
        );
        self.account = account;
        self.position = position;
        self.records
            .push(OrderRecord::snapshot(&self.account, &self.position));
    }

    fn move_stop(&mut self, sl_price: f64, status: OrderStatus, bar_idx: usize, candle: &Candle) {
        let average_entry = self.position.average_entry;
        self.position = Position {
            sl_price,
            sl_pct: (average_entry - sl_price) / average_entry,
            // The break-even move is one-shot; a trailing move past entry
            // makes a later break-even pointless anyway.
            can_move_sl_to_be: self.position.can_move_sl_to_be
                && status != OrderStatus::MovedSlToBe,
            status,
            ..self.position.clone()
        };
        self.account = AccountState {
            bar_idx,
            timestamp: candle.timestamp,
            ..self.account.clone()
        };
        self.records
            .push(OrderRecord::snapshot(&self.account, &self.position));
    }
}
