//! Backtest configuration and the simulation fold.
//!
//! A strict left-to-right fold over the bar sequence. Each bar's decision
//! uses the signal computed at the previous bar and the current bar's
//! open/close only — no lookahead.

use chrono::NaiveDate;

use super::account::Account;
use super::error::EngulfError;
use super::execution::{enter_position, exit_position};
use super::position::{TradeReason, TradeSide};
use super::series::PriceSeries;
use super::signal::Signal;

/// Default parameters, shared with config validation.
pub mod defaults {
    pub const INITIAL_BALANCE: f64 = 1_000_000.0;
    pub const ALLOCATION_FRACTION: f64 = 0.3;
    pub const TAKE_PROFIT: f64 = 0.05;
    pub const STOP_LOSS: f64 = -0.01;
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_balance: f64,
    /// Fraction of current cash committed per entry, in (0, 1].
    pub allocation_fraction: f64,
    /// Unrealized return at or above which a position is closed. Positive.
    pub take_profit_threshold: f64,
    /// Unrealized return at or below which a position is closed. Negative.
    pub stop_loss_threshold: f64,
    /// Drop bars before this date prior to signal generation.
    pub start_date: Option<NaiveDate>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_balance: defaults::INITIAL_BALANCE,
            allocation_fraction: defaults::ALLOCATION_FRACTION,
            take_profit_threshold: defaults::TAKE_PROFIT,
            stop_loss_threshold: defaults::STOP_LOSS,
            start_date: None,
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), EngulfError> {
        let invalid = |key: &str, reason: &str| EngulfError::ConfigInvalid {
            section: "backtest".into(),
            key: key.into(),
            reason: reason.into(),
        };

        if !(self.initial_balance.is_finite() && self.initial_balance > 0.0) {
            return Err(invalid("initial_balance", "must be positive"));
        }
        if !(self.allocation_fraction > 0.0 && self.allocation_fraction <= 1.0) {
            return Err(invalid("allocation_fraction", "must be in (0, 1]"));
        }
        if !(self.take_profit_threshold.is_finite() && self.take_profit_threshold > 0.0) {
            return Err(invalid("take_profit", "must be positive"));
        }
        if !(self.stop_loss_threshold.is_finite() && self.stop_loss_threshold < 0.0) {
            return Err(invalid("stop_loss", "must be negative"));
        }
        if self.stop_loss_threshold >= self.take_profit_threshold {
            return Err(invalid("stop_loss", "must be below take_profit"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub account: Account,
}

/// Run the simulation over a series and its aligned signal column.
///
/// Bar 0 only seeds the equity curve. For every later bar: a flat
/// account enters at the open when the previous bar signalled; an open
/// position is closed at the close when the unrealized return crosses a
/// threshold. A position still open after the last bar is liquidated at
/// that bar's close.
pub fn run_backtest(
    series: &PriceSeries,
    signals: &[Signal],
    config: &BacktestConfig,
) -> Result<BacktestResult, EngulfError> {
    config.validate()?;

    if signals.len() != series.len() {
        return Err(EngulfError::data(format!(
            "signal column length {} does not match series length {}",
            signals.len(),
            series.len()
        )));
    }

    let bars = series.bars();
    let mut account = Account::new(config.initial_balance);

    account.mark(bars[0].date, bars[0].close);

    for i in 1..bars.len() {
        let signal = signals[i - 1];
        let bar = &bars[i];

        if account.is_flat() {
            match signal {
                Signal::Buy => {
                    enter_position(
                        &mut account,
                        bar.date,
                        bar.open,
                        config.allocation_fraction,
                        TradeSide::Buy,
                        TradeReason::BullishEngulfing,
                    );
                }
                Signal::Sell => {
                    enter_position(
                        &mut account,
                        bar.date,
                        bar.open,
                        config.allocation_fraction,
                        TradeSide::Sell,
                        TradeReason::BearishEngulfing,
                    );
                }
                Signal::Hold => {}
            }
        } else if let Some(position) = &account.position {
            let take_profit = position.should_take_profit(bar.close, config.take_profit_threshold);
            let stop_loss = position.should_stop_loss(bar.close, config.stop_loss_threshold);
            if take_profit {
                exit_position(&mut account, bar.date, bar.close, TradeReason::TakeProfit);
            } else if stop_loss {
                exit_position(&mut account, bar.date, bar.close, TradeReason::StopLoss);
            }
        }

        account.mark(bar.date, bar.close);

        let equity = account.equity_curve[i].equity;
        if !equity.is_finite() {
            return Err(EngulfError::data(format!(
                "non-finite equity on {}",
                bar.date
            )));
        }
    }

    // forced liquidation: the ledger always nets to zero open exposure
    if !account.is_flat() {
        let last = &bars[bars.len() - 1];
        exit_position(
            &mut account,
            last.date,
            last.close,
            TradeReason::EndOfBacktest,
        );
    }

    Ok(BacktestResult { account })
}
