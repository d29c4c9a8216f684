//! Open-position tracking and the trade ledger record.

use chrono::NaiveDate;

/// A single open long-style lot. Quantity is a whole number of units,
/// always positive while the position exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub quantity: i64,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }

    /// Unrealized fractional return against the entry price.
    pub fn unrealized_return(&self, price: f64) -> f64 {
        (price - self.entry_price) / self.entry_price
    }

    pub fn should_take_profit(&self, price: f64, threshold: f64) -> bool {
        self.unrealized_return(price) >= threshold
    }

    pub fn should_stop_loss(&self, price: f64, threshold: f64) -> bool {
        self.unrealized_return(price) <= threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn label(self) -> &'static str {
        match self {
            TradeSide::Buy => "Buy",
            TradeSide::Sell => "Sell",
        }
    }
}

/// Why a trade happened. Entry reasons name the pattern that signalled;
/// exit reasons name the rule that forced the close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeReason {
    BullishEngulfing,
    BearishEngulfing,
    TakeProfit,
    StopLoss,
    EndOfBacktest,
}

impl TradeReason {
    pub fn label(self) -> &'static str {
        match self {
            TradeReason::BullishEngulfing => "Bullish Engulfing",
            TradeReason::BearishEngulfing => "Bearish Engulfing",
            TradeReason::TakeProfit => "Take Profit",
            TradeReason::StopLoss => "Stop Loss",
            TradeReason::EndOfBacktest => "End of Backtest",
        }
    }

    pub fn is_entry(self) -> bool {
        matches!(
            self,
            TradeReason::BullishEngulfing | TradeReason::BearishEngulfing
        )
    }

    pub fn is_exit(self) -> bool {
        !self.is_entry()
    }
}

/// Immutable ledger record, appended on entry and exit events only.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub date: NaiveDate,
    pub side: TradeSide,
    pub quantity: i64,
    pub price: f64,
    pub reason: TradeReason,
}
