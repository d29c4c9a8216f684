//! Account state: cash, the open position, equity and exposure curves,
//! and the trade ledger.

use chrono::NaiveDate;

use super::position::{Position, Trade};

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Single-asset, single-lot account. At most one position is open at any
/// time; cash moves only when a position is opened or closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub balance: f64,
    pub initial_balance: f64,
    pub position: Option<Position>,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    /// Per-bar position market value / total equity, 0 while flat.
    pub exposure_curve: Vec<f64>,
}

impl Account {
    pub fn new(initial_balance: f64) -> Self {
        Account {
            balance: initial_balance,
            initial_balance,
            position: None,
            trades: Vec::new(),
            equity_curve: Vec::new(),
            exposure_curve: Vec::new(),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    /// Cash plus mark-to-market value of the open position.
    pub fn total_equity(&self, price: f64) -> f64 {
        let position_value = self
            .position
            .as_ref()
            .map(|p| p.market_value(price))
            .unwrap_or(0.0);
        self.balance + position_value
    }

    pub fn record_trade(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    /// Mark the bar: one equity point and one exposure ratio per bar.
    pub fn mark(&mut self, date: NaiveDate, price: f64) {
        let equity = self.total_equity(price);
        let exposure = if equity > 0.0 {
            self.position
                .as_ref()
                .map(|p| p.market_value(price) / equity)
                .unwrap_or(0.0)
        } else {
            0.0
        };
        self.equity_curve.push(EquityPoint { date, equity });
        self.exposure_curve.push(exposure);
    }
}
