//! OHLCV bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// Upper edge of the candle body: max(open, close).
    pub fn body_high(&self) -> f64 {
        self.open.max(self.close)
    }

    /// Lower edge of the candle body: min(open, close).
    pub fn body_low(&self) -> f64 {
        self.open.min(self.close)
    }

    /// Up candle: close above open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Down candle: close below open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// All four prices are positive finite numbers.
    pub fn prices_valid(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p > 0.0)
    }
}
