#![allow(dead_code)]

use chrono::NaiveDate;
use engulfbt::domain::backtest::BacktestConfig;
pub use engulfbt::domain::ohlcv::OhlcvBar;
use engulfbt::domain::series::PriceSeries;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(day_offset: i64, open: f64, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: date(2024, 8, 1) + chrono::Duration::days(day_offset),
        open,
        high: open.max(close) + 1.0,
        low: open.min(close) - 1.0,
        close,
        volume: 1000,
    }
}

pub fn make_series(bars: Vec<OhlcvBar>) -> PriceSeries {
    PriceSeries::new(bars).unwrap()
}

/// Bars whose open equals the prior close, so the series has no gaps.
pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let bars: Vec<OhlcvBar> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let open = if i == 0 { c } else { closes[i - 1] };
            make_bar(i as i64, open, c)
        })
        .collect();
    make_series(bars)
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig::default()
}
