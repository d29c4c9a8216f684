//! Validated price series.
//!
//! All data validation happens here, at construction. Downstream code
//! (detectors, signal generators, the simulator) can assume ordered,
//! finite, positive prices and never re-checks.

use chrono::NaiveDate;

use super::error::EngulfError;
use super::ohlcv::OhlcvBar;

/// An immutable, date-ordered sequence of daily bars.
///
/// Invariants enforced by [`PriceSeries::new`]:
/// - at least one bar
/// - dates strictly increasing (duplicates rejected)
/// - every price finite and positive
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<OhlcvBar>) -> Result<Self, EngulfError> {
        if bars.is_empty() {
            return Err(EngulfError::data("empty price series"));
        }

        for bar in &bars {
            if !bar.prices_valid() {
                return Err(EngulfError::data(format!(
                    "non-finite or non-positive price on {}",
                    bar.date
                )));
            }
        }

        for pair in bars.windows(2) {
            if pair[1].date == pair[0].date {
                return Err(EngulfError::data(format!(
                    "duplicate date {}",
                    pair[0].date
                )));
            }
            if pair[1].date < pair[0].date {
                return Err(EngulfError::data(format!(
                    "dates out of order at {}",
                    pair[1].date
                )));
            }
        }

        Ok(PriceSeries { bars })
    }

    /// Retain only bars on or after `start`, returning a new series.
    pub fn from_date(&self, start: NaiveDate) -> Result<Self, EngulfError> {
        let filtered: Vec<OhlcvBar> = self
            .bars
            .iter()
            .filter(|b| b.date >= start)
            .cloned()
            .collect();
        if filtered.is_empty() {
            return Err(EngulfError::data(format!("no bars on or after {start}")));
        }
        Ok(PriceSeries { bars: filtered })
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn accepts_ordered_bars() {
        let series = PriceSeries::new(vec![
            bar("2024-08-01", 100.0),
            bar("2024-08-02", 101.0),
            bar("2024-08-05", 99.0),
        ])
        .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(
            series.first_date(),
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
        );
        assert_eq!(
            series.last_date(),
            NaiveDate::from_ymd_opt(2024, 8, 5).unwrap()
        );
    }

    #[test]
    fn rejects_empty() {
        let err = PriceSeries::new(vec![]).unwrap_err();
        assert!(matches!(err, EngulfError::Data { .. }));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = PriceSeries::new(vec![bar("2024-08-01", 100.0), bar("2024-08-01", 101.0)])
            .unwrap_err();
        assert!(err.to_string().contains("duplicate date"));
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let err = PriceSeries::new(vec![bar("2024-08-02", 100.0), bar("2024-08-01", 101.0)])
            .unwrap_err();
        assert!(err.to_string().contains("out of order"));
    }

    #[test]
    fn rejects_bad_prices() {
        let mut b = bar("2024-08-01", 100.0);
        b.close = f64::INFINITY;
        let err = PriceSeries::new(vec![b]).unwrap_err();
        assert!(matches!(err, EngulfError::Data { .. }));
    }

    #[test]
    fn from_date_filters() {
        let series = PriceSeries::new(vec![
            bar("2024-07-30", 100.0),
            bar("2024-08-01", 101.0),
            bar("2024-08-02", 102.0),
        ])
        .unwrap();
        let filtered = series
            .from_date(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap())
            .unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(
            filtered.first_date(),
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
        );
    }

    #[test]
    fn from_date_everything_filtered_is_an_error() {
        let series = PriceSeries::new(vec![bar("2024-07-30", 100.0)]).unwrap();
        let err = series
            .from_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .unwrap_err();
        assert!(matches!(err, EngulfError::Data { .. }));
    }

    #[test]
    fn from_date_does_not_mutate_source() {
        let series = PriceSeries::new(vec![
            bar("2024-07-30", 100.0),
            bar("2024-08-01", 101.0),
        ])
        .unwrap();
        let _ = series
            .from_date(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap())
            .unwrap();
        assert_eq!(series.len(), 2);
    }
}
