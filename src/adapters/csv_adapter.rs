//! CSV price-data adapter.
//!
//! Column lookup is by header name, case-insensitively: source files
//! disagree on capitalization (`Open`/`open`, `Close`/`close`) and both
//! forms must load identically. Volume is optional.

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::domain::error::EngulfError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::PriceSeries;
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    path: PathBuf,
}

struct ColumnMap {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn data_error(&self, reason: impl std::fmt::Display) -> EngulfError {
        EngulfError::data(format!("{}: {}", self.path.display(), reason))
    }

    fn map_columns(&self, headers: &csv::StringRecord) -> Result<ColumnMap, EngulfError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| self.data_error(format!("missing column '{name}'")))
        };

        Ok(ColumnMap {
            date: require("date")?,
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            volume: find("volume"),
        })
    }

    fn parse_bar(
        &self,
        columns: &ColumnMap,
        record: &csv::StringRecord,
    ) -> Result<OhlcvBar, EngulfError> {
        let field = |index: usize, name: &str| {
            record
                .get(index)
                .ok_or_else(|| self.data_error(format!("row too short, no '{name}' field")))
        };
        let number = |index: usize, name: &str| -> Result<f64, EngulfError> {
            field(index, name)?
                .trim()
                .parse()
                .map_err(|e| self.data_error(format!("invalid {name} value: {e}")))
        };

        let date_str = field(columns.date, "date")?.trim();
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|e| self.data_error(format!("invalid date '{date_str}': {e}")))?;

        let volume = match columns.volume {
            Some(index) => field(index, "volume")?
                .trim()
                .parse()
                .map_err(|e| self.data_error(format!("invalid volume value: {e}")))?,
            None => 0,
        };

        Ok(OhlcvBar {
            date,
            open: number(columns.open, "open")?,
            high: number(columns.high, "high")?,
            low: number(columns.low, "low")?,
            close: number(columns.close, "close")?,
            volume,
        })
    }

    fn read_bars(&self) -> Result<Vec<OhlcvBar>, EngulfError> {
        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| self.data_error(format!("cannot open: {e}")))?;

        let headers = reader
            .headers()
            .map_err(|e| self.data_error(format!("cannot read header: {e}")))?
            .clone();
        let columns = self.map_columns(&headers)?;

        let mut bars = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| self.data_error(format!("CSV parse error: {e}")))?;
            bars.push(self.parse_bar(&columns, &record)?);
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn load_series(&self, start_date: Option<NaiveDate>) -> Result<PriceSeries, EngulfError> {
        let series = PriceSeries::new(self.read_bars()?)?;
        match start_date {
            Some(start) => series.from_date(start),
            None => Ok(series),
        }
    }

    fn data_range(&self) -> Result<(NaiveDate, NaiveDate, usize), EngulfError> {
        let series = self.load_series(None)?;
        Ok((series.first_date(), series.last_date(), series.len()))
    }
}
