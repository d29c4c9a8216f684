//! Price-data access port trait.

use chrono::NaiveDate;

use crate::domain::error::EngulfError;
use crate::domain::series::PriceSeries;

pub trait DataPort {
    /// Load the full validated series, optionally filtered to bars on or
    /// after `start_date`.
    fn load_series(&self, start_date: Option<NaiveDate>) -> Result<PriceSeries, EngulfError>;

    /// First date, last date and bar count of the underlying data.
    fn data_range(&self) -> Result<(NaiveDate, NaiveDate, usize), EngulfError>;
}
