//! Report output port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::EngulfError;
use crate::domain::metrics::Metrics;

/// Port for writing backtest result artifacts.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        metrics: &Metrics,
        output_prefix: &str,
    ) -> Result<(), EngulfError>;
}
