//! CSV report adapter: equity curve and trade ledger files.

use std::path::PathBuf;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::EngulfError;
use crate::domain::metrics::Metrics;
use crate::ports::report_port::ReportPort;

/// Writes `<prefix>_equity.csv` and `<prefix>_trades.csv`.
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    fn write_equity(&self, result: &BacktestResult, path: &PathBuf) -> Result<(), EngulfError> {
        let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
        writer
            .write_record(["date", "equity", "exposure"])
            .map_err(csv_error)?;

        let account = &result.account;
        for (point, exposure) in account.equity_curve.iter().zip(&account.exposure_curve) {
            writer
                .write_record([
                    point.date.to_string(),
                    format!("{:.2}", point.equity),
                    format!("{:.4}", exposure),
                ])
                .map_err(csv_error)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_trades(&self, result: &BacktestResult, path: &PathBuf) -> Result<(), EngulfError> {
        let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
        writer
            .write_record(["date", "side", "quantity", "price", "reason"])
            .map_err(csv_error)?;

        for trade in &result.account.trades {
            writer
                .write_record([
                    trade.date.to_string(),
                    trade.side.label().to_string(),
                    trade.quantity.to_string(),
                    format!("{:.4}", trade.price),
                    trade.reason.label().to_string(),
                ])
                .map_err(csv_error)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn csv_error(err: csv::Error) -> EngulfError {
    EngulfError::data(format!("CSV write error: {err}"))
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        _metrics: &Metrics,
        output_prefix: &str,
    ) -> Result<(), EngulfError> {
        self.write_equity(result, &PathBuf::from(format!("{output_prefix}_equity.csv")))?;
        self.write_trades(result, &PathBuf::from(format!("{output_prefix}_trades.csv")))?;
        Ok(())
    }
}
