//! Fail-fast validation of the run configuration.
//!
//! Every field is checked before any data is loaded. Validation reads
//! through [`ConfigPort`] so the checks apply to whichever config source
//! backs a run.

use chrono::NaiveDate;

use crate::domain::error::EngulfError;
use crate::domain::strategy::StrategyKind;
use crate::ports::config_port::ConfigPort;

use super::backtest::defaults;

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), EngulfError> {
    validate_data_path(config)?;
    validate_start_date(config)?;
    validate_initial_balance(config)?;
    validate_allocation_fraction(config)?;
    validate_thresholds(config)?;
    validate_strategy(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> EngulfError {
    EngulfError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), EngulfError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(EngulfError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_start_date(config: &dyn ConfigPort) -> Result<(), EngulfError> {
    match config.get_string("data", "start_date") {
        None => Ok(()),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(|_| ())
            .map_err(|_| {
                invalid(
                    "data",
                    "start_date",
                    "invalid date format, expected YYYY-MM-DD",
                )
            }),
    }
}

fn validate_initial_balance(config: &dyn ConfigPort) -> Result<(), EngulfError> {
    let value = config.get_float("backtest", "initial_balance", defaults::INITIAL_BALANCE);
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid("backtest", "initial_balance", "must be positive"));
    }
    Ok(())
}

fn validate_allocation_fraction(config: &dyn ConfigPort) -> Result<(), EngulfError> {
    let value = config.get_float(
        "backtest",
        "allocation_fraction",
        defaults::ALLOCATION_FRACTION,
    );
    if !(value > 0.0 && value <= 1.0) {
        return Err(invalid(
            "backtest",
            "allocation_fraction",
            "must be in (0, 1]",
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), EngulfError> {
    let take_profit = config.get_float("backtest", "take_profit", defaults::TAKE_PROFIT);
    let stop_loss = config.get_float("backtest", "stop_loss", defaults::STOP_LOSS);

    if !(take_profit.is_finite() && take_profit > 0.0) {
        return Err(invalid("backtest", "take_profit", "must be positive"));
    }
    if !(stop_loss.is_finite() && stop_loss < 0.0) {
        return Err(invalid("backtest", "stop_loss", "must be negative"));
    }
    if stop_loss >= take_profit {
        return Err(invalid("backtest", "stop_loss", "must be below take_profit"));
    }
    Ok(())
}

fn validate_strategy(config: &dyn ConfigPort) -> Result<(), EngulfError> {
    let kind_str = config
        .get_string("strategy", "kind")
        .unwrap_or_else(|| "filtered_engulfing".to_string());
    let kind = StrategyKind::parse(&kind_str).ok_or_else(|| {
        invalid(
            "strategy",
            "kind",
            "expected engulfing, filtered_engulfing or ma_crossover",
        )
    })?;

    if kind == StrategyKind::MaCrossover {
        let short = config.get_int("strategy", "short_window", 5);
        let long = config.get_int("strategy", "long_window", 15);
        if short <= 0 {
            return Err(invalid("strategy", "short_window", "must be positive"));
        }
        if long <= short {
            return Err(invalid(
                "strategy",
                "long_window",
                "must be greater than short_window",
            ));
        }
    }
    Ok(())
}
