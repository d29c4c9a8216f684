//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{defaults, run_backtest, BacktestConfig};
use crate::domain::config_validation::validate_run_config;
use crate::domain::error::EngulfError;
use crate::domain::metrics::Metrics;
use crate::domain::strategy::{Strategy, StrategyKind};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "engulfbt", about = "Engulfing-pattern strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the CSV data path from the config file
        #[arg(long)]
        data: Option<PathBuf>,
        /// Prefix for the equity/trade CSV outputs
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Validate a run configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the date range of a data file
    Info {
        #[arg(long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            data,
            output,
        } => run_backtest_command(&config, data.as_ref(), output.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { data } => run_info(&data),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, EngulfError> {
    let start_date = match adapter.get_string("data", "start_date") {
        Some(s) => Some(NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
            EngulfError::ConfigInvalid {
                section: "data".into(),
                key: "start_date".into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }
        })?),
        None => None,
    };

    let config = BacktestConfig {
        initial_balance: adapter.get_float("backtest", "initial_balance", defaults::INITIAL_BALANCE),
        allocation_fraction: adapter.get_float(
            "backtest",
            "allocation_fraction",
            defaults::ALLOCATION_FRACTION,
        ),
        take_profit_threshold: adapter.get_float("backtest", "take_profit", defaults::TAKE_PROFIT),
        stop_loss_threshold: adapter.get_float("backtest", "stop_loss", defaults::STOP_LOSS),
        start_date,
    };
    config.validate()?;
    Ok(config)
}

pub fn build_strategy(adapter: &dyn ConfigPort) -> Result<Strategy, EngulfError> {
    let kind_str = adapter
        .get_string("strategy", "kind")
        .unwrap_or_else(|| "filtered_engulfing".to_string());
    let kind = StrategyKind::parse(&kind_str).ok_or_else(|| EngulfError::ConfigInvalid {
        section: "strategy".into(),
        key: "kind".into(),
        reason: format!("unknown strategy kind '{kind_str}'"),
    })?;

    Ok(Strategy {
        name: adapter
            .get_string("strategy", "name")
            .unwrap_or_else(|| kind.label().to_string()),
        kind,
        short_window: adapter.get_int("strategy", "short_window", 5) as usize,
        long_window: adapter.get_int("strategy", "long_window", 15) as usize,
    })
}

fn run_backtest_command(
    config_path: &PathBuf,
    data_override: Option<&PathBuf>,
    output_prefix: Option<&str>,
) -> ExitCode {
    // Stage 1: load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let strategy = match build_strategy(&adapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Strategy: {}", strategy.name);

    // Stage 2: resolve and load the price series
    let data_path = match data_override {
        Some(p) => p.clone(),
        None => match adapter.get_string("data", "path") {
            Some(p) => PathBuf::from(p),
            None => {
                eprintln!("error: missing config key [data] path");
                return ExitCode::from(2);
            }
        },
    };

    eprintln!("Loading prices from {}", data_path.display());
    let data_port = CsvAdapter::new(data_path);
    let series = match data_port.load_series(bt_config.start_date) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!(
        "  {} bars, {} to {}",
        series.len(),
        series.first_date(),
        series.last_date()
    );

    // Stage 3: signals and simulation
    let signals = strategy.signals(&series);
    let result = match run_backtest(&series, &signals, &bt_config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: metrics and console summary
    let metrics = Metrics::compute(&result.account);

    eprintln!("\n=== Results ===");
    eprintln!("Final Equity:   {:.2}", metrics.final_equity);
    eprintln!("Total Return:   {:.2}%", metrics.total_return * 100.0);
    eprintln!("Max Drawdown:   -{:.1}%", metrics.max_drawdown * 100.0);
    eprintln!("Sharpe Ratio:   {:.2}", metrics.sharpe_ratio);
    eprintln!("Round Trips:    {}", metrics.round_trips);
    eprintln!("Win Rate:       {:.1}%", metrics.win_rate * 100.0);

    if !result.account.trades.is_empty() {
        eprintln!("\n=== Trades ===");
        for trade in &result.account.trades {
            eprintln!(
                "  {}  {:4}  {:6} @ {:.2}  ({})",
                trade.date,
                trade.side.label(),
                trade.quantity,
                trade.price,
                trade.reason.label(),
            );
        }
    }

    // Stage 5: write report files
    let prefix = output_prefix.unwrap_or("backtest");
    match CsvReportAdapter.write(&result, &metrics, prefix) {
        Ok(()) => {
            eprintln!("\nReports written to: {prefix}_equity.csv, {prefix}_trades.csv");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let checks = validate_run_config(&adapter)
        .and_then(|()| build_backtest_config(&adapter).map(|_| ()))
        .and_then(|()| build_strategy(&adapter).map(|_| ()));

    match checks {
        Ok(()) => {
            eprintln!("Config OK: {}", config_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(data_path: &PathBuf) -> ExitCode {
    let data_port = CsvAdapter::new(data_path.clone());
    match data_port.data_range() {
        Ok((first, last, count)) => {
            eprintln!("{}: {} bars, {} to {}", data_path.display(), count, first, last);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
