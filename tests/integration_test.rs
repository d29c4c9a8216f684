//! Full-pipeline integration tests: detector → signals → simulator →
//! metrics, plus simulator invariants under proptest.

mod common;

use approx::assert_relative_eq;
use common::*;
use engulfbt::adapters::csv_adapter::CsvAdapter;
use engulfbt::domain::backtest::{run_backtest, BacktestConfig};
use engulfbt::domain::metrics::Metrics;
use engulfbt::domain::pattern::detect_engulfing_filtered;
use engulfbt::domain::position::TradeReason;
use engulfbt::domain::signal::{signals_from_flags, Signal};
use engulfbt::domain::strategy::Strategy;
use engulfbt::ports::data_port::DataPort;
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

mod primary_strategy_pipeline {
    use super::*;

    /// Decline into an engulfing up-candle: the position opens at the
    /// next bar's open, sized from the configured fraction of balance.
    #[test]
    fn decline_then_engulfing_enters_next_open() {
        let series = make_series(vec![
            make_bar(0, 101.0, 100.0),
            make_bar(1, 91.0, 90.0),
            make_bar(2, 81.0, 80.0),
            make_bar(3, 72.0, 70.0),
            make_bar(4, 65.0, 75.0),
            make_bar(5, 76.0, 76.5),
        ]);

        let flags = detect_engulfing_filtered(&series);
        assert!(flags[4].bullish_engulfing);

        let signals = signals_from_flags(&flags);
        assert_eq!(signals[4], Signal::Buy);

        let config = sample_config();
        let result = run_backtest(&series, &signals, &config).unwrap();
        let account = result.account;

        let entry = &account.trades[0];
        assert_eq!(entry.date, date(2024, 8, 6));
        assert!((entry.price - 76.0).abs() < f64::EPSILON);
        assert_eq!(entry.reason, TradeReason::BullishEngulfing);
        // 1_000_000 * 0.3 = 300_000 allocated; 300_000 / 76 floors to 3947
        assert_eq!(entry.quantity, 3947);

        // still open at the end, so the run closes it at 76.5
        let exit = account.trades.last().unwrap();
        assert_eq!(exit.reason, TradeReason::EndOfBacktest);
        assert!((exit.price - 76.5).abs() < f64::EPSILON);
        assert!(account.is_flat());
    }

    #[test]
    fn take_profit_round_trip_through_detector() {
        // engulfing after a decline, a quiet entry bar, then a close 6%
        // above the entry open
        let series = make_series(vec![
            make_bar(0, 101.0, 100.0),
            make_bar(1, 91.0, 90.0),
            make_bar(2, 81.0, 80.0),
            make_bar(3, 72.0, 70.0),
            make_bar(4, 65.0, 75.0),
            make_bar(5, 76.0, 77.0),
            make_bar(6, 77.0, 80.6),
        ]);
        let strategy = Strategy::default();
        let signals = strategy.signals(&series);
        let result = run_backtest(&series, &signals, &sample_config()).unwrap();
        let account = result.account;

        assert_eq!(account.trades.len(), 2);
        let exit = &account.trades[1];
        assert_eq!(exit.reason, TradeReason::TakeProfit);
        // (80.6 - 76) / 76 = 6.05% >= 5%
        assert!((exit.price - 80.6).abs() < f64::EPSILON);

        // realized cash equals final equity exactly once flat
        let final_equity = account.equity_curve.last().unwrap().equity;
        assert_relative_eq!(final_equity, account.balance, epsilon = 1e-9);
    }

    #[test]
    fn equity_curve_and_exposure_cover_every_bar() {
        let series = make_series(vec![
            make_bar(0, 101.0, 100.0),
            make_bar(1, 91.0, 90.0),
            make_bar(2, 81.0, 80.0),
            make_bar(3, 72.0, 70.0),
            make_bar(4, 65.0, 75.0),
            make_bar(5, 76.0, 76.5),
            make_bar(6, 76.5, 77.0),
        ]);
        let strategy = Strategy::default();
        let signals = strategy.signals(&series);
        let result = run_backtest(&series, &signals, &sample_config()).unwrap();
        let account = result.account;

        assert_eq!(account.equity_curve.len(), series.len());
        assert_eq!(account.exposure_curve.len(), series.len());
        assert!((account.equity_curve[0].equity - 1_000_000.0).abs() < f64::EPSILON);

        // exposure is zero while flat and positive while the lot is held
        assert!((account.exposure_curve[0] - 0.0).abs() < f64::EPSILON);
        assert!(account.exposure_curve[5] > 0.0);
    }
}

mod csv_pipeline {
    use super::*;

    fn run_from_csv(content: &str) -> (Metrics, usize) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prices.csv");
        fs::write(&path, content).unwrap();

        let series = CsvAdapter::new(path).load_series(None).unwrap();
        let strategy = Strategy::default();
        let signals = strategy.signals(&series);
        let result = run_backtest(&series, &signals, &sample_config()).unwrap();
        (Metrics::compute(&result.account), result.account.trades.len())
    }

    #[test]
    fn end_to_end_from_capitalized_csv() {
        // same decline-and-engulf shape as the in-memory tests
        let csv = "Date,Open,High,Low,Close,Volume\n\
            2024-08-01,101.0,102.0,99.0,100.0,1000\n\
            2024-08-02,91.0,92.0,89.0,90.0,1000\n\
            2024-08-05,81.0,82.0,79.0,80.0,1000\n\
            2024-08-06,72.0,73.0,69.0,70.0,1000\n\
            2024-08-07,65.0,76.0,64.0,75.0,1000\n\
            2024-08-08,76.0,81.0,75.0,80.6,1000\n";
        let (metrics, trade_count) = run_from_csv(csv);

        assert_eq!(trade_count, 2);
        assert_eq!(metrics.round_trips, 1);
        assert_eq!(metrics.trades_won, 1);
        assert!(metrics.final_equity > 1_000_000.0);
        assert!((metrics.win_rate - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quiet_market_produces_no_trades() {
        let csv = "date,open,high,low,close\n\
            2024-08-01,100.0,101.0,99.0,100.5\n\
            2024-08-02,100.5,101.5,99.5,100.2\n\
            2024-08-05,100.2,101.0,99.8,100.4\n\
            2024-08-06,100.4,101.2,99.9,100.3\n";
        let (metrics, trade_count) = run_from_csv(csv);

        assert_eq!(trade_count, 0);
        assert!((metrics.final_equity - 1_000_000.0).abs() < f64::EPSILON);
        assert!((metrics.max_drawdown - 0.0).abs() < f64::EPSILON);
    }
}

mod ledger_discipline {
    use super::*;

    fn assert_ledger_alternates(trades: &[engulfbt::domain::position::Trade]) {
        let mut expecting_entry = true;
        for trade in trades {
            if expecting_entry {
                assert!(trade.reason.is_entry(), "expected entry, got {:?}", trade.reason);
            } else {
                assert!(trade.reason.is_exit(), "expected exit, got {:?}", trade.reason);
            }
            expecting_entry = !expecting_entry;
        }
        // a closed ledger has even length
        assert!(trades.len() % 2 == 0, "ledger left an open entry");
    }

    #[test]
    fn entries_and_exits_alternate_over_many_signals() {
        // a sawtooth that repeatedly triggers the stop-loss
        let closes: Vec<f64> = (0..40)
            .map(|i| if i % 2 == 0 { 100.0 } else { 95.0 })
            .collect();
        let series = series_from_closes(&closes);
        // force a buy signal on every bar; the simulator's own state
        // machine must keep the ledger alternating
        let signals = vec![Signal::Buy; series.len()];
        let result = run_backtest(&series, &signals, &sample_config()).unwrap();

        assert_ledger_alternates(&result.account.trades);
        assert!(result.account.is_flat());
    }
}

mod simulator_invariants {
    use super::*;

    proptest! {
        #[test]
        fn invariants_hold_for_random_walks(
            closes in proptest::collection::vec(10.0f64..500.0, 5..60),
            signal_seed in proptest::collection::vec(0u8..3, 5..60),
        ) {
            let series = series_from_closes(&closes);
            let signals: Vec<Signal> = (0..series.len())
                .map(|i| match signal_seed[i % signal_seed.len()] {
                    0 => Signal::Hold,
                    1 => Signal::Buy,
                    _ => Signal::Sell,
                })
                .collect();

            let config = BacktestConfig::default();
            let result = run_backtest(&series, &signals, &config).unwrap();

            // determinism
            let again = run_backtest(&series, &signals, &config).unwrap();
            prop_assert_eq!(&result, &again);

            let account = &result.account;

            // one equity point and one exposure ratio per bar
            prop_assert_eq!(account.equity_curve.len(), series.len());
            prop_assert_eq!(account.exposure_curve.len(), series.len());

            // bar 0 seeds the curve with the initial balance
            prop_assert!((account.equity_curve[0].equity - config.initial_balance).abs() < 1e-9);

            // the run always ends flat with a zero-exposure ledger
            prop_assert!(account.is_flat());
            let entries = account.trades.iter().filter(|t| t.reason.is_entry()).count();
            let exits = account.trades.iter().filter(|t| t.reason.is_exit()).count();
            prop_assert_eq!(entries, exits);

            // every trade moved a positive whole quantity
            prop_assert!(account.trades.iter().all(|t| t.quantity > 0));
        }
    }
}
