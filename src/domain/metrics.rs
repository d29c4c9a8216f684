//! Summary statistics over the equity curve and trade ledger.

use super::account::{Account, EquityPoint};
use super::position::Trade;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub final_equity: f64,
    pub total_return: f64,
    /// Worst peak-to-trough decline, as a positive fraction of the peak.
    pub max_drawdown: f64,
    /// mean(daily return) / stdev(daily return) * sqrt(252).
    pub sharpe_ratio: f64,
    pub round_trips: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub win_rate: f64,
}

impl Metrics {
    pub fn compute(account: &Account) -> Self {
        let final_equity = account
            .equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(account.initial_balance);

        let total_return = if account.initial_balance > 0.0 {
            (final_equity - account.initial_balance) / account.initial_balance
        } else {
            0.0
        };

        let max_drawdown = compute_drawdown(&account.equity_curve);
        let sharpe_ratio = compute_sharpe(&account.equity_curve);

        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        for (entry, exit) in round_trips(&account.trades) {
            let pnl = exit.quantity as f64 * (exit.price - entry.price);
            if pnl > 0.0 {
                trades_won += 1;
            } else if pnl < 0.0 {
                trades_lost += 1;
            } else {
                trades_breakeven += 1;
            }
        }

        let round_trip_count = trades_won + trades_lost + trades_breakeven;
        let win_rate = if round_trip_count > 0 {
            trades_won as f64 / round_trip_count as f64
        } else {
            0.0
        };

        Metrics {
            final_equity,
            total_return,
            max_drawdown,
            sharpe_ratio,
            round_trips: round_trip_count,
            trades_won,
            trades_lost,
            trades_breakeven,
            win_rate,
        }
    }
}

/// Pair each exit with the entry before it. The ledger alternates by
/// construction, so a simple scan suffices.
fn round_trips(trades: &[Trade]) -> impl Iterator<Item = (&Trade, &Trade)> {
    trades.windows(2).filter_map(|pair| {
        if pair[0].reason.is_entry() && pair[1].reason.is_exit() {
            Some((&pair[0], &pair[1]))
        } else {
            None
        }
    })
}

fn compute_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

fn compute_sharpe(equity_curve: &[EquityPoint]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = equity_curve
        .windows(2)
        .map(|w| {
            let prev = w[0].equity;
            if prev > 0.0 {
                (w[1].equity - prev) / prev
            } else {
                0.0
            }
        })
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        (mean / stddev) * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    }
}
