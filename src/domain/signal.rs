//! Trading signal generation.

use super::pattern::PatternFlags;
use super::series::PriceSeries;

/// Per-bar directional intent. The simulator observes the signal with a
/// one-bar lag: yesterday's signal drives today's trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl Signal {
    /// +1 buy, -1 sell, 0 none.
    pub fn value(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::Hold => 0,
        }
    }
}

/// Map pattern flags to signals, bar for bar. Bullish wins if a detector
/// ever produced both flags at once.
pub fn signals_from_flags(flags: &[PatternFlags]) -> Vec<Signal> {
    flags
        .iter()
        .map(|f| {
            if f.bullish_engulfing {
                Signal::Buy
            } else if f.bearish_engulfing {
                Signal::Sell
            } else {
                Signal::Hold
            }
        })
        .collect()
}

/// Moving-average crossover signals: Buy while the short SMA is above the
/// long SMA, Sell while it is at or below, Hold until both windows fill.
pub fn ma_crossover_signals(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> Vec<Signal> {
    let bars = series.bars();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let short = rolling_mean(&closes, short_window);
    let long = rolling_mean(&closes, long_window);

    (0..bars.len())
        .map(|i| match (short[i], long[i]) {
            (Some(s), Some(l)) if s > l => Signal::Buy,
            (Some(_), Some(_)) => Signal::Sell,
            _ => Signal::Hold,
        })
        .collect()
}

/// Simple moving average over a trailing window; `None` until the window
/// is full.
fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, &value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        if window > 0 && i + 1 >= window {
            out.push(Some(sum / window as f64));
        } else {
            out.push(None);
        }
    }
    out
}
