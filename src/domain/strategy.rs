//! Strategy selection and composition.

use super::pattern::{detect_engulfing, detect_engulfing_filtered, PatternFlags};
use super::series::PriceSeries;
use super::signal::{ma_crossover_signals, signals_from_flags, Signal};

/// Which signal generator drives the backtest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Plain two-bar engulfing.
    Engulfing,
    /// Engulfing gated on a three-bar close decline. The primary strategy.
    FilteredEngulfing,
    /// Short-over-long SMA crossover.
    MaCrossover,
}

impl StrategyKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "engulfing" => Some(StrategyKind::Engulfing),
            "filtered_engulfing" => Some(StrategyKind::FilteredEngulfing),
            "ma_crossover" => Some(StrategyKind::MaCrossover),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StrategyKind::Engulfing => "engulfing",
            StrategyKind::FilteredEngulfing => "filtered_engulfing",
            StrategyKind::MaCrossover => "ma_crossover",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Strategy {
    pub name: String,
    pub kind: StrategyKind,
    pub short_window: usize,
    pub long_window: usize,
}

impl Strategy {
    /// Pattern flags for the series. The MA strategy classifies no
    /// candles, so every flag is false there.
    pub fn pattern_flags(&self, series: &PriceSeries) -> Vec<PatternFlags> {
        match self.kind {
            StrategyKind::Engulfing => detect_engulfing(series),
            StrategyKind::FilteredEngulfing => detect_engulfing_filtered(series),
            StrategyKind::MaCrossover => vec![PatternFlags::default(); series.len()],
        }
    }

    /// One signal per bar, aligned with the series.
    pub fn signals(&self, series: &PriceSeries) -> Vec<Signal> {
        match self.kind {
            StrategyKind::Engulfing | StrategyKind::FilteredEngulfing => {
                signals_from_flags(&self.pattern_flags(series))
            }
            StrategyKind::MaCrossover => {
                ma_crossover_signals(series, self.short_window, self.long_window)
            }
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy {
            name: "Engulfing".into(),
            kind: StrategyKind::FilteredEngulfing,
            short_window: 5,
            long_window: 15,
        }
    }
}
