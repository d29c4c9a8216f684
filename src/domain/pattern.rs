//! Engulfing-pattern detection.
//!
//! Two detectors over the same body-containment test:
//! - [`detect_engulfing`]: plain two-bar rule, opposite candle directions
//!   plus strict body containment on both ends.
//! - [`detect_engulfing_filtered`]: the two-bar rule gated on a strict
//!   close decline over the three bars preceding the pattern bar. The
//!   bullish flag requires the decline; the bearish flag requires its
//!   absence (not an incline — literally "no decline into this bar").

use super::ohlcv::OhlcvBar;
use super::series::PriceSeries;

/// Per-bar pattern classification, aligned with the source series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternFlags {
    pub bullish_engulfing: bool,
    pub bearish_engulfing: bool,
}

/// Current body strictly contains the previous body on both ends.
fn engulfs(current: &OhlcvBar, previous: &OhlcvBar) -> bool {
    current.body_high() > previous.body_high() && current.body_low() < previous.body_low()
}

/// Strictly falling closes over the three bars before `i`:
/// close[i-3] > close[i-2] > close[i-1].
fn three_bar_downtrend(bars: &[OhlcvBar], i: usize) -> bool {
    i >= 3
        && bars[i - 3].close > bars[i - 2].close
        && bars[i - 2].close > bars[i - 1].close
}

/// Two-bar engulfing scan. Bar 0 has no predecessor and gets both flags false.
pub fn detect_engulfing(series: &PriceSeries) -> Vec<PatternFlags> {
    let bars = series.bars();
    let mut flags = vec![PatternFlags::default(); bars.len()];

    for i in 1..bars.len() {
        let current = &bars[i];
        let previous = &bars[i - 1];
        if !engulfs(current, previous) {
            continue;
        }
        flags[i] = PatternFlags {
            bullish_engulfing: current.is_bullish() && previous.is_bearish(),
            bearish_engulfing: current.is_bearish() && previous.is_bullish(),
        };
    }

    flags
}

/// Downtrend-gated engulfing scan. The first three bars have insufficient
/// history and get both flags false.
pub fn detect_engulfing_filtered(series: &PriceSeries) -> Vec<PatternFlags> {
    let bars = series.bars();
    let mut flags = vec![PatternFlags::default(); bars.len()];

    for i in 3..bars.len() {
        let current = &bars[i];
        let previous = &bars[i - 1];
        if !engulfs(current, previous) {
            continue;
        }
        let downtrend = three_bar_downtrend(bars, i);
        flags[i] = PatternFlags {
            bullish_engulfing: downtrend && current.is_bullish() && previous.is_bearish(),
            bearish_engulfing: !downtrend && current.is_bearish() && previous.is_bullish(),
        };
    }

    flags
}
