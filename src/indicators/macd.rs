// =============================================================================
// MACD
// =============================================================================
//
// MACD = EMA(fast) - EMA(slow), with both EMAs computed independently over
// the full close history using the SMA-seeded rule in `ema`.
//
// `calculate_macd` is the single "current MACD" scalar shown in the summary.
// `calculate_macd_series` adds the index-aligned panel data:
//
//   line      = EMA_fast_i - EMA_slow_i        defined from max(fast, slow) - 1
//   signal    = EMA(line, signal_period)       defined signal_period - 1 later
//   histogram = line - signal
// =============================================================================

use serde::Serialize;

use super::ema::{calculate_ema, calculate_ema_series};

pub const DEFAULT_FAST_PERIOD: usize = 12;
pub const DEFAULT_SLOW_PERIOD: usize = 26;
pub const DEFAULT_SIGNAL_PERIOD: usize = 9;

/// Current MACD value for `closes`.
///
/// Returns `None` when either EMA is undefined (empty input or a zero period).
pub fn calculate_macd(closes: &[f64], fast_period: usize, slow_period: usize) -> Option<f64> {
    let fast = calculate_ema(closes, fast_period)?;
    let slow = calculate_ema(closes, slow_period)?;
    Some(fast - slow)
}

/// MACD line, signal line and histogram, each the same length as the closes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSeries {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub fn calculate_macd_series(
    closes: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdSeries {
    let fast = calculate_ema_series(closes, fast_period);
    let slow = calculate_ema_series(closes, slow_period);

    let line: Vec<Option<f64>> = fast
        .iter()
        .zip(&slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    // Defined line values are contiguous from the first one onward.
    let mut signal = vec![None; closes.len()];
    if let Some(start) = line.iter().position(Option::is_some) {
        let defined: Vec<f64> = line[start..].iter().flatten().copied().collect();
        for (offset, value) in calculate_ema_series(&defined, signal_period)
            .into_iter()
            .enumerate()
        {
            signal[start + offset] = value;
        }
    }

    let histogram = line
        .iter()
        .zip(&signal)
        .map(|(l, s)| Some((*l)? - (*s)?))
        .collect();

    MacdSeries {
        line,
        signal,
        histogram,
    }
}
