// =============================================================================
// Relative Strength Index (RSI): fixed-window simple average
// =============================================================================
//
// Step 1: Compute price changes (deltas) over the whole close series.
// Step 2: Split into gains (positive deltas, else 0) and losses (magnitude of
//          negative deltas, else 0).
// Step 3: avg_gain / avg_loss = simple mean of the last `period` gains /
//          losses. No Wilder smoothing.
// Step 4: RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// A zero average loss means RS is unbounded; RSI is exactly 100.0 then.
//
// `calculate_rsi_series` applies the same rule at every index that has a full
// window of `period` deltas behind it, so its last entry matches
// `calculate_rsi` whenever the series is longer than `period`.
// =============================================================================

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Current RSI value for `closes`.
///
/// # Edge cases
/// - Fewer than two closes, or `period == 0` => `None` (no deltas to average)
/// - `closes.len() < period + 1` => averages over the shorter delta window
/// - Average loss of zero (including a flat series) => `100.0`
pub fn calculate_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < 2 {
        return None;
    }

    let deltas = price_deltas(closes);
    let window = &deltas[deltas.len().saturating_sub(period)..];
    Some(rsi_over_window(window))
}

/// Index-aligned RSI series.
///
/// Entry `i` is `None` until `i >= period` (there are `period` deltas ending
/// at `i`), then the RSI of those deltas.
pub fn calculate_rsi_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let deltas = price_deltas(closes);
    for i in period..closes.len() {
        out[i] = Some(rsi_over_window(&deltas[i - period..i]));
    }
    out
}

/// Convenience function: return the most recent RSI value together with a
/// human-readable label.
pub fn current_rsi(closes: &[f64], period: usize) -> Option<(f64, &'static str)> {
    let value = calculate_rsi(closes, period)?;

    let label = if value >= 70.0 {
        "OVERBOUGHT"
    } else if value <= 30.0 {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    };

    Some((value, label))
}

// =============================================================================
// Internal helpers
// =============================================================================

fn price_deltas(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| w[1] - w[0]).collect()
}

fn rsi_over_window(window: &[f64]) -> f64 {
    let (sum_gain, sum_loss) = window.iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l + d.abs())
        }
    });

    let n = window.len() as f64;
    rsi_from_averages(sum_gain / n, sum_loss / n)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
