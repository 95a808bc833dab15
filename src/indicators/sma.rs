// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Trailing, unweighted mean over the last `period` closes:
//   SMA_i = (close_{i-period+1} + ... + close_i) / period
//
// The output is aligned index-for-index with the input. Positions without a
// full window are `None`.
// =============================================================================

/// Compute the trailing SMA series for `closes`.
///
/// # Edge cases
/// - `period == 0` => every entry is `None`
/// - `closes.len() < period` => every entry is `None`
pub fn calculate_sma(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    let period_f = period as f64;
    closes
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < period {
                None
            } else {
                let window = &closes[i + 1 - period..=i];
                Some(window.iter().sum::<f64>() / period_f)
            }
        })
        .collect()
}
