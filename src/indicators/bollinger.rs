// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the population standard deviation
// of the same trailing window.

use serde::Serialize;

pub const DEFAULT_BOLLINGER_PERIOD: usize = 20;
pub const DEFAULT_BOLLINGER_STD: f64 = 2.0;

/// Bands for a single index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerBand {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Compute bands for the window ending at the last element of `window`.
fn band_for_window(window: &[f64], num_std: f64) -> BollingerBand {
    let n = window.len() as f64;
    let middle = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    BollingerBand {
        upper: middle + num_std * std_dev,
        middle,
        lower: middle - num_std * std_dev,
    }
}

/// Index-aligned Bollinger series; `None` until a full window exists.
pub fn calculate_bollinger_series(
    closes: &[f64],
    period: usize,
    num_std: f64,
) -> Vec<Option<BollingerBand>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    (0..closes.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                Some(band_for_window(&closes[i + 1 - period..=i], num_std))
            }
        })
        .collect()
}
