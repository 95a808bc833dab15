// =============================================================================
// Series Statistics
// =============================================================================
//
// Summary numbers shown under the chart for ranges of a year or longer.
//
//   volatility   = sample σ(returns) * √252
//   max_drawdown = min over t of (close_t - max_{s≤t} close_s) / max_{s≤t} close_s
//   sharpe       = √252 * mean(returns - rf/252) / sample σ(returns)
//
// Quantities that need at least two returns or a non-zero σ are `None` when
// those conditions are not met.

use serde::Serialize;

use crate::types::TimeSeriesDataset;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStatistics {
    pub all_time_high: Option<f64>,
    pub all_time_low: Option<f64>,
    pub avg_daily_volume: Option<f64>,
    pub volatility: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub trading_days: usize,
}

impl SeriesStatistics {
    pub fn from_dataset(dataset: &TimeSeriesDataset, risk_free_rate: f64) -> Self {
        let closes = dataset.closes();
        let returns = daily_returns(&closes);

        let all_time_high = dataset
            .prices
            .iter()
            .map(|b| b.high)
            .reduce(f64::max);
        let all_time_low = dataset.prices.iter().map(|b| b.low).reduce(f64::min);

        let avg_daily_volume = if dataset.is_empty() {
            None
        } else {
            let total: f64 = dataset.volumes.iter().map(|v| v.volume as f64).sum();
            Some(total / dataset.volumes.len() as f64)
        };

        let std = sample_std(&returns);
        let volatility = std.map(|s| s * TRADING_DAYS_PER_YEAR.sqrt());

        let sharpe_ratio = std.filter(|s| *s > 0.0).map(|s| {
            let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;
            let excess_mean =
                returns.iter().map(|r| r - daily_rf).sum::<f64>() / returns.len() as f64;
            TRADING_DAYS_PER_YEAR.sqrt() * excess_mean / s
        });

        Self {
            all_time_high,
            all_time_low,
            avg_daily_volume,
            volatility,
            max_drawdown: max_drawdown(&closes),
            sharpe_ratio,
            trading_days: dataset.len(),
        }
    }
}

/// Fractional change between consecutive closes. One shorter than `closes`.
///
/// A zero previous close yields a zero return.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| if w[0] == 0.0 { 0.0 } else { (w[1] - w[0]) / w[0] })
        .collect()
}

/// Worst peak-to-trough decline as a non-positive fraction.
pub fn max_drawdown(closes: &[f64]) -> Option<f64> {
    let mut peak = *closes.first()?;
    let mut worst = 0.0_f64;
    for &close in closes {
        peak = peak.max(close);
        if peak > 0.0 {
            worst = worst.min((close - peak) / peak);
        }
    }
    Some(worst)
}

/// Sample standard deviation (n - 1 denominator).
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(var.sqrt())
}
