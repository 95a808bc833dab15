// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices than the Simple Moving Average.
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = (close_t - EMA_{t-1}) * multiplier + EMA_{t-1}
//
// The seed is the SMA of the first `period` closes; smoothing starts at index
// `period`. `calculate_ema` reports the final value; `calculate_ema_series`
// reports every value from the seed onward, index-aligned with the closes.
// =============================================================================

/// Compute the final EMA value over the whole of `closes`.
///
/// Returns `None` when there is nothing to average (`closes` empty or
/// `period == 0`).
///
/// # Short input
/// Callers are expected to supply at least `period` closes. With fewer, the
/// seed is the mean of every available close and no smoothing step runs; the
/// value is still returned.
pub fn calculate_ema(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.is_empty() {
        return None;
    }

    let seed_len = period.min(closes.len());
    let mut ema = closes[..seed_len].iter().sum::<f64>() / seed_len as f64;

    let multiplier = 2.0 / (period + 1) as f64;
    for &close in closes.iter().skip(period) {
        ema = (close - ema) * multiplier + ema;
    }

    Some(ema)
}

/// Index-aligned EMA series. Entries before `period - 1` are `None`; entry
/// `period - 1` is the seed mean.
///
/// Unlike [`calculate_ema`] there is no short-input fallback: with fewer than
/// `period` closes every entry is `None`.
pub fn calculate_ema_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return out;
    }

    let mut ema = closes[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(ema);

    let multiplier = 2.0 / (period + 1) as f64;
    for (i, &close) in closes.iter().enumerate().skip(period) {
        ema = (close - ema) * multiplier + ema;
        out[i] = Some(ema);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_none());
    }

    #[test]
    fn ema_period_zero() {
        assert!(calculate_ema(&[1.0, 2.0, 3.0], 0).is_none());
    }

    #[test]
    fn ema_period_equals_length_is_seed_mean() {
        let closes = [2.0, 4.0, 6.0];
        let ema = calculate_ema(&closes, 3).unwrap();
        assert!((ema - 4.0).abs() < 1e-12);
    }

    #[test]
    fn ema_known_values() {
        // 5-period EMA of [1..=10]: seed 3.0, multiplier 1/3.
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let mult = 2.0 / 6.0;
        let mut expected = 3.0;
        for &c in &closes[5..] {
            expected = (c - expected) * mult + expected;
        }
        let ema = calculate_ema(&closes, 5).unwrap();
        assert!((ema - expected).abs() < 1e-12, "got {ema}, expected {expected}");
    }

    #[test]
    fn ema_short_input_averages_available_window() {
        let ema = calculate_ema(&[1.0, 2.0], 5).unwrap();
        assert!((ema - 1.5).abs() < 1e-12);
    }

    #[test]
    fn ema_of_constant_series_is_constant() {
        let closes = vec![42.0; 100];
        let ema = calculate_ema(&closes, 12).unwrap();
        assert!((ema - 42.0).abs() < 1e-9);
    }

    #[test]
    fn ema_series_warmup_and_tail() {
        let closes: Vec<f64> = (0..40).map(|i| 20.0 + (i as f64 * 0.3).sin()).collect();
        let series = calculate_ema_series(&closes, 10);
        assert_eq!(series.len(), 40);
        assert_eq!(series.iter().take_while(|v| v.is_none()).count(), 9);
        assert!(series[9..].iter().all(Option::is_some));

        let seed = closes[..10].iter().sum::<f64>() / 10.0;
        assert_eq!(series[9], Some(seed));
        assert_eq!(series[39], calculate_ema(&closes, 10));
    }

    #[test]
    fn ema_series_short_input_is_all_none() {
        assert_eq!(calculate_ema_series(&[1.0, 2.0], 5), vec![None, None]);
        assert_eq!(calculate_ema_series(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn ema_is_deterministic() {
        let closes: Vec<f64> = (0..200).map(|i| 100.0 + (i as f64 * 0.37).sin()).collect();
        let a = calculate_ema(&closes, 26).unwrap();
        let b = calculate_ema(&closes, 26).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
