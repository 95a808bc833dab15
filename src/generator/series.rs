// =============================================================================
// Series Generator: random-walk prices with i.i.d. emotion noise
// =============================================================================
//
// For each date, oldest first:
//   change = U(-volatility/2, +volatility/2)
//   open   = base,  close = base + change,  base = close
//   high   = max(open, close) + U(0, volatility)
//   low    = min(open, close) - U(0, volatility)
//   volume = U[volume_min, volume_max)
//   intensity[k] = U[0, 1) for every emotion k
//
// After the series, one emotion distribution is drawn:
//   distribution[k] = U[0, distribution_max)
//
// Each bar depends on the previous close, so the date axis is strictly
// sequential.
// =============================================================================

use std::collections::BTreeMap;

use anyhow::{ensure, Result};
use chrono::{Days, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{
    Direction, EmotionDistribution, EmotionKind, EmotionSample, PriceBar, TimeSeriesDataset,
    VolumeBar,
};

fn default_base_price() -> f64 {
    150.0
}

fn default_volatility() -> f64 {
    2.0
}

fn default_volume_min() -> u64 {
    500_000
}

fn default_volume_max() -> u64 {
    1_500_000
}

fn default_distribution_max() -> u32 {
    100
}

/// Tunable knobs of the synthetic market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorParams {
    /// Opening price of the oldest bar.
    #[serde(default = "default_base_price")]
    pub base_price: f64,

    /// Width of the daily change range and upper bound of the wick jitter.
    #[serde(default = "default_volatility")]
    pub volatility: f64,

    /// Inclusive lower bound of the daily volume.
    #[serde(default = "default_volume_min")]
    pub volume_min: u64,

    /// Exclusive upper bound of the daily volume.
    #[serde(default = "default_volume_max")]
    pub volume_max: u64,

    /// Exclusive upper bound of each emotion distribution count.
    #[serde(default = "default_distribution_max")]
    pub distribution_max: u32,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            base_price: default_base_price(),
            volatility: default_volatility(),
            volume_min: default_volume_min(),
            volume_max: default_volume_max(),
            distribution_max: default_distribution_max(),
        }
    }
}

impl GeneratorParams {
    /// Reject parameters the random walk cannot honour.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.base_price.is_finite(),
            "generator base_price must be finite, got {}",
            self.base_price
        );
        ensure!(
            self.volatility.is_finite() && self.volatility >= 0.0,
            "generator volatility must be finite and non-negative, got {}",
            self.volatility
        );
        ensure!(
            self.volume_min <= self.volume_max,
            "generator volume_min ({}) exceeds volume_max ({})",
            self.volume_min,
            self.volume_max
        );
        Ok(())
    }
}

/// Produces [`TimeSeriesDataset`]s from a set of [`GeneratorParams`].
///
/// The generator itself holds no mutable state; every call to
/// [`SeriesGenerator::generate`] yields an independent dataset.
#[derive(Debug, Clone, Default)]
pub struct SeriesGenerator {
    params: GeneratorParams,
}

impl SeriesGenerator {
    pub fn new(params: GeneratorParams) -> Self {
        Self { params }
    }

    /// Generate `days` consecutive daily entries ending on `today`.
    ///
    /// `days == 0` yields an empty dataset (the distribution is still drawn).
    pub fn generate<R: Rng>(
        &self,
        days: u32,
        today: NaiveDate,
        rng: &mut R,
    ) -> TimeSeriesDataset {
        let n = days as usize;
        let mut prices = Vec::with_capacity(n);
        let mut volumes = Vec::with_capacity(n);
        let mut emotions = Vec::with_capacity(n);

        let volatility = self.params.volatility;
        let mut base_price = self.params.base_price;

        // Dates before the representable calendar are clamped to its start;
        // only reachable with absurd day counts.
        let start = today
            .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
            .unwrap_or(NaiveDate::MIN);

        for date in start.iter_days().take(n) {
            let change = uniform_f64(rng, -volatility / 2.0, volatility / 2.0);
            let open = base_price;
            let close = base_price + change;
            base_price = close;

            let high = open.max(close) + uniform_f64(rng, 0.0, volatility);
            let low = open.min(close) - uniform_f64(rng, 0.0, volatility);

            let volume = uniform_u64(rng, self.params.volume_min, self.params.volume_max);

            let intensities: BTreeMap<EmotionKind, f64> = EmotionKind::ALL
                .into_iter()
                .map(|kind| (kind, rng.random::<f64>()))
                .collect();

            prices.push(PriceBar {
                date,
                open,
                high,
                low,
                close,
            });
            volumes.push(VolumeBar::new(date, volume, Direction::of(open, close)));
            emotions.push(EmotionSample { date, intensities });
        }

        let emotion_distribution = self.draw_distribution(rng);

        debug!(
            days,
            last_close = ?prices.last().map(|b| b.close),
            "synthetic dataset generated"
        );

        TimeSeriesDataset {
            prices,
            volumes,
            emotions,
            emotion_distribution,
        }
    }

    fn draw_distribution<R: Rng>(&self, rng: &mut R) -> EmotionDistribution {
        let max = u64::from(self.params.distribution_max);
        EmotionKind::ALL
            .into_iter()
            .map(|kind| (kind, uniform_u64(rng, 0, max) as u32))
            .collect()
    }
}

/// Half-open `U[lo, hi)`; collapses to `lo` when the range is empty.
fn uniform_f64<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

fn uniform_u64<R: Rng>(rng: &mut R, lo: u64, hi: u64) -> u64 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn generate(days: u32, seed: u64) -> TimeSeriesDataset {
        let mut rng = StdRng::seed_from_u64(seed);
        SeriesGenerator::default().generate(days, today(), &mut rng)
    }

    #[test]
    fn lengths_match_requested_days() {
        let ds = generate(180, 7);
        assert_eq!(ds.prices.len(), 180);
        assert_eq!(ds.volumes.len(), 180);
        assert_eq!(ds.emotions.len(), 180);
    }

    #[test]
    fn dates_are_consecutive_and_end_today() {
        let ds = generate(180, 7);
        assert_eq!(ds.prices.last().unwrap().date, today());
        for pair in ds.prices.windows(2) {
            assert_eq!(pair[0].date.succ_opt().unwrap(), pair[1].date);
        }
        for ((p, v), e) in ds.prices.iter().zip(&ds.volumes).zip(&ds.emotions) {
            assert_eq!(p.date, v.date);
            assert_eq!(p.date, e.date);
        }
    }

    #[test]
    fn bars_respect_ohlc_ordering() {
        for seed in 0..20 {
            let ds = generate(365, seed);
            for b in &ds.prices {
                assert!(b.low <= b.open.min(b.close), "{b:?}");
                assert!(b.open.min(b.close) <= b.open.max(b.close));
                assert!(b.open.max(b.close) <= b.high, "{b:?}");
            }
        }
    }

    #[test]
    fn random_walk_links_consecutive_bars() {
        let ds = generate(90, 3);
        assert!((ds.prices[0].open - 150.0).abs() < f64::EPSILON);
        for pair in ds.prices.windows(2) {
            assert_eq!(pair[0].close, pair[1].open);
        }
        for b in &ds.prices {
            assert!((b.close - b.open).abs() <= 1.0);
        }
    }

    #[test]
    fn volume_direction_follows_candle() {
        let ds = generate(200, 11);
        for (p, v) in ds.prices.iter().zip(&ds.volumes) {
            assert_eq!(v.direction == Direction::Up, p.close >= p.open);
            assert!((500_000..1_500_000).contains(&v.volume));
        }
    }

    #[test]
    fn emotions_cover_every_kind_in_unit_interval() {
        let ds = generate(30, 5);
        for sample in &ds.emotions {
            assert_eq!(sample.intensities.len(), EmotionKind::ALL.len());
            for &v in sample.intensities.values() {
                assert!((0.0..1.0).contains(&v));
            }
        }
        assert_eq!(ds.emotion_distribution.len(), EmotionKind::ALL.len());
        assert!(ds.emotion_distribution.values().all(|&c| c < 100));
    }

    #[test]
    fn zero_days_yields_empty_dataset() {
        let ds = generate(0, 1);
        assert!(ds.is_empty());
        assert!(ds.volumes.is_empty());
        assert!(ds.emotions.is_empty());
    }

    #[test]
    fn single_day_is_today() {
        let ds = generate(1, 1);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.prices[0].date, today());
    }

    #[test]
    fn same_seed_reproduces_dataset() {
        let a = generate(60, 42);
        let b = generate(60, 42);
        assert_eq!(a.prices, b.prices);
        assert_eq!(a.emotion_distribution, b.emotion_distribution);
        let c = generate(60, 43);
        assert_ne!(a.prices, c.prices);
    }

    #[test]
    fn zero_volatility_is_flat() {
        let params = GeneratorParams {
            volatility: 0.0,
            ..GeneratorParams::default()
        };
        let mut rng = StdRng::seed_from_u64(9);
        let ds = SeriesGenerator::new(params).generate(10, today(), &mut rng);
        for b in &ds.prices {
            assert_eq!(b.open, 150.0);
            assert_eq!(b.high, 150.0);
            assert_eq!(b.low, 150.0);
            assert_eq!(b.close, 150.0);
        }
    }

    #[test]
    fn default_params_are_valid() {
        assert!(GeneratorParams::default().validate().is_ok());
        let flat = GeneratorParams {
            volatility: 0.0,
            volume_min: 10,
            volume_max: 10,
            ..GeneratorParams::default()
        };
        assert!(flat.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_finite_and_inverted_params() {
        let bad = [
            GeneratorParams { base_price: f64::NAN, ..GeneratorParams::default() },
            GeneratorParams { base_price: f64::INFINITY, ..GeneratorParams::default() },
            GeneratorParams { volatility: f64::NAN, ..GeneratorParams::default() },
            GeneratorParams { volatility: f64::INFINITY, ..GeneratorParams::default() },
            GeneratorParams { volatility: -1.0, ..GeneratorParams::default() },
            GeneratorParams { volume_min: 2_000_000, ..GeneratorParams::default() },
        ];
        for params in bad {
            assert!(params.validate().is_err(), "accepted {params:?}");
        }
    }
}
