// =============================================================================
// Weekly Resampling
// =============================================================================
//
// Multi-year ranges are drawn with one bar per ISO week:
//   open   = first open       high = max high       low = min low
//   close  = last close       volume = sum         intensity = mean
//
// Volume sums saturate at `u64::MAX`.
//
// Each weekly bar is stamped with the last date that fell inside the week, so
// a partial current week ends on today rather than on a future Sunday.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::types::{Direction, EmotionKind, EmotionSample, PriceBar, TimeSeriesDataset, VolumeBar};

fn week_key(date: NaiveDate) -> (i32, u32) {
    let week = date.iso_week();
    (week.year(), week.week())
}

/// Aggregate a daily dataset into ISO-week bars.
///
/// The emotion distribution is a per-dataset snapshot and is carried over
/// unchanged.
pub fn resample_weekly(daily: &TimeSeriesDataset) -> TimeSeriesDataset {
    let mut prices: Vec<PriceBar> = Vec::new();
    let mut volumes: Vec<VolumeBar> = Vec::new();
    let mut emotions: Vec<EmotionSample> = Vec::new();

    let mut i = 0;
    while i < daily.prices.len() {
        let key = week_key(daily.prices[i].date);
        let mut end = i + 1;
        while end < daily.prices.len() && week_key(daily.prices[end].date) == key {
            end += 1;
        }

        let bars = &daily.prices[i..end];
        let first = bars[0];
        let last = bars[bars.len() - 1];
        let bar = PriceBar {
            date: last.date,
            open: first.open,
            high: bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max),
            low: bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min),
            close: last.close,
        };

        let volume = daily.volumes[i..end]
            .iter()
            .map(|v| v.volume)
            .fold(0u64, u64::saturating_add);
        volumes.push(VolumeBar::new(bar.date, volume, Direction::of(bar.open, bar.close)));

        let samples = &daily.emotions[i..end];
        let count = samples.len() as f64;
        let intensities: BTreeMap<EmotionKind, f64> = EmotionKind::ALL
            .into_iter()
            .map(|kind| {
                let sum: f64 = samples
                    .iter()
                    .filter_map(|s| s.intensities.get(&kind))
                    .sum();
                (kind, sum / count)
            })
            .collect();
        emotions.push(EmotionSample {
            date: bar.date,
            intensities,
        });

        prices.push(bar);
        i = end;
    }

    TimeSeriesDataset {
        prices,
        volumes,
        emotions,
        emotion_distribution: daily.emotion_distribution.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorParams, SeriesGenerator};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn daily(days: u32, today: NaiveDate) -> TimeSeriesDataset {
        let mut rng = StdRng::seed_from_u64(21);
        SeriesGenerator::default().generate(days, today, &mut rng)
    }

    #[test]
    fn aggregates_full_weeks() {
        // 2024-06-16 is a Sunday: 14 days ending there are two full ISO weeks.
        let today = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
        let ds = daily(14, today);
        let weekly = resample_weekly(&ds);

        assert_eq!(weekly.len(), 2);
        let week1 = &ds.prices[..7];
        assert_eq!(weekly.prices[0].open, week1[0].open);
        assert_eq!(weekly.prices[0].close, week1[6].close);
        assert_eq!(weekly.prices[0].date, week1[6].date);
        let max_high = week1.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let min_low = week1.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        assert_eq!(weekly.prices[0].high, max_high);
        assert_eq!(weekly.prices[0].low, min_low);

        let vol: u64 = ds.volumes[..7].iter().map(|v| v.volume).sum();
        assert_eq!(weekly.volumes[0].volume, vol);
    }

    #[test]
    fn partial_week_ends_on_last_date() {
        // 2024-06-12 is a Wednesday.
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        let weekly = resample_weekly(&daily(10, today));
        assert_eq!(weekly.prices.last().unwrap().date, today);
        assert_eq!(weekly.len(), 2);
    }

    #[test]
    fn weekly_bars_keep_invariants() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        let weekly = resample_weekly(&daily(1825, today));
        for (p, v) in weekly.prices.iter().zip(&weekly.volumes) {
            assert!(p.low <= p.open.min(p.close));
            assert!(p.open.max(p.close) <= p.high);
            assert_eq!(v.direction == Direction::Up, p.close >= p.open);
        }
        for s in &weekly.emotions {
            assert!(s.intensities.values().all(|v| (0.0..1.0).contains(v)));
        }
        for pair in weekly.prices.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
    }

    #[test]
    fn weekly_volume_saturates_instead_of_overflowing() {
        let params = GeneratorParams {
            volume_min: u64::MAX / 2,
            volume_max: u64::MAX,
            ..GeneratorParams::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let ds = SeriesGenerator::new(params).generate(14, today, &mut rng);

        let weekly = resample_weekly(&ds);
        assert_eq!(weekly.len(), 2);
        assert!(weekly.volumes.iter().all(|v| v.volume == u64::MAX));
    }

    #[test]
    fn empty_dataset_stays_empty() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let weekly = resample_weekly(&daily(0, today));
        assert!(weekly.is_empty());
        assert_eq!(weekly.emotion_distribution.len(), 9);
    }
}
