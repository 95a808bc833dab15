// =============================================================================
// Emotion Helpers
// =============================================================================
//
// Price mood: a daily percentage return mapped onto an emotion label:
//
//   change ≤ -8%        anger
//   -8% < change ≤ -4%  depression
//   -4% < change ≤ -1%  sad
//   -1% < change ≤  1%  neutral
//    1% < change ≤  4%  optimism
//    4% < change ≤  8%  amusement
//    8% < change ≤ 15%  excitement
//   change > 15%        surprise
//
// Confusion is never produced by a return; it only appears in the synthetic
// intensity series.
//
// Distribution helpers return `None` for an empty or all-zero distribution
// instead of dividing by zero.

use std::collections::BTreeMap;

use crate::analytics::statistics::daily_returns;
use crate::types::{EmotionDistribution, EmotionKind};

/// Classify a fractional return. A missing or non-finite return is neutral.
pub fn classify_return(change: Option<f64>) -> EmotionKind {
    let Some(change) = change.filter(|c| c.is_finite()) else {
        return EmotionKind::Neutral;
    };
    let pct = change * 100.0;

    if pct <= -8.0 {
        EmotionKind::Anger
    } else if pct <= -4.0 {
        EmotionKind::Depression
    } else if pct <= -1.0 {
        EmotionKind::Sad
    } else if pct <= 1.0 {
        EmotionKind::Neutral
    } else if pct <= 4.0 {
        EmotionKind::Optimism
    } else if pct <= 8.0 {
        EmotionKind::Amusement
    } else if pct <= 15.0 {
        EmotionKind::Excitement
    } else {
        EmotionKind::Surprise
    }
}

/// One mood per close. The first close has no previous bar and is neutral.
pub fn price_moods(closes: &[f64]) -> Vec<EmotionKind> {
    if closes.is_empty() {
        return Vec::new();
    }
    std::iter::once(EmotionKind::Neutral)
        .chain(daily_returns(closes).into_iter().map(|r| classify_return(Some(r))))
        .collect()
}

/// How many bars fell into each mood. Every kind is present, zero-filled.
pub fn mood_counts(moods: &[EmotionKind]) -> EmotionDistribution {
    let mut counts: EmotionDistribution = EmotionKind::ALL.into_iter().map(|k| (k, 0)).collect();
    for mood in moods {
        *counts.entry(*mood).or_default() += 1;
    }
    counts
}

/// Share of each emotion in percent. `None` when the total count is zero.
pub fn distribution_percentages(
    distribution: &EmotionDistribution,
) -> Option<BTreeMap<EmotionKind, f64>> {
    let total: u64 = distribution.values().map(|&c| u64::from(c)).sum();
    if total == 0 {
        return None;
    }
    Some(
        distribution
            .iter()
            .map(|(&kind, &count)| (kind, f64::from(count) * 100.0 / total as f64))
            .collect(),
    )
}

/// Emotion with the highest count.
///
/// Ties go to the kind declared first. `None` when every count is zero.
pub fn dominant_emotion(distribution: &EmotionDistribution) -> Option<EmotionKind> {
    let mut best: Option<(EmotionKind, u32)> = None;
    for (&kind, &count) in distribution {
        if count == 0 {
            continue;
        }
        match best {
            Some((_, top)) if top >= count => {}
            _ => best = Some((kind, count)),
        }
    }
    best.map(|(kind, _)| kind)
}
