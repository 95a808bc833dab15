// =============================================================================
// Shared types used across the emotion dashboard
// =============================================================================
//
// Every entity here is immutable once produced. A `TimeSeriesDataset` is built
// fresh for each request and discarded when the response has been written.

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// EmotionKind: static reference data
// =============================================================================

/// The fixed set of emotion labels tracked by the dashboard.
///
/// Declaration order is significant: it is the iteration order of
/// [`EmotionKind::ALL`], the key order of every emotion map, and the
/// tie-break order when picking a dominant emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionKind {
    Anger,
    Depression,
    Sad,
    Confusion,
    Neutral,
    Optimism,
    Amusement,
    Excitement,
    Surprise,
}

impl EmotionKind {
    pub const ALL: [EmotionKind; 9] = [
        Self::Anger,
        Self::Depression,
        Self::Sad,
        Self::Confusion,
        Self::Neutral,
        Self::Optimism,
        Self::Amusement,
        Self::Excitement,
        Self::Surprise,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Anger => "anger",
            Self::Depression => "depression",
            Self::Sad => "sad",
            Self::Confusion => "confusion",
            Self::Neutral => "neutral",
            Self::Optimism => "optimism",
            Self::Amusement => "amusement",
            Self::Excitement => "excitement",
            Self::Surprise => "surprise",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Anger => "😠",
            Self::Depression => "😢",
            Self::Sad => "😔",
            Self::Confusion => "😕",
            Self::Neutral => "😐",
            Self::Optimism => "😊",
            Self::Amusement => "😄",
            Self::Excitement => "🎉",
            Self::Surprise => "😲",
        }
    }

    /// Display colour used by the pie chart and intensity lines.
    pub fn color(self) -> &'static str {
        match self {
            Self::Anger => "#ff4d4d",
            Self::Depression => "#4a90e2",
            Self::Sad => "#9b9b9b",
            Self::Confusion => "#f5a623",
            Self::Neutral => "#b8e986",
            Self::Optimism => "#7ed321",
            Self::Amusement => "#bd10e0",
            Self::Excitement => "#50e3c2",
            Self::Surprise => "#f8e71c",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Anger => "intense feeling of frustration or annoyance",
            Self::Depression => "deep sadness or gloom, like a rainy day",
            Self::Sad => "feeling of sorrow or unhappiness",
            Self::Confusion => "state of being puzzled or uncertain",
            Self::Neutral => "a balanced, calm state",
            Self::Optimism => "feeling of hope and positivity",
            Self::Amusement => "joy from being entertained",
            Self::Excitement => "burst of enthusiasm and eagerness",
            Self::Surprise => "feeling of unexpected wonder",
        }
    }
}

impl std::fmt::Display for EmotionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for EmotionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.label() == wanted)
            .ok_or_else(|| anyhow!("unknown emotion '{s}'"))
    }
}

/// Serialisable view of one emotion's reference data.
#[derive(Debug, Clone, Serialize)]
pub struct EmotionInfo {
    pub kind: EmotionKind,
    pub emoji: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

impl From<EmotionKind> for EmotionInfo {
    fn from(kind: EmotionKind) -> Self {
        Self {
            kind,
            emoji: kind.emoji(),
            color: kind.color(),
            description: kind.description(),
        }
    }
}

// =============================================================================
// Price / volume bars
// =============================================================================

/// One synthetic daily OHLC bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Candle direction, used to colour the volume bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// `Up` when the bar closed at or above its open.
    pub fn of(open: f64, close: f64) -> Self {
        if close >= open {
            Self::Up
        } else {
            Self::Down
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Up => "#26a69a",
            Self::Down => "#ef5350",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeBar {
    pub date: NaiveDate,
    pub volume: u64,
    pub direction: Direction,
    pub color: &'static str,
}

impl VolumeBar {
    pub fn new(date: NaiveDate, volume: u64, direction: Direction) -> Self {
        Self {
            date,
            volume,
            direction,
            color: direction.color(),
        }
    }
}

// =============================================================================
// Emotion samples
// =============================================================================

/// Intensity of every emotion on one date, each in `[0, 1)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionSample {
    pub date: NaiveDate,
    pub intensities: BTreeMap<EmotionKind, f64>,
}

/// Count per emotion. Independent of the per-date samples.
pub type EmotionDistribution = BTreeMap<EmotionKind, u32>;

// =============================================================================
// TimeSeriesDataset
// =============================================================================

/// One generated dataset. All three sequences share length and dates.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesDataset {
    pub prices: Vec<PriceBar>,
    pub volumes: Vec<VolumeBar>,
    pub emotions: Vec<EmotionSample>,
    pub emotion_distribution: EmotionDistribution,
}

impl TimeSeriesDataset {
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.prices.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.prices.iter().map(|b| b.date).collect()
    }
}

// =============================================================================
// ChartType
// =============================================================================

/// Which trace shape the front-end should draw from the price bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Candlestick,
    Line,
    Ohlc,
    Area,
    Bar,
    Scatter,
}

impl ChartType {
    pub const ALL: [ChartType; 6] = [
        Self::Candlestick,
        Self::Line,
        Self::Ohlc,
        Self::Area,
        Self::Bar,
        Self::Scatter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Candlestick => "candlestick",
            Self::Line => "line",
            Self::Ohlc => "ohlc",
            Self::Area => "area",
            Self::Bar => "bar",
            Self::Scatter => "scatter",
        }
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ChartType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.label() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|c| c.label()).collect();
                anyhow!(
                    "Invalid chart type '{s}'. Must be one of: {}",
                    valid.join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_up_on_equal_open_close() {
        assert_eq!(Direction::of(10.0, 10.0), Direction::Up);
        assert_eq!(Direction::of(10.0, 10.5), Direction::Up);
        assert_eq!(Direction::of(10.0, 9.5), Direction::Down);
    }

    #[test]
    fn volume_bar_carries_direction_colour() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let v = VolumeBar::new(date, 1_000, Direction::Down);
        assert_eq!(v.color, "#ef5350");
    }

    #[test]
    fn emotion_kind_parses_case_insensitively() {
        assert_eq!("Optimism".parse::<EmotionKind>().unwrap(), EmotionKind::Optimism);
        assert!("joy".parse::<EmotionKind>().is_err());
    }

    #[test]
    fn emotion_kind_serialises_lowercase() {
        let json = serde_json::to_string(&EmotionKind::Excitement).unwrap();
        assert_eq!(json, "\"excitement\"");
    }

    #[test]
    fn chart_type_rejects_unknown_label() {
        assert_eq!("OHLC".parse::<ChartType>().unwrap(), ChartType::Ohlc);
        let err = "pie".parse::<ChartType>().unwrap_err().to_string();
        assert!(err.contains("candlestick"));
    }

    #[test]
    fn every_emotion_has_distinct_colour() {
        let mut colours: Vec<&str> = EmotionKind::ALL.iter().map(|k| k.color()).collect();
        colours.sort_unstable();
        colours.dedup();
        assert_eq!(colours.len(), 9);
    }
}
