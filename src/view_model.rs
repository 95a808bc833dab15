// =============================================================================
// View Model: everything one dashboard render needs
// =============================================================================
//
// A `ViewSelection` is the immutable state of the dashboard controls. Each
// control change produces a new selection, and `compute_view_model` derives a
// fresh `ViewModel` from it:
//
//   selection.time_range ──► day count ──► SeriesGenerator (injected RNG)
//        │                                      │
//        │                         weekly resample for 5Y / 10Y
//        ▼                                      ▼
//   chart trace, indicator overlays, emotion series, statistics
//
// Nothing is cached between calls.
// =============================================================================

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::analytics::{
    distribution_percentages, dominant_emotion, mood_counts, price_moods, SeriesStatistics,
};
use crate::chart::{build_trace, ChartTrace};
use crate::generator::{resample_weekly, SeriesGenerator};
use crate::indicators::{
    calculate_bollinger_series, calculate_ema, calculate_macd, calculate_macd_series,
    calculate_rsi_series, calculate_sma, current_rsi, BollingerBand, MacdSeries,
};
use crate::runtime_config::DashboardConfig;
use crate::time_range::TimeRange;
use crate::types::{ChartType, EmotionDistribution, EmotionKind, PriceBar, VolumeBar};

// =============================================================================
// ViewSelection
// =============================================================================

/// State of the dashboard controls for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSelection {
    pub company: String,
    pub time_range: TimeRange,
    pub chart_type: ChartType,
    pub sma_period: usize,
    pub show_volume: bool,
    pub show_emotions: bool,
    /// Emotion lines to include. Empty means all of them.
    pub selected_emotions: Vec<EmotionKind>,
}

impl ViewSelection {
    pub fn new(company: impl Into<String>, config: &DashboardConfig) -> Self {
        Self {
            company: company.into(),
            time_range: config.default_range,
            chart_type: ChartType::default(),
            sma_period: config.indicators.sma_period,
            show_volume: true,
            show_emotions: true,
            selected_emotions: Vec::new(),
        }
    }

    pub fn with_time_range(self, time_range: TimeRange) -> Self {
        Self { time_range, ..self }
    }

    pub fn with_chart_type(self, chart_type: ChartType) -> Self {
        Self { chart_type, ..self }
    }

    fn wants_emotion(&self, kind: EmotionKind) -> bool {
        self.selected_emotions.is_empty() || self.selected_emotions.contains(&kind)
    }
}

// =============================================================================
// ViewModel
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorOverlay {
    pub sma_period: usize,
    pub sma: Vec<Option<f64>>,
    pub bollinger: Vec<Option<BollingerBand>>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub macd: Option<f64>,
    /// Line, signal and histogram for the MACD panel, aligned with `dates`.
    pub macd_series: MacdSeries,
    pub rsi: Option<f64>,
    pub rsi_label: Option<&'static str>,
    pub rsi_series: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub company: String,
    pub time_range: TimeRange,
    pub chart_type: ChartType,
    pub days: u32,
    pub weekly: bool,
    pub dates: Vec<NaiveDate>,
    pub prices: Vec<PriceBar>,
    pub trace: ChartTrace,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Vec<VolumeBar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotions: Option<BTreeMap<EmotionKind, Vec<f64>>>,
    pub emotion_distribution: EmotionDistribution,
    pub emotion_percentages: Option<BTreeMap<EmotionKind, f64>>,
    pub dominant_emotion: Option<EmotionKind>,
    pub price_moods: Vec<EmotionKind>,
    pub price_mood_distribution: EmotionDistribution,
    pub indicators: IndicatorOverlay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<SeriesStatistics>,
}

/// Derive a complete view from `selection`, drawing randomness from `rng`.
pub fn compute_view_model<R: Rng>(
    selection: &ViewSelection,
    config: &DashboardConfig,
    today: NaiveDate,
    rng: &mut R,
) -> ViewModel {
    let days = selection.time_range.days(today);
    let generator = SeriesGenerator::new(config.generator.clone());
    let daily = generator.generate(days, today, rng);

    let weekly = selection.time_range.is_weekly();
    let dataset = if weekly { resample_weekly(&daily) } else { daily };

    let closes = dataset.closes();
    let settings = &config.indicators;

    let rsi = current_rsi(&closes, settings.rsi_period);
    let indicators = IndicatorOverlay {
        sma_period: selection.sma_period,
        sma: calculate_sma(&closes, selection.sma_period),
        bollinger: calculate_bollinger_series(
            &closes,
            settings.bollinger_period,
            settings.bollinger_std,
        ),
        ema_fast: calculate_ema(&closes, settings.macd_fast),
        ema_slow: calculate_ema(&closes, settings.macd_slow),
        macd: calculate_macd(&closes, settings.macd_fast, settings.macd_slow),
        macd_series: calculate_macd_series(
            &closes,
            settings.macd_fast,
            settings.macd_slow,
            settings.macd_signal,
        ),
        rsi: rsi.map(|(v, _)| v),
        rsi_label: rsi.map(|(_, label)| label),
        rsi_series: calculate_rsi_series(&closes, settings.rsi_period),
    };

    let moods = price_moods(&closes);

    let emotions: Option<BTreeMap<EmotionKind, Vec<f64>>> = selection.show_emotions.then(|| {
        EmotionKind::ALL
            .into_iter()
            .filter(|&k| selection.wants_emotion(k))
            .map(|k| {
                let series: Vec<f64> = dataset
                    .emotions
                    .iter()
                    .map(|s| s.intensities.get(&k).copied().unwrap_or_default())
                    .collect();
                (k, series)
            })
            .collect()
    });

    let statistics = selection
        .time_range
        .has_statistics()
        .then(|| SeriesStatistics::from_dataset(&dataset, settings.risk_free_rate));

    let trace = build_trace(&dataset.prices, selection.chart_type);

    debug!(
        company = %selection.company,
        range = %selection.time_range,
        chart = %trace.chart_type(),
        days,
        points = trace.len(),
        "view model computed"
    );

    ViewModel {
        company: selection.company.clone(),
        time_range: selection.time_range,
        chart_type: selection.chart_type,
        days,
        weekly,
        dates: dataset.dates(),
        trace,
        volume: selection.show_volume.then(|| dataset.volumes.clone()),
        emotions,
        emotion_percentages: distribution_percentages(&dataset.emotion_distribution),
        dominant_emotion: dominant_emotion(&dataset.emotion_distribution),
        price_mood_distribution: mood_counts(&moods),
        price_moods: moods,
        indicators,
        statistics,
        emotion_distribution: dataset.emotion_distribution,
        prices: dataset.prices,
    }
}
