// =============================================================================
// Chart Traces
// =============================================================================
//
// Pure mapping from price bars and a chart type to the trace description the
// front-end hands to its plotting library. OHLC-shaped charts carry all four
// price columns; every other shape plots closes against dates.

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{ChartType, PriceBar};

/// Line/marker drawing mode for close-only traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Lines,
    Markers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ChartTrace {
    /// Candlestick and OHLC bars.
    Ohlc {
        chart_type: ChartType,
        x: Vec<NaiveDate>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
    /// Line, area, bar and scatter over closes.
    Series {
        chart_type: ChartType,
        x: Vec<NaiveDate>,
        y: Vec<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        mode: Option<TraceMode>,
        #[serde(skip_serializing_if = "Option::is_none")]
        fill: Option<&'static str>,
    },
}

impl ChartTrace {
    pub fn chart_type(&self) -> ChartType {
        match self {
            Self::Ohlc { chart_type, .. } | Self::Series { chart_type, .. } => *chart_type,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Ohlc { x, .. } | Self::Series { x, .. } => x.len(),
        }
    }
}

pub fn build_trace(bars: &[PriceBar], chart_type: ChartType) -> ChartTrace {
    let x: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    match chart_type {
        ChartType::Candlestick | ChartType::Ohlc => ChartTrace::Ohlc {
            chart_type,
            x,
            open: bars.iter().map(|b| b.open).collect(),
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            close: closes,
        },
        ChartType::Line => series(chart_type, x, closes, Some(TraceMode::Lines), None),
        ChartType::Area => series(chart_type, x, closes, Some(TraceMode::Lines), Some("tozeroy")),
        ChartType::Scatter => series(chart_type, x, closes, Some(TraceMode::Markers), None),
        ChartType::Bar => series(chart_type, x, closes, None, None),
    }
}

fn series(
    chart_type: ChartType,
    x: Vec<NaiveDate>,
    y: Vec<f64>,
    mode: Option<TraceMode>,
    fill: Option<&'static str>,
) -> ChartTrace {
    ChartTrace::Series {
        chart_type,
        x,
        y,
        mode,
        fill,
    }
}
