// =============================================================================
// Time Range: dropdown label to day count
// =============================================================================
//
// Fixed labels map to fixed day counts. YTD is the number of whole days
// elapsed since January 1st of `today`'s year, so on January 1st it is zero
// and the resulting dataset is empty.
//
// Long ranges (5Y, 10Y) are drawn as weekly bars.

use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "2W")]
    TwoWeeks,
    #[default]
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "2Y")]
    TwoYears,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "10Y")]
    TenYears,
    #[serde(rename = "YTD")]
    YearToDate,
}

impl TimeRange {
    pub const ALL: [TimeRange; 11] = [
        Self::OneDay,
        Self::OneWeek,
        Self::TwoWeeks,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
        Self::TenYears,
        Self::YearToDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::OneDay => "1D",
            Self::OneWeek => "1W",
            Self::TwoWeeks => "2W",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
            Self::TwoYears => "2Y",
            Self::FiveYears => "5Y",
            Self::TenYears => "10Y",
            Self::YearToDate => "YTD",
        }
    }

    /// Number of daily bars to generate when the range ends on `today`.
    pub fn days(self, today: NaiveDate) -> u32 {
        match self {
            Self::OneDay => 1,
            Self::OneWeek => 7,
            Self::TwoWeeks => 14,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
            Self::TwoYears => 730,
            Self::FiveYears => 1825,
            Self::TenYears => 3650,
            Self::YearToDate => {
                // Ordinal is 1-based, so Jan 1st yields zero elapsed days.
                today.ordinal0()
            }
        }
    }

    /// Whether the range is aggregated into weekly bars before display.
    pub fn is_weekly(self) -> bool {
        matches!(self, Self::FiveYears | Self::TenYears)
    }

    /// Whether summary statistics are computed for this range.
    pub fn has_statistics(self) -> bool {
        matches!(
            self,
            Self::OneYear | Self::TwoYears | Self::FiveYears | Self::TenYears
        )
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TimeRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|r| r.label() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|r| r.label()).collect();
                anyhow!(
                    "Invalid time range. Must be one of: {}",
                    valid.join(", ")
                )
            })
    }
}
