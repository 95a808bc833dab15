// =============================================================================
// Runtime Configuration: dashboard settings with atomic save
// =============================================================================
//
// Every tunable of the service lives here: where to listen, which tickers are
// offered, how the synthetic market behaves and which indicator periods are
// drawn.
//
// Persistence uses an atomic tmp + rename pattern. All fields carry
// `#[serde(default)]` so that adding new fields never breaks loading an older
// config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analytics::statistics::DEFAULT_RISK_FREE_RATE;
use crate::generator::GeneratorParams;
use crate::indicators::bollinger::{DEFAULT_BOLLINGER_PERIOD, DEFAULT_BOLLINGER_STD};
use crate::indicators::macd::{DEFAULT_FAST_PERIOD, DEFAULT_SIGNAL_PERIOD, DEFAULT_SLOW_PERIOD};
use crate::indicators::rsi::DEFAULT_RSI_PERIOD;
use crate::time_range::TimeRange;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_companies() -> Vec<String> {
    [
        "NVDA", "AAPL", "ABNB", "AMT", "AMZN", "BA", "BABA", "BAC", "BKNG", "BRK-A", "BRK-B",
        "CCL", "CVX", "DIS", "META", "GOOG", "GOOGL", "HD", "JNJ", "JPM", "KO", "LOW", "MA",
        "MCD", "MSFT", "NFLX", "NKE", "PFE", "PG", "PYPL", "SBUX", "TM", "TSLA", "TSM", "UNH",
        "UPS", "V", "WMT", "XOM",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_sma_period() -> usize {
    20
}

fn default_rsi_period() -> usize {
    DEFAULT_RSI_PERIOD
}

fn default_macd_fast() -> usize {
    DEFAULT_FAST_PERIOD
}

fn default_macd_slow() -> usize {
    DEFAULT_SLOW_PERIOD
}

fn default_macd_signal() -> usize {
    DEFAULT_SIGNAL_PERIOD
}

fn default_bollinger_period() -> usize {
    DEFAULT_BOLLINGER_PERIOD
}

fn default_bollinger_std() -> f64 {
    DEFAULT_BOLLINGER_STD
}

fn default_risk_free_rate() -> f64 {
    DEFAULT_RISK_FREE_RATE
}

// =============================================================================
// IndicatorSettings
// =============================================================================

/// Periods used for the indicator overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSettings {
    /// SMA period when the request does not pick one.
    #[serde(default = "default_sma_period")]
    pub sma_period: usize,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    /// EMA period of the MACD signal line.
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_bollinger_period")]
    pub bollinger_period: usize,

    /// Band half-width in standard deviations.
    #[serde(default = "default_bollinger_std")]
    pub bollinger_std: f64,

    /// Annual risk-free rate used by the Sharpe ratio.
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            sma_period: default_sma_period(),
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            bollinger_period: default_bollinger_period(),
            bollinger_std: default_bollinger_std(),
            risk_free_rate: default_risk_free_rate(),
        }
    }
}

// =============================================================================
// DashboardConfig
// =============================================================================

/// Top-level configuration for the dashboard service.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Ticker symbols offered in the company dropdown.
    #[serde(default = "default_companies")]
    pub companies: Vec<String>,

    /// Range used when a request does not specify one.
    #[serde(default)]
    pub default_range: TimeRange,

    /// Origins allowed by CORS.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// When set, every request without its own seed reuses this one, so the
    /// dashboard shows the same market on every refresh.
    #[serde(default)]
    pub fixed_seed: Option<u64>,

    #[serde(default)]
    pub generator: GeneratorParams,

    #[serde(default)]
    pub indicators: IndicatorSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            companies: default_companies(),
            default_range: TimeRange::default(),
            allowed_origins: default_allowed_origins(),
            fixed_seed: None,
            generator: GeneratorParams::default(),
            indicators: IndicatorSettings::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dashboard config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse dashboard config from {}", path.display()))?;

        config
            .generator
            .validate()
            .with_context(|| format!("invalid generator params in {}", path.display()))?;

        info!(
            path = %path.display(),
            companies = config.companies.len(),
            default_range = %config.default_range,
            "dashboard config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise dashboard config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "dashboard config saved (atomic)");
        Ok(())
    }

    /// Apply `DASHBOARD_*` overrides from an environment lookup.
    ///
    /// Takes the lookup as a closure so tests do not have to touch the
    /// process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("DASHBOARD_BIND_ADDR") {
            self.bind_addr = addr;
        }

        if let Some(list) = lookup("DASHBOARD_COMPANIES") {
            let companies: Vec<String> = list
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if companies.is_empty() {
                warn!("DASHBOARD_COMPANIES is empty, keeping configured companies");
            } else {
                self.companies = companies;
            }
        }

        if let Some(seed) = lookup("DASHBOARD_SEED") {
            match seed.trim().parse::<u64>() {
                Ok(seed) => self.fixed_seed = Some(seed),
                Err(e) => warn!(value = %seed, error = %e, "ignoring invalid DASHBOARD_SEED"),
            }
        }
    }

    pub fn has_company(&self, symbol: &str) -> bool {
        self.companies.iter().any(|c| c == symbol)
    }
}
