// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators overlaid on the
// price chart. Calling any of them twice on the same closes gives
// bit-identical results.
//
// Short histories are not errors: each function documents the best-effort
// value it produces when fewer closes than `period` are supplied.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{calculate_bollinger_series, BollingerBand};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, calculate_macd_series, MacdSeries};
pub use rsi::{calculate_rsi_series, current_rsi};
pub use sma::calculate_sma;
