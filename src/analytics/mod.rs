// =============================================================================
// Analytics Module
// =============================================================================
//
// Derived, read-only views over a generated dataset:
// - summary statistics for long ranges (drawdown, Sharpe, volatility)
// - emotion helpers: price-mood classification and tallies, distribution
//   percentages and the dominant emotion

pub mod mood;
pub mod statistics;

pub use mood::{distribution_percentages, dominant_emotion, mood_counts, price_moods};
pub use statistics::SeriesStatistics;
