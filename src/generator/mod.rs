// =============================================================================
// Synthetic Data Generation
// =============================================================================
//
// - `series`  : random-walk OHLC bars, volumes, emotion intensities and a
//                one-off emotion distribution
// - `resample`: weekly aggregation used for multi-year ranges
//
// Randomness is always injected by the caller so datasets are reproducible
// from a seed.

pub mod resample;
pub mod series;

pub use resample::resample_weekly;
pub use series::{GeneratorParams, SeriesGenerator};
