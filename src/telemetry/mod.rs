//! Synthetic telemetry engine
//!
//! Provides:
//! - Training statistics and station profiles (`statistics`)
//! - Injectable randomness (`source`)
//! - Mahalanobis-squared scoring (`scoring`)
//! - Reading generation with diurnal modulation and anomaly injection (`generator`)

pub mod generator;
pub mod scoring;
pub mod source;
pub mod statistics;

pub use generator::{
    generate_all_readings, generate_reading, generate_scored_reading, Injection, ScoredReading,
};
pub use scoring::{anomaly_score, Verdict};
pub use source::{NoiseSource, PinnedSource, RandomSource};
pub use statistics::{ANOMALY_THRESHOLD, STATION_NAMES};
