//! Axis-aligned Mahalanobis-squared scoring.
//!
//! Stands in for a one-class kernel classifier: the score is the sum of squared
//! z-scores against the training statistics, with no cross-field covariance.

use crate::core::SensorVector;
use crate::telemetry::statistics::{sensor_statistic, ANOMALY_THRESHOLD};

/// Sum of squared standardized deviations over all six fields.
pub fn anomaly_score(sensors: &SensorVector) -> f64 {
    sensors
        .iter()
        .map(|(field, value)| {
            let z = sensor_statistic(field).z_score(value);
            z * z
        })
        .sum()
}

/// True when `score` lies beyond the chi-squared 99th percentile.
pub fn exceeds_threshold(score: f64) -> bool {
    score > ANOMALY_THRESHOLD
}

/// Outcome of scoring one sensor vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub is_anomaly: bool,
    /// Internal score, surfaced on a reading only when `is_anomaly` holds.
    pub score: f64,
    pub forced: bool,
}

impl Verdict {
    /// Combines the injection flag with the threshold test.
    pub fn evaluate(sensors: &SensorVector, forced: bool) -> Self {
        let score = anomaly_score(sensors);
        Self { is_anomaly: forced || exceeds_threshold(score), score, forced }
    }

    /// Score as reported on the wire: zero for normal readings.
    pub fn reported_score(&self) -> f64 {
        if self.is_anomaly {
            self.score
        } else {
            0.0
        }
    }
}
