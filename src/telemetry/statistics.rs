//! Constant tables: training statistics, generation parameters and station profiles.
//!
//! The scoring statistics come from the training set of the deployed model
//! (170 289 samples). The generation parameters are deliberately wider than the
//! scoring statistics so that ordinary draws occasionally cross the threshold.

use crate::core::SensorField;
use serde::Serialize;

/// Approximate 99th percentile of a chi-squared distribution with 6 degrees of freedom.
pub const ANOMALY_THRESHOLD: f64 = 16.81;

/// Base anomaly rate for station names that are not in [`STATION_PROFILES`].
pub const DEFAULT_ANOMALY_RATE: f64 = 0.01;

/// Names of the monitored stations.
pub const STATION_NAMES: [&str; 3] = ["Mardakan", "Sumqayit", "Turkan"];

/// Per-field training statistics used for scoring and domain clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorStatistic {
    pub field: SensorField,
    pub mean: f64,
    pub standard_deviation: f64,
    pub domain_min: f64,
    pub domain_max: f64,
}

impl SensorStatistic {
    /// Standardized deviation of `value` from the training mean.
    pub fn z_score(&self, value: f64) -> f64 {
        (value - self.mean) / self.standard_deviation
    }

    /// Floors non-negative quantities at zero, then clamps into the physical domain.
    pub fn clamp(&self, value: f64) -> f64 {
        let floored = if self.field.is_non_negative() { value.max(0.0) } else { value };
        floored.clamp(self.domain_min, self.domain_max)
    }
}

pub const SENSOR_STATISTICS: [SensorStatistic; 6] = [
    SensorStatistic {
        field: SensorField::Density,
        mean: 0.740,
        standard_deviation: 0.014,
        domain_min: 0.67,
        domain_max: 0.82,
    },
    SensorStatistic {
        field: SensorField::PressureDifferential,
        mean: 9.21,
        standard_deviation: 8.03,
        domain_min: 0.0,
        domain_max: 50.0,
    },
    SensorStatistic {
        field: SensorField::SystemPressure,
        mean: 485.7,
        standard_deviation: 95.8,
        domain_min: 150.0,
        domain_max: 780.0,
    },
    SensorStatistic {
        field: SensorField::Temperature,
        mean: 16.3,
        standard_deviation: 17.4,
        domain_min: -35.0,
        domain_max: 55.0,
    },
    SensorStatistic {
        field: SensorField::HourlyFlow,
        mean: 8.19,
        standard_deviation: 11.39,
        domain_min: 0.0,
        domain_max: 75.0,
    },
    SensorStatistic {
        field: SensorField::TotalFlow,
        mean: 196.6,
        standard_deviation: 273.3,
        domain_min: 0.0,
        domain_max: 1600.0,
    },
];

/// Looks up the scoring statistic for `field`.
pub fn sensor_statistic(field: SensorField) -> &'static SensorStatistic {
    // Table order matches SensorField::ALL.
    &SENSOR_STATISTICS[field as usize]
}

/// Normal-path sampling parameters for one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParameter {
    pub field: SensorField,
    pub mean: f64,
    pub standard_deviation: f64,
    /// Tighter clamp applied straight after sampling, before the domain clamp.
    pub bounds: Option<(f64, f64)>,
}

pub const GENERATION_PARAMETERS: [GenerationParameter; 6] = [
    GenerationParameter {
        field: SensorField::Density,
        mean: 0.740,
        standard_deviation: 0.013,
        bounds: Some((0.68, 0.81)),
    },
    GenerationParameter {
        field: SensorField::PressureDifferential,
        mean: 9.21,
        standard_deviation: 7.5,
        bounds: None,
    },
    GenerationParameter {
        field: SensorField::SystemPressure,
        mean: 485.7,
        standard_deviation: 90.0,
        bounds: Some((200.0, 720.0)),
    },
    GenerationParameter {
        field: SensorField::Temperature,
        mean: 16.3,
        standard_deviation: 14.0,
        bounds: None,
    },
    GenerationParameter {
        field: SensorField::HourlyFlow,
        mean: 8.19,
        standard_deviation: 10.0,
        bounds: None,
    },
    GenerationParameter {
        field: SensorField::TotalFlow,
        mean: 196.6,
        standard_deviation: 260.0,
        bounds: None,
    },
];

pub fn generation_parameter(field: SensorField) -> &'static GenerationParameter {
    &GENERATION_PARAMETERS[field as usize]
}

/// Per-station prior probability of an injected anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationProfile {
    pub name: &'static str,
    pub base_anomaly_rate: f64,
}

pub const STATION_PROFILES: [StationProfile; 3] = [
    StationProfile { name: "Mardakan", base_anomaly_rate: 0.0087 },
    StationProfile { name: "Sumqayit", base_anomaly_rate: 0.0122 },
    StationProfile { name: "Turkan", base_anomaly_rate: 0.0092 },
];

pub fn station_profile(station_name: &str) -> Option<&'static StationProfile> {
    STATION_PROFILES.iter().find(|profile| profile.name == station_name)
}

/// Base anomaly rate for a station, falling back to [`DEFAULT_ANOMALY_RATE`].
pub fn base_anomaly_rate(station_name: &str) -> f64 {
    station_profile(station_name).map_or(DEFAULT_ANOMALY_RATE, |profile| profile.base_anomaly_rate)
}

/// Diurnal scaling of the injection probability: midnight spike, elevated late night.
pub fn hour_multiplier(hour: u32) -> f64 {
    if hour == 0 {
        2.8
    } else if hour < 3 || hour > 21 {
        1.5
    } else {
        1.0
    }
}

/// Probability that a reading at `hour` for `station_name` gets a forced anomaly.
pub fn effective_anomaly_rate(station_name: &str, hour: u32) -> f64 {
    base_anomaly_rate(station_name) * hour_multiplier(hour)
}

/// Temperature mean shift in °C, an ±8 °C sine rising through zero at 06:00.
pub fn temperature_bias(hour: u32) -> f64 {
    8.0 * diurnal_phase(hour, 6.0).sin()
}

/// Daytime demand bump in hourly flow; never negative.
pub fn hourly_flow_bias(hour: u32) -> f64 {
    (4.0 * diurnal_phase(hour, 9.0).sin()).max(0.0)
}

fn diurnal_phase(hour: u32, offset: f64) -> f64 {
    2.0 * std::f64::consts::PI * (f64::from(hour) - offset) / 24.0
}

/// Static descriptive metadata about the scoring model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub model_type: &'static str,
    pub version: &'static str,
    pub training_samples: u64,
    pub expected_anomaly_rate: f64,
    pub training_period: &'static str,
    pub stations: [&'static str; 3],
}

pub const MODEL_METADATA: ModelMetadata = ModelMetadata {
    model_type: "One-Class SVM (RBF) — Mahalanobis approximation",
    version: "2.0",
    training_samples: 170_289,
    expected_anomaly_rate: 1.0,
    training_period: "2018–2024",
    stations: STATION_NAMES,
};
