//! Synthetic reading generator.
//!
//! Each call is independent: draw whether to force an anomaly from the
//! station's diurnally-scaled rate, sample a sensor vector along the normal or
//! anomalous path, then score it.

use crate::core::{Reading, SensorField, SensorVector};
use crate::telemetry::scoring::{anomaly_score, Verdict};
use crate::telemetry::source::NoiseSource;
use crate::telemetry::statistics::{
    effective_anomaly_rate, generation_parameter, hourly_flow_bias, sensor_statistic,
    temperature_bias, STATION_NAMES,
};
use chrono::{DateTime, SubsecRound, TimeZone, Timelike, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Fewest fields perturbed by an injected anomaly.
pub const MIN_INJECTED_FIELDS: usize = 2;
/// Most fields perturbed by an injected anomaly.
pub const MAX_INJECTED_FIELDS: usize = 4;
/// Injected deviations fall in `[MIN_INJECTION_SIGMA, MAX_INJECTION_SIGMA)` standard deviations.
pub const MIN_INJECTION_SIGMA: f64 = 3.0;
pub const MAX_INJECTION_SIGMA: f64 = 5.0;

/// One deliberate override of a sensor field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Injection {
    pub field: SensorField,
    /// Magnitude in standard deviations of the scoring statistic.
    pub sigma: f64,
    /// `1.0` or `-1.0`.
    pub direction: f64,
}

impl Injection {
    /// Value before the domain clamp: `mean + direction * sigma * std`.
    pub fn raw_value(&self) -> f64 {
        let stat = sensor_statistic(self.field);
        stat.mean + self.direction * self.sigma * stat.standard_deviation
    }

    pub fn clamped_value(&self) -> f64 {
        sensor_statistic(self.field).clamp(self.raw_value())
    }
}

/// Reading plus the verdict details that are not on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredReading {
    pub reading: Reading,
    pub verdict: Verdict,
}

/// Samples a sensor vector from the (wider) generation parameters.
///
/// Temperature and hourly flow means are shifted by hour of day. Every field is
/// floored at zero where physical, then clamped to its domain.
pub fn normal_sensors<S: NoiseSource + ?Sized>(source: &mut S, hour: u32) -> SensorVector {
    SensorVector::from_fn(|field| {
        let param = generation_parameter(field);
        let bias = match field {
            SensorField::Temperature => temperature_bias(hour),
            SensorField::HourlyFlow => hourly_flow_bias(hour),
            _ => 0.0,
        };
        let mut value = source.gaussian(param.mean + bias, param.standard_deviation);
        if let Some((lo, hi)) = param.bounds {
            value = value.clamp(lo, hi);
        }
        sensor_statistic(field).clamp(value)
    })
}

/// Draws 2–4 distinct fields, each with a 3–5σ deviation in a random direction.
pub fn draw_injections<S: NoiseSource + ?Sized>(source: &mut S) -> Vec<Injection> {
    let span = (MAX_INJECTED_FIELDS - MIN_INJECTED_FIELDS + 1) as f64;
    let count = MIN_INJECTED_FIELDS + (source.unit() * span).floor() as usize;
    let count = count.min(MAX_INJECTED_FIELDS);

    source
        .pick_fields(count)
        .into_iter()
        .map(|field| {
            let sigma = MIN_INJECTION_SIGMA
                + source.unit() * (MAX_INJECTION_SIGMA - MIN_INJECTION_SIGMA);
            let direction = if source.unit() < 0.5 { 1.0 } else { -1.0 };
            Injection { field, sigma, direction }
        })
        .collect()
}

/// Overrides the injected fields of `base`; other fields keep their values.
pub fn apply_injections(base: &SensorVector, injections: &[Injection]) -> SensorVector {
    let mut sensors = *base;
    for injection in injections {
        sensors.set(injection.field, injection.clamped_value());
    }
    sensors
}

/// Score of `base` with the injections applied before any clamping.
pub fn injection_score(base: &SensorVector, injections: &[Injection]) -> f64 {
    let mut raw = *base;
    for injection in injections {
        raw.set(injection.field, injection.raw_value());
    }
    anomaly_score(&raw)
}

/// A normal draw with a partial-sensor-fault signature layered on top.
pub fn anomalous_sensors<S: NoiseSource + ?Sized>(source: &mut S, hour: u32) -> SensorVector {
    let base = normal_sensors(source, hour);
    let injections = draw_injections(source);
    apply_injections(&base, &injections)
}

/// Generates one reading and keeps the full verdict alongside it.
pub fn generate_scored_reading<Tz, S>(
    station_name: &str,
    current_time: &DateTime<Tz>,
    source: &mut S,
) -> ScoredReading
where
    Tz: TimeZone,
    S: NoiseSource + ?Sized,
{
    let hour = current_time.hour();
    let force_anomaly = source.chance(effective_anomaly_rate(station_name, hour));

    let sensors = if force_anomaly {
        anomalous_sensors(source, hour)
    } else {
        normal_sensors(source, hour)
    };

    let verdict = Verdict::evaluate(&sensors, force_anomaly);
    debug!(
        station = station_name,
        hour,
        forced = force_anomaly,
        score = verdict.score,
        "generated reading"
    );

    let reading = Reading {
        timestamp: current_time.with_timezone(&Utc).trunc_subsecs(3),
        station_name: station_name.to_string(),
        sensors,
        is_anomaly: verdict.is_anomaly,
        anomaly_score: verdict.reported_score(),
    };

    ScoredReading { reading, verdict }
}

/// Generates one reading for `station_name` at `current_time`.
///
/// Only the hour of `current_time`, in its own time zone, drives the diurnal
/// behaviour. Unknown station names use the default base rate.
pub fn generate_reading<Tz, S>(
    station_name: &str,
    current_time: &DateTime<Tz>,
    source: &mut S,
) -> Reading
where
    Tz: TimeZone,
    S: NoiseSource + ?Sized,
{
    generate_scored_reading(station_name, current_time, source).reading
}

/// One independent reading per monitored station, keyed by station name.
pub fn generate_all_readings<Tz, S>(
    current_time: &DateTime<Tz>,
    source: &mut S,
) -> BTreeMap<String, Reading>
where
    Tz: TimeZone,
    S: NoiseSource + ?Sized,
{
    STATION_NAMES
        .iter()
        .map(|name| (name.to_string(), generate_reading(name, current_time, source)))
        .collect()
}
