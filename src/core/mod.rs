//! Core data structures for Pipewatch telemetry
//!
//! A [`Reading`] is one timestamped snapshot of the six pipeline sensors at a
//! station together with its anomaly verdict. Readings are created fresh on
//! every generator call and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six sensor channels reported by every station, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorField {
    Density,
    PressureDifferential,
    SystemPressure,
    Temperature,
    HourlyFlow,
    TotalFlow,
}

impl SensorField {
    /// All fields in canonical order.
    pub const ALL: [SensorField; 6] = [
        SensorField::Density,
        SensorField::PressureDifferential,
        SensorField::SystemPressure,
        SensorField::Temperature,
        SensorField::HourlyFlow,
        SensorField::TotalFlow,
    ];

    /// Key used for this field in the JSON payload.
    pub fn wire_name(self) -> &'static str {
        match self {
            SensorField::Density => "density_kg_m3",
            SensorField::PressureDifferential => "pressure_diff_kpa",
            SensorField::SystemPressure => "pressure_kpa",
            SensorField::Temperature => "temperature_c",
            SensorField::HourlyFlow => "hourly_flow_m3",
            SensorField::TotalFlow => "total_flow_m3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SensorField::Density => "Gas Density",
            SensorField::PressureDifferential => "Pressure Diff",
            SensorField::SystemPressure => "System Pressure",
            SensorField::Temperature => "Temperature",
            SensorField::HourlyFlow => "Hourly Flow",
            SensorField::TotalFlow => "Total Flow",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            SensorField::Density => "kg/m³",
            SensorField::PressureDifferential | SensorField::SystemPressure => "kPa",
            SensorField::Temperature => "°C",
            SensorField::HourlyFlow => "m³/h",
            SensorField::TotalFlow => "m³",
        }
    }

    /// Physical quantities that can never go below zero.
    pub fn is_non_negative(self) -> bool {
        matches!(
            self,
            SensorField::PressureDifferential | SensorField::HourlyFlow | SensorField::TotalFlow
        )
    }
}

impl fmt::Display for SensorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One value per sensor channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorVector {
    #[serde(rename = "density_kg_m3")]
    pub density: f64,
    #[serde(rename = "pressure_diff_kpa")]
    pub pressure_differential: f64,
    #[serde(rename = "pressure_kpa")]
    pub system_pressure: f64,
    #[serde(rename = "temperature_c")]
    pub temperature: f64,
    #[serde(rename = "hourly_flow_m3")]
    pub hourly_flow: f64,
    #[serde(rename = "total_flow_m3")]
    pub total_flow: f64,
}

impl SensorVector {
    pub fn new(
        density: f64,
        pressure_differential: f64,
        system_pressure: f64,
        temperature: f64,
        hourly_flow: f64,
        total_flow: f64,
    ) -> Self {
        Self {
            density,
            pressure_differential,
            system_pressure,
            temperature,
            hourly_flow,
            total_flow,
        }
    }

    /// Builds a vector by evaluating `f` once per field in canonical order.
    pub fn from_fn(mut f: impl FnMut(SensorField) -> f64) -> Self {
        let mut vector = Self::default();
        for field in SensorField::ALL {
            vector.set(field, f(field));
        }
        vector
    }

    /// The vector of training means; scores exactly zero.
    pub fn mean() -> Self {
        Self::from_fn(|field| crate::telemetry::statistics::sensor_statistic(field).mean)
    }

    pub fn get(&self, field: SensorField) -> f64 {
        match field {
            SensorField::Density => self.density,
            SensorField::PressureDifferential => self.pressure_differential,
            SensorField::SystemPressure => self.system_pressure,
            SensorField::Temperature => self.temperature,
            SensorField::HourlyFlow => self.hourly_flow,
            SensorField::TotalFlow => self.total_flow,
        }
    }

    pub fn set(&mut self, field: SensorField, value: f64) {
        match field {
            SensorField::Density => self.density = value,
            SensorField::PressureDifferential => self.pressure_differential = value,
            SensorField::SystemPressure => self.system_pressure = value,
            SensorField::Temperature => self.temperature = value,
            SensorField::HourlyFlow => self.hourly_flow = value,
            SensorField::TotalFlow => self.total_flow = value,
        }
    }

    /// `(field, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (SensorField, f64)> + '_ {
        SensorField::ALL.into_iter().map(move |field| (field, self.get(field)))
    }
}

impl Default for SensorVector {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0)
    }
}

/// A timestamped per-station snapshot plus its anomaly verdict.
///
/// `anomaly_score` is zero whenever `is_anomaly` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Millisecond precision; serialized as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "location")]
    pub station_name: String,
    pub sensors: SensorVector,
    pub is_anomaly: bool,
    pub anomaly_score: f64,
}

impl Reading {
    /// ISO-8601 timestamp exactly as sent on the wire.
    pub fn timestamp_iso(&self) -> String {
        iso_millis::format(&self.timestamp)
    }
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(timestamp: &DateTime<Utc>) -> String {
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(timestamp))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        DateTime::<Utc>::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_cover_every_field() {
        let mut vector = SensorVector::default();
        for (i, field) in SensorField::ALL.into_iter().enumerate() {
            vector.set(field, i as f64 + 1.0);
        }
        let values: Vec<f64> = vector.iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_wire_timestamp_has_millisecond_precision() {
        let timestamp = DateTime::parse_from_rfc3339("2024-05-01T06:07:08.250Z")
            .unwrap()
            .with_timezone(&Utc);
        let reading = Reading {
            timestamp,
            station_name: "Turkan".to_string(),
            sensors: SensorVector::default(),
            is_anomaly: false,
            anomaly_score: 0.0,
        };

        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["timestamp"], "2024-05-01T06:07:08.250Z");
        assert_eq!(json["timestamp"], reading.timestamp_iso());

        let back: Reading = serde_json::from_value(json).unwrap();
        assert_eq!(back, reading);
    }

    #[test]
    fn test_non_negative_fields() {
        let non_negative: Vec<SensorField> =
            SensorField::ALL.into_iter().filter(|f| f.is_non_negative()).collect();
        assert_eq!(
            non_negative,
            vec![SensorField::PressureDifferential, SensorField::HourlyFlow, SensorField::TotalFlow]
        );
    }
}
