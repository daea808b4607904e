//! Dashboard state for a polling consumer.
//!
//! All state lives in [`MonitorState`] and changes only through
//! [`MonitorState::apply`], one poll outcome at a time.

use crate::config::MonitorConfig;
use crate::core::{Reading, SensorVector};
use crate::telemetry::statistics::STATION_NAMES;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

/// Connection health as seen by the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// No poll has completed yet.
    Connecting,
    Connected,
    /// Recent polls failed, but fewer than the disconnect threshold.
    Error,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Error => "error",
            ConnectionStatus::Disconnected => "disconnected",
        };
        f.write_str(label)
    }
}

/// An anomalous reading captured in the log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub anomaly_score: f64,
    pub sensors: SensorVector,
}

impl From<&Reading> for AnomalyEvent {
    fn from(reading: &Reading) -> Self {
        Self {
            id: format!("{}-{}", reading.timestamp_iso(), reading.station_name),
            timestamp: reading.timestamp,
            location: reading.station_name.clone(),
            anomaly_score: reading.anomaly_score,
            sensors: reading.sensors,
        }
    }
}

/// Result of one poll.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    Success(BTreeMap<String, Reading>),
    Failure(String),
}

#[derive(Debug, Clone)]
pub struct MonitorState {
    stations: BTreeMap<String, Option<Reading>>,
    status: ConnectionStatus,
    anomaly_log: VecDeque<AnomalyEvent>,
    last_update: Option<DateTime<Utc>>,
    total_anomalies_session: u64,
    consecutive_errors: u32,
    max_consecutive_errors: u32,
    max_anomaly_log: usize,
}

impl MonitorState {
    pub fn new(max_consecutive_errors: u32, max_anomaly_log: usize) -> Self {
        Self {
            stations: STATION_NAMES.iter().map(|name| (name.to_string(), None)).collect(),
            status: ConnectionStatus::Connecting,
            anomaly_log: VecDeque::with_capacity(max_anomaly_log),
            last_update: None,
            total_anomalies_session: 0,
            consecutive_errors: 0,
            max_consecutive_errors: max_consecutive_errors.max(1),
            max_anomaly_log: max_anomaly_log.max(1),
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(config.max_consecutive_errors, config.max_anomaly_log)
    }

    /// Folds one poll outcome into the state and returns the anomalies it added.
    pub fn apply(&mut self, outcome: PollOutcome) -> Vec<AnomalyEvent> {
        match outcome {
            PollOutcome::Success(readings) => self.record_success(readings),
            PollOutcome::Failure(_) => {
                self.record_failure();
                Vec::new()
            }
        }
    }

    fn record_success(&mut self, readings: BTreeMap<String, Reading>) -> Vec<AnomalyEvent> {
        self.consecutive_errors = 0;
        self.status = ConnectionStatus::Connected;

        if let Some(first) = readings.values().next() {
            self.last_update = Some(first.timestamp);
        }

        let events: Vec<AnomalyEvent> =
            readings.values().filter(|r| r.is_anomaly).map(AnomalyEvent::from).collect();

        // Newest first; keep batch order at the front of the log.
        for event in events.iter().rev() {
            self.anomaly_log.push_front(event.clone());
        }
        self.anomaly_log.truncate(self.max_anomaly_log);
        self.total_anomalies_session += events.len() as u64;

        for (name, reading) in readings {
            self.stations.insert(name, Some(reading));
        }

        events
    }

    fn record_failure(&mut self) {
        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        self.status = if self.consecutive_errors >= self.max_consecutive_errors {
            ConnectionStatus::Disconnected
        } else {
            ConnectionStatus::Error
        };
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn station(&self, name: &str) -> Option<&Reading> {
        self.stations.get(name).and_then(Option::as_ref)
    }

    pub fn stations(&self) -> impl Iterator<Item = (&str, Option<&Reading>)> {
        self.stations.iter().map(|(name, reading)| (name.as_str(), reading.as_ref()))
    }

    /// Newest event first.
    pub fn anomaly_log(&self) -> impl Iterator<Item = &AnomalyEvent> {
        self.anomaly_log.iter()
    }

    pub fn anomaly_log_len(&self) -> usize {
        self.anomaly_log.len()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn total_anomalies_session(&self) -> u64 {
        self.total_anomalies_session
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    /// Stations that have reported at least once.
    pub fn active_stations(&self) -> usize {
        self.stations.values().filter(|r| r.is_some()).count()
    }

    /// Stations whose latest reading is anomalous.
    pub fn anomaly_stations(&self) -> usize {
        self.stations.values().flatten().filter(|r| r.is_anomaly).count()
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default())
    }
}
