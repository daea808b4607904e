//! # Pipewatch
//!
//! Pipewatch is a simulated SCADA monitoring backend for three gas pipeline
//! stations: Mardakan, Sumqayit and Turkan.
//!
//! Every request fabricates one sensor vector per station (density, pressure
//! differential, system pressure, temperature, hourly and total flow), layers a
//! diurnal pattern on top, occasionally injects a partial-sensor fault, and
//! scores the vector with an axis-aligned Mahalanobis distance against fixed
//! training statistics.
//!
//! ## Features
//!
//! - Stateless, seedable reading generator
//! - HTTP API serving non-cacheable readings and model metadata
//! - Polling monitor with connection-loss escalation and an anomaly log
//!
//! ## Example
//!
//! ```rust
//! use pipewatch::telemetry::{generate_all_readings, RandomSource};
//!
//! let mut source = RandomSource::seeded(7);
//! let readings = generate_all_readings(&chrono::Utc::now(), &mut source);
//! assert_eq!(readings.len(), 3);
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]

/// Core data structures and types
pub mod core;

/// Configuration structures for the binaries
pub mod config;

pub mod error;

/// HTTP API
pub mod http;

/// Polling consumer
pub mod monitor;

/// Synthetic telemetry engine
pub mod telemetry;

// Re-export commonly used types
pub use crate::core::{Reading, SensorField, SensorVector};
pub use error::{Error, Result};
