//! HTTP API Server for Pipewatch
//!
//! Serves freshly generated readings on every request. Responses are marked
//! non-cacheable so pollers always reach the generator.

use crate::{
    config::ServerConfig,
    core::Reading,
    error::{Error, Result},
    telemetry::{
        generate_all_readings, generate_reading,
        source::RandomSource,
        statistics::{ModelMetadata, MODEL_METADATA},
    },
};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Local, Utc};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

pub const CACHE_CONTROL_NO_STORE: &str = "no-store, no-cache, must-revalidate";

/// Response for the health endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub simulator_active: bool,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub stations: Vec<String>,
    pub model_type: String,
    pub training_samples: u64,
    pub expected_anomaly_rate: String,
}

impl HealthResponse {
    fn from_metadata(metadata: &ModelMetadata, timestamp: DateTime<Utc>) -> Self {
        Self {
            status: "healthy".to_string(),
            model_loaded: true,
            simulator_active: true,
            timestamp,
            version: metadata.version.to_string(),
            stations: metadata.stations.iter().map(|s| s.to_string()).collect(),
            model_type: metadata.model_type.to_string(),
            training_samples: metadata.training_samples,
            expected_anomaly_rate: format!("{:.1}%", metadata.expected_anomaly_rate),
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Shared application state
///
/// The random source is the only thing shared between requests; readings are
/// never cached.
pub struct AppState {
    pub source: Mutex<RandomSource<StdRng>>,
    pub use_utc_clock: bool,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let source = match config.seed {
            Some(seed) => RandomSource::seeded(seed),
            None => RandomSource::from_entropy(),
        };
        Self { source: Mutex::new(source), use_utc_clock: config.use_utc_clock }
    }

    fn with_source<T>(
        &self,
        f: impl FnOnce(&mut RandomSource<StdRng>) -> T,
    ) -> std::result::Result<T, ApiError> {
        let mut source = self
            .source
            .lock()
            .map_err(|_| ApiError::InternalError("random source lock poisoned".to_string()))?;
        Ok(f(&mut *source))
    }

    fn all_readings(&self) -> std::result::Result<BTreeMap<String, Reading>, ApiError> {
        let now = Local::now();
        self.with_source(|source| {
            if self.use_utc_clock {
                generate_all_readings(&now.with_timezone(&Utc), source)
            } else {
                generate_all_readings(&now, source)
            }
        })
    }

    fn station_reading(&self, station: &str) -> std::result::Result<Reading, ApiError> {
        let now = Local::now();
        self.with_source(|source| {
            if self.use_utc_clock {
                generate_reading(station, &now.with_timezone(&Utc), source)
            } else {
                generate_reading(station, &now, source)
            }
        })
    }
}

/// Custom error type for API errors
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

/// Create the HTTP server with all routes
pub fn create_server(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/readings", get(get_readings))
        .route("/api/readings/:station", get(get_station_reading))
        .route("/api/health", get(health_check))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn no_store<T: IntoResponse>(body: T) -> Response {
    ([(header::CACHE_CONTROL, CACHE_CONTROL_NO_STORE)], body).into_response()
}

fn log_anomaly(reading: &Reading) {
    if reading.is_anomaly {
        warn!(
            station = %reading.station_name,
            score = reading.anomaly_score,
            "anomalous reading"
        );
    }
}

/// GET /api/readings - One fresh reading per station
async fn get_readings(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Response, ApiError> {
    let readings = state.all_readings()?;
    readings.values().for_each(log_anomaly);
    Ok(no_store(Json(readings)))
}

/// GET /api/readings/:station - One fresh reading for a single station
async fn get_station_reading(
    State(state): State<Arc<AppState>>,
    Path(station): Path<String>,
) -> std::result::Result<Response, ApiError> {
    let reading = state.station_reading(&station)?;
    log_anomaly(&reading);
    Ok(no_store(Json(reading)))
}

/// GET /api/health - Static model metadata
async fn health_check() -> Response {
    no_store(Json(HealthResponse::from_metadata(&MODEL_METADATA, Utc::now())))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("No such endpoint".to_string())
}

/// Start the HTTP server described by `config`
pub async fn start_server(config: &ServerConfig) -> Result<()> {
    config.validate()?;
    let app = create_server(Arc::new(AppState::new(config)));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, seeded = config.seed.is_some(), "listening");
    println!("Pipewatch HTTP API server listening on http://{}", addr);
    println!();
    println!("Available endpoints:");
    println!("  GET    /api/readings             - Current reading for every station");
    println!("  GET    /api/readings/:station    - Current reading for one station");
    println!("  GET    /api/health               - Health check and model metadata");
    println!();

    axum::serve(listener, app).await.map_err(|e| Error::Server(e.to_string()))?;

    Ok(())
}
