//! HTTP API Tests
//!
//! Exercises the router in-process with `tower::ServiceExt::oneshot`, and the
//! polling client against a server bound to an ephemeral port.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use pipewatch::config::{MonitorConfig, ServerConfig};
use pipewatch::http::{
    create_server, AppState, ErrorResponse, HealthResponse, CACHE_CONTROL_NO_STORE,
};
use pipewatch::monitor::{ConnectionStatus, MonitorState, PollOutcome, Poller};
use pipewatch::Reading;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn test_app(seed: u64) -> Router {
    let config = ServerConfig { seed: Some(seed), use_utc_clock: true, ..Default::default() };
    create_server(Arc::new(AppState::new(&config)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let cache_control = response
        .headers()
        .get(header::CACHE_CONTROL)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, cache_control, bytes.to_vec())
}

#[tokio::test]
async fn test_readings_endpoint_returns_all_stations() {
    let (status, cache_control, body) = get(test_app(42), "/api/readings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache_control.as_deref(), Some(CACHE_CONTROL_NO_STORE));

    let readings: BTreeMap<String, Reading> = serde_json::from_slice(&body).unwrap();
    let keys: Vec<&str> = readings.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Mardakan", "Sumqayit", "Turkan"]);
    for (name, reading) in &readings {
        assert_eq!(&reading.station_name, name);
        if !reading.is_anomaly {
            assert_eq!(reading.anomaly_score, 0.0);
        }
    }
}

#[tokio::test]
async fn test_readings_wire_shape() {
    let (_, _, body) = get(test_app(7), "/api/readings").await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    let reading = &json["Sumqayit"];
    assert_eq!(reading["location"], "Sumqayit");
    assert!(reading["timestamp"].is_string());
    assert!(reading["is_anomaly"].is_boolean());
    assert!(reading["anomaly_score"].is_number());

    let sensors = reading["sensors"].as_object().unwrap();
    for key in [
        "density_kg_m3",
        "pressure_diff_kpa",
        "pressure_kpa",
        "temperature_c",
        "hourly_flow_m3",
        "total_flow_m3",
    ] {
        assert!(sensors[key].is_number(), "missing sensor {}", key);
    }
    assert_eq!(sensors.len(), 6);

    let timestamp = reading["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_every_call_generates_fresh_readings() {
    let app = test_app(11);
    let (_, _, first) = get(app.clone(), "/api/readings").await;
    let (_, _, second) = get(app, "/api/readings").await;

    let first: BTreeMap<String, Reading> = serde_json::from_slice(&first).unwrap();
    let second: BTreeMap<String, Reading> = serde_json::from_slice(&second).unwrap();
    assert_ne!(first["Mardakan"].sensors, second["Mardakan"].sensors);
}

#[tokio::test]
async fn test_station_endpoint_with_known_and_unknown_names() {
    let (status, cache_control, body) = get(test_app(3), "/api/readings/Turkan").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache_control.as_deref(), Some(CACHE_CONTROL_NO_STORE));
    let reading: Reading = serde_json::from_slice(&body).unwrap();
    assert_eq!(reading.station_name, "Turkan");

    let (status, _, body) = get(test_app(3), "/api/readings/Baku").await;
    assert_eq!(status, StatusCode::OK);
    let reading: Reading = serde_json::from_slice(&body).unwrap();
    assert_eq!(reading.station_name, "Baku");
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, _, body) = get(test_app(1), "/api/health").await;
    assert_eq!(status, StatusCode::OK);

    let health: HealthResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "healthy");
    assert!(health.model_loaded);
    assert!(health.simulator_active);
    assert_eq!(health.stations, vec!["Mardakan", "Sumqayit", "Turkan"]);
    assert_eq!(health.training_samples, 170_289);
    assert_eq!(health.expected_anomaly_rate, "1.0%");
    assert!(health.model_type.contains("Mahalanobis"));
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let (status, _, body) = get(test_app(1), "/api/history").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert!(!error.error.is_empty());
}

#[tokio::test]
async fn test_poller_against_live_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = test_app(5);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = MonitorConfig {
        base_url: format!("http://{}", addr),
        request_timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let poller = Poller::new(&config).unwrap();
    let mut state = MonitorState::from_config(&config);

    for _ in 0..3 {
        let outcome = poller.poll().await;
        assert!(matches!(outcome, PollOutcome::Success(ref r) if r.len() == 3));
        state.apply(outcome);
    }

    assert_eq!(state.status(), ConnectionStatus::Connected);
    assert_eq!(state.active_stations(), 3);
    assert!(state.last_update().is_some());
}

#[tokio::test]
async fn test_poller_treats_error_status_as_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = test_app(9);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Resolves to /nope/api/readings, which only the JSON 404 fallback answers.
    let config = MonitorConfig {
        base_url: format!("http://{}/nope", addr),
        request_timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let poller = Poller::new(&config).unwrap();
    let mut state = MonitorState::from_config(&config);

    let outcome = poller.poll().await;
    match &outcome {
        PollOutcome::Failure(message) => assert!(message.contains("404"), "{}", message),
        PollOutcome::Success(_) => panic!("404 response was accepted"),
    }

    state.apply(outcome);
    assert_eq!(state.status(), ConnectionStatus::Error);
    assert_eq!(state.consecutive_errors(), 1);
    assert_eq!(state.active_stations(), 0);
}

#[tokio::test]
async fn test_poller_reports_failure_when_server_is_down() {
    // Reserve a port, then release it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = MonitorConfig {
        base_url: format!("http://{}", addr),
        request_timeout: Duration::from_millis(500),
        max_consecutive_errors: 2,
        ..Default::default()
    };
    let poller = Poller::new(&config).unwrap();
    let mut state = MonitorState::from_config(&config);

    let outcome = poller.poll().await;
    assert!(matches!(outcome, PollOutcome::Failure(_)));
    state.apply(outcome);
    assert_eq!(state.status(), ConnectionStatus::Error);

    state.apply(poller.poll().await);
    assert_eq!(state.status(), ConnectionStatus::Disconnected);
}
