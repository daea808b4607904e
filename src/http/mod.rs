//! HTTP API module for Pipewatch
//!
//! Provides REST endpoints for:
//! - Current readings for all stations or a single station
//! - Health and model metadata

pub mod server;

pub use server::{
    create_server, start_server, AppState, ErrorResponse, HealthResponse, CACHE_CONTROL_NO_STORE,
};
