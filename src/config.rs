//! Configuration structures for the server and the polling monitor

use crate::error::{Error, Result};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seed for the shared random source; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Take hour-of-day from UTC instead of the local clock.
    pub use_utc_clock: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            seed: None,
            use_utc_clock: false,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(Error::Config("port must be non-zero".to_string()));
        }
        Ok(())
    }

    /// `host:port` string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Base URL of the readings server, without trailing slash.
    pub base_url: String,
    pub poll_interval: Duration,
    /// Consecutive failed polls before the connection is reported as lost.
    pub max_consecutive_errors: u32,
    /// Capacity of the in-memory anomaly log.
    pub max_anomaly_log: usize,
    pub request_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            poll_interval: Duration::from_millis(2000),
            max_consecutive_errors: 5,
            max_anomaly_log: 50,
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "base url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::Config("poll interval must be non-zero".to_string()));
        }
        if self.max_consecutive_errors == 0 {
            return Err(Error::Config("max consecutive errors must be at least 1".to_string()));
        }
        if self.max_anomaly_log == 0 {
            return Err(Error::Config("anomaly log capacity must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn readings_url(&self) -> String {
        format!("{}/api/readings", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ServerConfig::default().validate().is_ok());
        assert!(MonitorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_readings_url_strips_trailing_slash() {
        let config =
            MonitorConfig { base_url: "http://localhost:9000/".to_string(), ..Default::default() };
        assert_eq!(config.readings_url(), "http://localhost:9000/api/readings");
    }

    #[test]
    fn test_rejects_zero_port_and_interval() {
        let server = ServerConfig { port: 0, ..Default::default() };
        assert!(matches!(server.validate(), Err(Error::Config(_))));

        let monitor = MonitorConfig { poll_interval: Duration::ZERO, ..Default::default() };
        assert!(matches!(monitor.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_empty_host() {
        let server = ServerConfig { host: String::new(), ..Default::default() };
        assert!(matches!(server.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_zero_error_threshold_and_log_capacity() {
        let monitor = MonitorConfig { max_consecutive_errors: 0, ..Default::default() };
        assert!(matches!(monitor.validate(), Err(Error::Config(_))));

        let monitor = MonitorConfig { max_anomaly_log: 0, ..Default::default() };
        assert!(matches!(monitor.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let monitor = MonitorConfig { base_url: "ftp://x".to_string(), ..Default::default() };
        assert!(matches!(monitor.validate(), Err(Error::Config(_))));

        let secure = MonitorConfig {
            base_url: "https://scada.example:8443".to_string(),
            ..Default::default()
        };
        assert!(secure.validate().is_ok());
    }
}
