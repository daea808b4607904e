use crate::config::MonitorConfig;
use crate::core::Reading;
use crate::error::{Error, Result};
use crate::monitor::state::PollOutcome;
use reqwest::header::CACHE_CONTROL;
use std::collections::BTreeMap;
use tracing::debug;

/// Fetches the readings endpoint over HTTP.
pub struct Poller {
    client: reqwest::Client,
    url: String,
}

impl Poller {
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, url: config.readings_url() })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One request; non-2xx statuses count as failures.
    pub async fn fetch(&self) -> Result<BTreeMap<String, Reading>> {
        let response = self.client.get(&self.url).header(CACHE_CONTROL, "no-store").send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!("HTTP {}", status.as_u16())));
        }

        let readings = response.json::<BTreeMap<String, Reading>>().await?;
        debug!(count = readings.len(), "fetched readings");
        Ok(readings)
    }

    pub async fn poll(&self) -> PollOutcome {
        match self.fetch().await {
            Ok(readings) => PollOutcome::Success(readings),
            Err(e) => PollOutcome::Failure(e.to_string()),
        }
    }
}
