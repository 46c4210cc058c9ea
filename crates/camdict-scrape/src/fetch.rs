use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::ScrapeError;

/// Blocking HTTP client with the fixed header set baked in.
pub struct Fetcher {
    client: reqwest::blocking::Client,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, ScrapeError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    /// One GET, no retry. Non-success statuses and timeouts are errors;
    /// gzip bodies are decoded transparently.
    pub fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        tracing::debug!(url, "fetching page");
        let response = self.client.get(url).send()?.error_for_status()?;
        let body = response.text()?;
        tracing::debug!(bytes = body.len(), "page fetched");

        Ok(body)
    }
}
