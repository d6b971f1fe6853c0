use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, warn};
use url::Url;

use crate::errors::{HeadlineError, HeadlineResult};
use crate::sources::traits::FeedFetcher;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
            warn!(
                timeout_secs = timeout.as_secs(),
                error = %e,
                "Could not build HTTP client, falling back to defaults without the configured timeout"
            );
            Client::new()
        });

        Self { client }
    }

    fn validate_url(url: &str) -> HeadlineResult<Url> {
        let parsed = Url::parse(url).map_err(|e| HeadlineError::InvalidUrl(e.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(HeadlineError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                other
            ))),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> HeadlineResult<String> {
        let url = Self::validate_url(url)?;

        let response = self.client.get(url.clone()).send()?.error_for_status()?;
        let body = response.text()?;

        debug!(%url, bytes = body.len(), "Fetched feed");
        Ok(body)
    }
}
