use crate::error::{Result, StudioError};
use anyhow::Context;
use std::time::Duration;

/// Source of remote background images
pub trait ImageFetcher {
    /// One download attempt, returning the encoded image bytes
    fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>>;
}

/// Blocking HTTP fetcher with a bounded per-request timeout
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bgstudio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(StudioError::HttpClient)?;

        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("request to {} failed", url))?
            .error_for_status()?;

        let bytes = response.bytes().context("failed to read response body")?;
        Ok(bytes.to_vec())
    }
}

/// Try `fetcher` once, then retry exactly `retries` more times on failure
pub fn fetch_with_retry(fetcher: &dyn ImageFetcher, url: &str, retries: u32) -> Result<Vec<u8>> {
    let attempts = retries + 1;
    let mut last_error = None;

    for attempt in 1..=attempts {
        let _span = tracing::debug_span!("fetch", attempt).entered();
        match fetcher.fetch(url) {
            Ok(bytes) => {
                tracing::debug!("Fetched {} bytes from {}", bytes.len(), url);
                return Ok(bytes);
            }
            Err(e) => {
                tracing::warn!("Fetch attempt {}/{} for {} failed: {:#}", attempt, attempts, url, e);
                last_error = Some(e);
            }
        }
    }

    Err(StudioError::Fetch {
        url: url.to_string(),
        attempts,
        reason: last_error
            .map(|e| format!("{:#}", e))
            .unwrap_or_else(|| "no attempt made".to_string()),
    })
}
