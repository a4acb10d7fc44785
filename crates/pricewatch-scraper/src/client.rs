//! HTTP client for the retailer's public price-list endpoints.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::ScrapeError;

/// Thin wrapper around [`reqwest::Client`] with bounded timeouts and a
/// configured `User-Agent`.
///
/// Non-2xx responses surface as [`ScrapeError::UnexpectedStatus`]; transport
/// failures (including timeouts) as [`ScrapeError::Http`]. There is no retry
/// policy — the pipeline's only fallback is the CSV loader's second encoding
/// attempt.
pub struct PriceListClient {
    client: Client,
}

impl PriceListClient {
    /// Creates a client with the given request timeout, connect timeout, and
    /// `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        connect_timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches a text resource body.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::UnexpectedStatus`] on non-2xx, [`ScrapeError::Http`] on
    /// transport failure.
    pub async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.checked_get(url).await?;
        Ok(response.text().await?)
    }

    /// Fetches a resource body as raw bytes, leaving decoding to the caller.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::UnexpectedStatus`] on non-2xx, [`ScrapeError::Http`] on
    /// transport failure.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        let response = self.checked_get(url).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Fetches a resource and parses the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::Deserialize`] when the body is not valid JSON for `T`,
    /// plus the fetch errors of [`Self::fetch_text`].
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        context: &str,
    ) -> Result<T, ScrapeError> {
        let body = self.fetch_text(url).await?;
        serde_json::from_str::<T>(&body).map_err(|e| ScrapeError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }

    async fn checked_get(&self, url: &str) -> Result<reqwest::Response, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response)
    }
}

/// Extracts the scheme+host origin from a page URL.
///
/// Given `"https://www.kaufland.hr/akcije-novosti/popis-mpc.html"`, returns
/// `"https://www.kaufland.hr"`. Manifest `path` values are joined onto this
/// origin to build absolute download URLs.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidUrl`] when the page URL cannot be parsed.
pub fn page_origin(page_url: &str) -> Result<String, ScrapeError> {
    let url = reqwest::Url::parse(page_url).map_err(|e| ScrapeError::InvalidUrl {
        url: page_url.to_owned(),
        reason: e.to_string(),
    })?;
    Ok(url.origin().ascii_serialization())
}
