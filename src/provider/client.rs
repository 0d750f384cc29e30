//! Blocking HTTP client for the provider endpoint.

use std::time::Duration;

use chrono::{Local, NaiveDate};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use thiserror::Error;
use tracing::{debug, info};

use super::RpcRequest;
use super::parse::{ParseError, parse_body};
use crate::config::FetchConfig;
use crate::series::PriceSeries;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/Latest Safari/537.36";
const PORTAL_REFERER: &str = "https://mein.green-planet-energy.de/dynamischer-tarif/strompreise";

/// Failures fetching prices from the provider.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure, including timeouts.
    #[error("error communicating with API: {0}")]
    Connection(#[from] reqwest::Error),

    /// Provider answered with a non-200 status.
    #[error("API request failed with status {0}")]
    Status(u16),

    /// Body could not be turned into a price series.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Provider client holding one pooled HTTP connection set.
#[derive(Debug, Clone)]
pub struct PriceClient {
    client: Client,
    url: String,
    request_id: u64,
}

impl PriceClient {
    /// Builds a client from the fetch configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Connection`] if the HTTP client cannot be built.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers())
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            request_id: config.request_id,
        })
    }

    /// Fetches today's and tomorrow's prices relative to the local date.
    ///
    /// # Errors
    ///
    /// See [`PriceClient::fetch_for`].
    pub fn fetch(&self) -> Result<PriceSeries, FetchError> {
        self.fetch_for(Local::now().date_naive())
    }

    /// Fetches prices for `today` and the day after.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Connection`] on transport failure or timeout,
    /// [`FetchError::Status`] on a non-200 answer, and
    /// [`FetchError::Parse`] if the payload is unusable.
    pub fn fetch_for(&self, today: NaiveDate) -> Result<PriceSeries, FetchError> {
        info!(url = %self.url, %today, "fetching electricity prices");
        let response = self
            .client
            .post(&self.url)
            .json(&RpcRequest::today_and_tomorrow(today, self.request_id))
            .send()?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.text()?;
        debug!(bytes = body.len(), "received price payload");
        Ok(parse_body(&body, today)?)
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(REFERER, HeaderValue::from_static(PORTAL_REFERER));
    headers
}
