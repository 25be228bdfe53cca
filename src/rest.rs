//! REST access to the 24h statistics and klines endpoints.

use std::time::Duration;

use tracing::debug;

use crate::Result;
use crate::models::RangeToken;

/// The request/response primitive the resampler consumes.
///
/// [`RestClient`] is the production implementation; tests substitute a
/// mock to control response content and completion order.
#[allow(async_fn_in_trait)]
pub trait CandleSource {
    /// Fetches the raw 24h statistics object for one symbol.
    async fn day_stats(&self, symbol: &str) -> Result<serde_json::Value>;

    /// Fetches the raw kline bars for one symbol at the given interval.
    async fn klines(&self, symbol: &str, interval: RangeToken) -> Result<Vec<serde_json::Value>>;
}

/// HTTP client for the public market-data REST API.
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    /// Builds a client with a per-request timeout so a stalled fetch
    /// surfaces as a transport error instead of hanging the caller.
    ///
    /// # Errors
    ///
    /// Returns a [`CoinwatchError`](crate::CoinwatchError) if the
    /// underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

impl CandleSource for RestClient {
    async fn day_stats(&self, symbol: &str) -> Result<serde_json::Value> {
        let url = format!("{}/api/v3/ticker/24hr", self.base_url);
        debug!(url = %url, symbol, "Fetching 24h statistics");

        let response = self
            .http
            .get(url)
            .query(&[("symbol", symbol)])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    async fn klines(&self, symbol: &str, interval: RangeToken) -> Result<Vec<serde_json::Value>> {
        let url = format!("{}/api/v3/klines", self.base_url);
        debug!(url = %url, symbol, interval = interval.as_str(), "Fetching klines");

        let response = self
            .http
            .get(url)
            .query(&[("symbol", symbol), ("interval", interval.as_str())])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}
