//! HTTP client for the weather provider.
//!
//! Wraps the provider's current-weather and forecast endpoints with response
//! caching and a retry policy. Only timed-out attempts are retried; every
//! other failure is terminal on first occurrence so callers see a stable
//! attempt count per error class.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::cache::ResponseCache;
use crate::types::{FetchError, RequestKey, ResourceKind, UnitSystem};
use skylog_core::Config;

const CURRENT_WEATHER_URL: &str = "http://api.openweathermap.org/data/2.5/weather";
const FORECAST_URL: &str = "http://api.openweathermap.org/data/2.5/forecast";

/// Client for the weather provider API.
///
/// Owns its response cache; no process-wide state.
#[derive(Debug)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    timeout: Duration,
    max_retries: u32,
    current_url: String,
    forecast_url: String,
    cache: Mutex<ResponseCache>,
}

impl WeatherClient {
    /// Create a client from application configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
            max_retries: config.max_retries,
            current_url: CURRENT_WEATHER_URL.to_string(),
            forecast_url: FORECAST_URL.to_string(),
            cache: Mutex::new(ResponseCache::new(Duration::from_secs(
                config.cache_ttl_secs,
            ))),
        })
    }

    /// Replace the response cache (e.g. one with a custom TTL).
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Mutex::new(cache);
        self
    }

    /// Override the provider endpoints. Used to point at a mock server.
    pub fn with_base_urls(
        mut self,
        current_url: impl Into<String>,
        forecast_url: impl Into<String>,
    ) -> Self {
        self.current_url = current_url.into();
        self.forecast_url = forecast_url.into();
        self
    }

    /// Override the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch current weather for a location.
    pub async fn fetch_current(
        &self,
        location: &str,
        units: UnitSystem,
    ) -> Result<Value, FetchError> {
        self.fetch(location, units, ResourceKind::Current).await
    }

    /// Fetch forecast data for a location.
    pub async fn fetch_forecast(
        &self,
        location: &str,
        units: UnitSystem,
    ) -> Result<Value, FetchError> {
        self.fetch(location, units, ResourceKind::Forecast).await
    }

    /// Fetch a raw payload, consulting the cache first.
    ///
    /// A cache hit returns immediately with no network call. On a miss, up
    /// to `max_retries` attempts are made; a successful response populates
    /// the cache before returning.
    pub async fn fetch(
        &self,
        location: &str,
        units: UnitSystem,
        kind: ResourceKind,
    ) -> Result<Value, FetchError> {
        let key = RequestKey::new(location, units, kind);

        let cached = self.cache.lock().lookup(&key);
        if let Some(payload) = cached {
            return Ok(payload);
        }

        for attempt in 1..=self.max_retries {
            match self.request_once(location, units, kind).await {
                Ok(payload) => {
                    self.cache.lock().store(key, payload.clone());
                    return Ok(payload);
                }
                Err(err) if err.is_retryable() => {
                    tracing::warn!(attempt, location, "request timed out");
                    if attempt == self.max_retries {
                        return Err(err);
                    }
                }
                Err(err) => {
                    tracing::error!(location, error = %err, "request failed");
                    return Err(err);
                }
            }
        }

        // Unreachable with max_retries > 0, kept as a guard
        Err(FetchError::RetriesExhausted)
    }

    async fn request_once(
        &self,
        location: &str,
        units: UnitSystem,
        kind: ResourceKind,
    ) -> Result<Value, FetchError> {
        let url = match kind {
            ResourceKind::Current => &self.current_url,
            ResourceKind::Forecast => &self.forecast_url,
        };

        let response = self
            .client
            .get(url.as_str())
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", units.as_query()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::from_status(status));
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::from_transport(&e))
    }
}
