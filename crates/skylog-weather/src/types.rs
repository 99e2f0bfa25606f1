use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Measurement unit system sent to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitSystem {
    /// Value of the `units` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Imperial => "imperial",
            Self::Metric => "metric",
        }
    }

    /// Temperature symbol shown alongside readings
    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Self::Imperial => "°F",
            Self::Metric => "°C",
        }
    }

    /// Wind speed unit suffix
    pub fn wind_unit(&self) -> &'static str {
        match self {
            Self::Imperial => "mph",
            Self::Metric => "m/s",
        }
    }
}

/// Which provider endpoint a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Current,
    Forecast,
}

/// Fingerprint identifying a cacheable request.
///
/// The location is lower-cased so "London" and "london" share a cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    location: String,
    units: UnitSystem,
    kind: ResourceKind,
}

impl RequestKey {
    pub fn new(location: &str, units: UnitSystem, kind: ResourceKind) -> Self {
        Self {
            location: location.to_lowercase(),
            units,
            kind,
        }
    }
}

/// A normalized weather observation.
///
/// Produced by [`crate::normalize`] from a raw provider payload; immutable
/// once created and owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub city: String,
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity: i64,
    pub description: String,
    /// Numeric value plus unit suffix, e.g. `"12.5 mph"`
    pub wind_speed: String,
    /// Temperature symbol, `°F` or `°C`
    pub unit: String,
}

/// Fetch-layer errors.
///
/// Every failed request collapses to exactly one of these; only `Timeout`
/// is retried, everything else terminates the retry loop on first occurrence.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid API key. Check your credentials.")]
    Authentication,

    #[error("City not found. Please check the city name.")]
    NotFound,

    #[error("API rate limit exceeded. Please wait and try again.")]
    RateLimit,

    #[error("Unexpected error: {0}")]
    UnexpectedStatus(u16),

    #[error("Request timed out. Please check your connection.")]
    Timeout,

    #[error("Network connection error. Please try again.")]
    Connection,

    #[error("An unknown error occurred. Please try again later.")]
    Unknown,

    #[error("Failed after multiple attempts.")]
    RetriesExhausted,
}

impl FetchError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            401 => Self::Authentication,
            404 => Self::NotFound,
            429 => Self::RateLimit,
            code => Self::UnexpectedStatus(code),
        }
    }

    /// Classify a transport-level failure
    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connection
        } else {
            Self::Unknown
        }
    }

    /// Whether another attempt may succeed. Only timeouts are retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}
