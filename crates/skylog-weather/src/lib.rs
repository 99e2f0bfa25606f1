//! Weather fetching and processing for Skylog
//!
//! Provides the provider HTTP client with response caching and retry,
//! payload normalization, and trend statistics over observed temperatures.

pub mod cache;
pub mod client;
pub mod normalize;
pub mod stats;
pub mod types;

pub use cache::ResponseCache;
pub use client::WeatherClient;
pub use normalize::normalize;
pub use stats::{convert_temperature, statistics, trend, Trend, WeatherStats};
pub use types::{FetchError, RequestKey, ResourceKind, UnitSystem, WeatherReading};
