//! Durable storage for Skylog.
//!
//! SQLite-backed history of weather readings plus key-value preference and
//! achievement tables, with CSV export of the full history.

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::{HistoryRecord, WeatherStore};
