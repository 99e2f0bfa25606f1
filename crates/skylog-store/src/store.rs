//! SQLite-backed weather store.
//!
//! Hosts the append-only observation history plus the preferences and
//! achievements key-value tables. The achievements table is written by
//! external collaborators; the store assigns no meaning to its contents.

use chrono::Utc;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::StoreError;
use skylog_core::Config;
use skylog_weather::stats::{statistics, WeatherStats};
use skylog_weather::types::WeatherReading;

/// A persisted weather observation.
///
/// The id and timestamp are assigned by the store at append time; records
/// are never mutated afterwards. Field order matches the exported CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub city: String,
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity: i64,
    pub description: String,
    pub wind_speed: String,
    pub unit: String,
    pub timestamp: String,
}

/// SQLite-backed store for weather history and preferences.
pub struct WeatherStore {
    conn: Connection,
}

impl WeatherStore {
    /// Open (or create) a store at the given path.
    ///
    /// Parent directories are created as needed. Re-opening an existing
    /// database keeps its data; schema creation is idempotent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open the store at the configured database path.
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        Self::open(&config.database_path)
    }

    /// Create an in-memory store (tests, ephemeral use).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS weather_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                city TEXT,
                temperature INTEGER,
                feels_like INTEGER,
                humidity INTEGER,
                description TEXT,
                wind_speed TEXT,
                unit TEXT,
                timestamp TEXT
            );

            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT
            );

            CREATE TABLE IF NOT EXISTS achievements (
                name TEXT PRIMARY KEY,
                value TEXT
            );
            "#,
        )?;
        Ok(())
    }

    /// Append a normalized reading to the history.
    ///
    /// Assigns a strictly increasing id and the current timestamp, and
    /// commits before returning the stored record.
    pub fn append(&self, reading: &WeatherReading) -> Result<HistoryRecord, StoreError> {
        let timestamp = Utc::now().to_rfc3339();

        self.conn.execute(
            r#"
            INSERT INTO weather_history (city, temperature, feels_like, humidity, description, wind_speed, unit, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                reading.city,
                reading.temperature,
                reading.feels_like,
                reading.humidity,
                reading.description,
                reading.wind_speed,
                reading.unit,
                timestamp,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, city = %reading.city, "recorded weather observation");

        Ok(HistoryRecord {
            id,
            city: reading.city.clone(),
            temperature: reading.temperature,
            feels_like: reading.feels_like,
            humidity: reading.humidity,
            description: reading.description.clone(),
            wind_speed: reading.wind_speed.clone(),
            unit: reading.unit.clone(),
            timestamp,
        })
    }

    /// All history records in insertion order.
    pub fn history(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, city, temperature, feels_like, humidity, description, wind_speed, unit, timestamp
             FROM weather_history
             ORDER BY id",
        )?;

        let rows = stmt.query_map([], Self::row_to_record)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Summary statistics over the persisted temperature history.
    ///
    /// `None` when no observations have been recorded yet.
    pub fn statistics(&self) -> Result<Option<WeatherStats>, StoreError> {
        let temps: Vec<i64> = self.history()?.iter().map(|r| r.temperature).collect();
        Ok(statistics(&temps))
    }

    /// Upsert a preference value.
    pub fn set_preference(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "REPLACE INTO preferences (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Look up a single preference.
    pub fn preference(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM preferences WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// All stored preferences.
    pub fn preferences(&self) -> Result<HashMap<String, String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT key, value FROM preferences")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<Result<HashMap<_, _>, _>>()?)
    }

    /// Upsert an achievement value. Semantics belong to the caller.
    pub fn set_achievement(&self, name: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "REPLACE INTO achievements (name, value) VALUES (?1, ?2)",
            params![name, value],
        )?;
        Ok(())
    }

    /// All stored achievements.
    pub fn achievements(&self) -> Result<HashMap<String, String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT name, value FROM achievements")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<Result<HashMap<_, _>, _>>()?)
    }

    /// Export the full history as CSV, one row per record in insertion
    /// order, header first.
    ///
    /// Returns the number of records written. An empty store writes
    /// nothing, leaves the filesystem untouched, and returns 0.
    pub fn export_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize, StoreError> {
        let records = self.history()?;
        if records.is_empty() {
            tracing::info!("nothing to export");
            return Ok(0);
        }

        let mut writer = csv::Writer::from_path(path)?;
        for record in &records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        tracing::info!(count = records.len(), "exported weather history");
        Ok(records.len())
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<HistoryRecord> {
        Ok(HistoryRecord {
            id: row.get(0)?,
            city: row.get(1)?,
            temperature: row.get(2)?,
            feels_like: row.get(3)?,
            humidity: row.get(4)?,
            description: row.get(5)?,
            wind_speed: row.get(6)?,
            unit: row.get(7)?,
            timestamp: row.get(8)?,
        })
    }
}
