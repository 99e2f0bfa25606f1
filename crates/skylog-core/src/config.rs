use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Application configuration.
///
/// Holds the credential, storage location and request tuning consumed by
/// the weather client and store constructors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API key used to authenticate with the weather provider
    pub api_key: String,

    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Max wait time in seconds before a single request attempt is aborted
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Number of request attempts for timed-out requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Seconds a cached provider response stays valid
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skylog")
        .join("weather.db")
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_cache_ttl_secs() -> u64 {
    600
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            database_path: default_database_path(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Config {
    /// Build configuration from environment variables.
    ///
    /// `WEATHER_API_KEY` is required; `DATABASE_PATH`, `REQUEST_TIMEOUT`,
    /// `MAX_RETRIES` and `CACHE_TTL` override the defaults when set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("WEATHER_API_KEY")
            .context("WEATHER_API_KEY environment variable required")?;

        let mut config = Self {
            api_key,
            ..Self::default()
        };

        if let Ok(path) = std::env::var("DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }
        if let Ok(timeout) = std::env::var("REQUEST_TIMEOUT") {
            config.request_timeout_secs = timeout
                .parse()
                .context("REQUEST_TIMEOUT must be a number of seconds")?;
        }
        if let Ok(retries) = std::env::var("MAX_RETRIES") {
            config.max_retries = retries
                .parse()
                .context("MAX_RETRIES must be an integer")?;
        }
        if let Ok(ttl) = std::env::var("CACHE_TTL") {
            config.cache_ttl_secs = ttl
                .parse()
                .context("CACHE_TTL must be a number of seconds")?;
        }

        Ok(config)
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.api_key.trim().is_empty() {
            result.add_error("api_key", "API key must not be empty");
        }

        if self.request_timeout_secs == 0 {
            result.add_error(
                "request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.request_timeout_secs > 300 {
            result.add_warning(
                "request_timeout_secs",
                "Request timeout is unusually long (>5 minutes)",
            );
        }

        if self.max_retries == 0 {
            result.add_warning(
                "max_retries",
                "No request attempts will be made (0 retries)",
            );
        }

        if self.cache_ttl_secs == 0 {
            result.add_warning("cache_ttl_secs", "Response caching disabled (0 seconds)");
        }

        if self.database_path.as_os_str().is_empty() {
            result.add_error("database_path", "Database path must not be empty");
        }

        result
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skylog");

        Ok(config_dir.join("config.toml"))
    }
}
