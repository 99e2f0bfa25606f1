pub mod config;

pub use config::{Config, ConfigValidationError, ValidationResult};

use anyhow::Result;

/// Initialize logging for the application.
///
/// Call once at startup, before any component is constructed.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Skylog core initialized");
    Ok(())
}
