use crate::core::config::AppConfig;
use crate::core::currency::{CurrencyCode, DEFAULT_DESTINATION, DEFAULT_ORIGIN};
use anyhow::Result;
use std::path::Path;

/// Creates a default configuration file at the default location
pub fn setup() -> Result<()> {
    let path = AppConfig::default_config_path()?;
    setup_at_path(path)
}

/// Creates a default configuration file at the specified path
pub fn setup_at_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    let mut config = AppConfig::default();
    config.remember_pair(
        &CurrencyCode::new(DEFAULT_ORIGIN),
        &CurrencyCode::new(DEFAULT_DESTINATION),
    );
    config.save_to_path(path)?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
