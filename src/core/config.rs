use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use tracing::{debug, error, info, warn};

use crate::core::currency::{CurrencyCode, DEFAULT_DESTINATION, DEFAULT_ORIGIN};

pub const DEFAULT_BASE_URL: &str = "https://economia.awesomeapi.com.br";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Persisted settings. `origem`/`destino` hold the last selected pair.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destino: Option<String>,
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl AppConfig {
    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("br", "cambio", "cambio")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_json::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Loads the config, falling back to defaults when the file is missing or
    /// unreadable. Never fails.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "Config file '{}' not found. Using defaults: {} and {}",
                path.display(),
                DEFAULT_ORIGIN,
                DEFAULT_DESTINATION
            );
            return Self::default();
        }

        match Self::load_from_path(path) {
            Ok(config) => {
                info!("Configuration loaded from {}", path.display());
                config
            }
            Err(e) => {
                error!("Failed to load configuration: {e:#}");
                Self::default()
            }
        }
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file to {}", path.display()))?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// The persisted pair, replacing unknown or missing codes with defaults.
    pub fn selected_pair(&self) -> (CurrencyCode, CurrencyCode) {
        let pick = |saved: Option<&String>, fallback: &str| {
            saved
                .and_then(|code| code.parse::<CurrencyCode>().ok())
                .unwrap_or_else(|| CurrencyCode::new(fallback))
        };
        (
            pick(self.origem.as_ref(), DEFAULT_ORIGIN),
            pick(self.destino.as_ref(), DEFAULT_DESTINATION),
        )
    }

    pub fn remember_pair(&mut self, origin: &CurrencyCode, destination: &CurrencyCode) {
        self.origem = Some(origin.to_string());
        self.destino = Some(destination.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_deserialization() {
        let json_str = r#"{ "origem": "EUR", "destino": "JPY" }"#;

        let config: AppConfig = serde_json::from_str(json_str).expect("Failed to deserialize");
        assert_eq!(config.origem.as_deref(), Some("EUR"));
        assert_eq!(config.destino.as_deref(), Some("JPY"));
        assert_eq!(config.provider, ProviderConfig::default());
        assert_eq!(config.provider.base_url, "https://economia.awesomeapi.com.br");
        assert_eq!(config.provider.timeout_secs, 10);

        let json_with_provider = r#"{
            "provider": { "base_url": "http://example.com/quotes" }
        }"#;
        let config: AppConfig = serde_json::from_str(json_with_provider).unwrap();
        assert!(config.origem.is_none());
        assert_eq!(config.provider.base_url, "http://example.com/quotes");
        assert_eq!(config.provider.timeout_secs, 10);
    }

    #[test]
    fn test_selected_pair_falls_back_per_field() {
        let config = AppConfig {
            origem: Some("gbp".to_string()),
            destino: Some("XYZ".to_string()),
            ..AppConfig::default()
        };
        let (origin, destination) = config.selected_pair();
        assert_eq!(origin.as_str(), "GBP");
        assert_eq!(destination.as_str(), "BRL");

        let (origin, destination) = AppConfig::default().selected_pair();
        assert_eq!(origin.as_str(), "USD");
        assert_eq!(destination.as_str(), "BRL");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load_or_default(temp_dir.path().join("config.json"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_uses_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json")?;

        assert!(AppConfig::load_from_path(&path).is_err());
        assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());
        Ok(())
    }

    #[test]
    fn test_save_and_reload_pair() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.remember_pair(&CurrencyCode::new("CAD"), &CurrencyCode::new("AUD"));
        config.save_to_path(&path)?;

        let content = fs::read_to_string(&path)?;
        assert!(content.contains(r#""origem": "CAD""#));
        assert!(content.contains(r#""destino": "AUD""#));

        let reloaded = AppConfig::load_from_path(&path)?;
        assert_eq!(reloaded, config);
        Ok(())
    }
}
