use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: "https://api.frankfurter.app".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default = "default_display_currencies")]
    pub display_currencies: Vec<String>,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Directory for CSV exports. Defaults to the current directory.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_display_currencies() -> Vec<String> {
    [
        "EUR", "GBP", "JPY", "CHF", "CAD", "AUD", "CNY", "TRY", "INR", "BRL", "MXN", "ZAR",
    ]
    .iter()
    .map(|code| code.to_string())
    .collect()
}

fn default_refresh_interval_secs() -> u64 {
    60
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            base_currency: default_base_currency(),
            display_currencies: default_display_currencies(),
            refresh_interval_secs: default_refresh_interval_secs(),
            export_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default path, falling back to built-in
    /// defaults when no config file has been set up yet.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "fxt")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_apply_for_absent_fields() {
        let yaml_str = r#"
base_currency: "EUR"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.base_currency, "EUR");
        assert_eq!(config.provider.base_url, "https://api.frankfurter.app");
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.display_currencies.len(), 12);
        assert!(config.display_currencies.contains(&"JPY".to_string()));
        assert!(config.export_dir.is_none());
    }

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  base_url: "http://example.com/rates"
base_currency: "GBP"
display_currencies: [EUR, USD]
refresh_interval_secs: 30
export_dir: "/tmp/exports"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://example.com/rates");
        assert_eq!(config.base_currency, "GBP");
        assert_eq!(config.display_currencies, vec!["EUR", "USD"]);
        assert_eq!(config.refresh_interval_secs, 30);
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/exports")));
    }
}
