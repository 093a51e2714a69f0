//! Configuration file support.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/labexam/config.toml`.

use crate::pdf::Orientation;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Report rendering configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub orientation: Orientation,

    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            date_format: default_date_format(),
        }
    }
}

/// Presentation theme
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Interface configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: Theme,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("labexam")
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("no config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("labexam").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        tracing::info!("saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.report.orientation, Orientation::Portrait);
        assert_eq!(config.report.date_format, "%d/%m/%Y");
        assert_eq!(config.ui.theme, Theme::Light);
        assert!(config.data.data_dir.ends_with("labexam"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.report.orientation = Orientation::Landscape;
        config.ui.theme = Theme::Dark;

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.report.orientation, Orientation::Landscape);
        assert_eq!(parsed.ui.theme, Theme::Dark);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[report]
orientation = "landscape"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.report.orientation, Orientation::Landscape);
        assert_eq!(config.report.date_format, "%d/%m/%Y"); // default
        assert_eq!(config.ui.theme, Theme::Light); // default
    }
}
