//! Configuration management for the CLI.
//!
//! One TOML file holds both the CLI display settings (`[cli]`) and the
//! engine sections (`[engine]`, `[providers.*]`, `[extractor]`).

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use taskwise_engine::EngineConfig;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Display settings
    #[serde(default)]
    pub cli: Settings,

    /// Engine settings
    #[serde(flatten)]
    pub engine: EngineConfig,
}

/// Display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Default configuration file path (`~/.taskwise/config.toml`).
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".taskwise").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default path is used
    /// and a missing file yields the default configuration. Environment
    /// overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        config.engine.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Serialize to TOML with secrets redacted.
    pub fn to_redacted_toml(&self) -> Result<String> {
        let shown = Self {
            cli: self.cli.clone(),
            engine: self.engine.redacted(),
        };
        toml::to_string_pretty(&shown)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskwise_engine::ProviderMode;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.cli.color);
        assert_eq!(config.cli.format, OutputFormat::Table);
        assert_eq!(config.engine.engine.provider_mode, ProviderMode::Auto);
    }

    #[test]
    fn test_parse_combined_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
                [cli]
                format = "json"
                color = false

                [engine]
                provider_mode = "none"

                [extractor]
                max_tags = 2
            "#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.cli.format, OutputFormat::Json);
        assert!(!config.cli.color);
        assert_eq!(config.engine.engine.provider_mode, ProviderMode::None);
        assert_eq!(config.engine.extractor.max_tags, 2);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_redacted_output_hides_keys() {
        let mut config = Config::default();
        config.engine.providers.gemini.api_key = Some("g-secret".to_string());

        let shown = config.to_redacted_toml().unwrap();
        assert!(!shown.contains("g-secret"));
        assert!(shown.contains("[providers.gemini]"));
    }
}
