//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.scoreagg.toml` files.

use crate::cli::OutputFormat;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".scoreagg.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Record source settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Target name used when `--target` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_target: Option<String>,
}

/// Where records are read from when no source is given on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to a JSON or TOML record file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_file: Option<PathBuf>,
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Include the per-name summary table.
    #[serde(default)]
    pub show_summaries: bool,

    /// Maximum rows in the summary table.
    #[serde(default = "default_top")]
    pub top: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            show_summaries: false,
            top: default_top(),
        }
    }
}

fn default_top() -> usize {
    10
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Check value ranges that the TOML types alone cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.report.top == 0 {
            bail!("report.top must be at least 1");
        }
        if let Some(ref target) = self.general.default_target {
            if target.trim().is_empty() {
                bail!("general.default_target must not be empty");
            }
        }
        Ok(())
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.scoreagg.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref target) = args.target {
            self.general.default_target = Some(target.clone());
        }

        if let Some(ref input) = args.input {
            self.input.records_file = Some(input.clone());
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(top) = args.top {
            self.report.top = top;
        }

        // Flags always override
        if args.all {
            self.report.show_summaries = true;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.general.verbose);
        assert_eq!(config.general.default_target, None);
        assert_eq!(config.input.records_file, None);
        assert_eq!(config.report.format, OutputFormat::Text);
        assert_eq!(config.report.top, 10);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true
default_target = "Alice"

[input]
records_file = "data/scores.json"

[report]
format = "json"
show_summaries = true
top = 3
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.general.default_target.as_deref(), Some("Alice"));
        assert_eq!(
            config.input.records_file,
            Some(PathBuf::from("data/scores.json"))
        );
        assert_eq!(config.report.format, OutputFormat::Json);
        assert!(config.report.show_summaries);
        assert_eq!(config.report.top, 3);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[report]\nshow_summaries = true\n").unwrap();
        assert!(config.report.show_summaries);
        assert_eq!(config.report.top, 10);
        assert_eq!(config.report.format, OutputFormat::Text);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("format = \"text\""));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.report.top, 10);
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        config.general.default_target = Some("Bob".to_string());
        config.report.top = 3;

        let mut args = make_args();
        args.target = Some("Alice".to_string());
        args.format = Some(OutputFormat::Json);
        args.all = true;

        config.merge_with_args(&args);

        assert_eq!(config.general.default_target.as_deref(), Some("Alice"));
        assert_eq!(config.report.format, OutputFormat::Json);
        assert!(config.report.show_summaries);
        assert_eq!(config.report.top, 3);
    }

    #[test]
    fn test_merge_keeps_config_when_args_absent() {
        let mut config = Config::default();
        config.general.default_target = Some("Bob".to_string());
        config.input.records_file = Some(PathBuf::from("scores.toml"));

        config.merge_with_args(&make_args());

        assert_eq!(config.general.default_target.as_deref(), Some("Bob"));
        assert_eq!(config.input.records_file, Some(PathBuf::from("scores.toml")));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[general]\ndefault_target = \"Charlie\"\n",
        )
        .unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.general.default_target.as_deref(), Some("Charlie"));
    }

    #[test]
    fn test_load_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[report]\ntop = \"many\"\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_rejects_zero_top() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[report]\nshow_summaries = true\ntop = 0\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
        assert!(format!("{:#}", err).contains("report.top must be at least 1"));
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let mut config: Config = toml::from_str("[report]\ntop = 0\n").unwrap();
        assert!(config.validate().is_err());

        config.report.top = 1;
        assert!(config.validate().is_ok());

        config.general.default_target = Some(" ".to_string());
        assert!(config.validate().is_err());
    }
}
