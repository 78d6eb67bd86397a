//! Configuration Module
//!
//! This module defines all configuration structures for the survey validator.
//! Configuration is loaded from TOML files and parsed using serde.

use anyhow::Context;
use serde::Deserialize;
use std::fs;

/// Main configuration structure
///
/// Loaded from a TOML file (e.g., config/default.toml).
///
/// # Example TOML
/// ```toml
/// [node]
/// legal_name = "O=Surveyor,L=New York,C=US"
///
/// [logging]
/// filter = "info"
///
/// [report]
/// format = "json"
/// run_prechecks = true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub node: NodeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Identity of the validating participant, used to tag verdicts
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    pub legal_name: String,
}

/// Logging configuration
///
/// `filter` uses the `tracing_subscriber::EnvFilter` directive syntax,
/// e.g. `"info"` or `"survey_contract=debug"`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

/// How verdicts are printed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,
    /// Run the caller-side price prechecks before validating
    #[serde(default)]
    pub run_prechecks: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read or the TOML is invalid
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading config file {}", path))?;
        Self::parse(&content).with_context(|| format!("parsing config file {}", path))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            [node]
            legal_name = "O=Surveyor,L=New York,C=US"

            [logging]
            filter = "survey_contract=debug"

            [report]
            format = "json"
            run_prechecks = true
            "#,
        )
        .unwrap();

        assert_eq!(config.node.legal_name, "O=Surveyor,L=New York,C=US");
        assert_eq!(config.logging.filter, "survey_contract=debug");
        assert_eq!(config.report.format, ReportFormat::Json);
        assert!(config.report.run_prechecks);
    }

    #[test]
    fn test_optional_sections_default() {
        let config = Config::parse(
            r#"
            [node]
            legal_name = "O=Buyer,L=London,C=GB"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.report.format, ReportFormat::Text);
        assert!(!config.report.run_prechecks);
    }

    #[test]
    fn test_missing_node_section_fails() {
        assert!(Config::parse("[logging]\nfilter = \"warn\"\n").is_err());
    }

    #[test]
    fn test_unknown_report_format_fails() {
        let result = Config::parse(
            r#"
            [node]
            legal_name = "O=Buyer,L=London,C=GB"

            [report]
            format = "yaml"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(Config::load("does/not/exist.toml").is_err());
    }
}
