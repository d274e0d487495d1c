//! TOML configuration for the `regchange` binary.
//!
//! ```toml
//! [service]
//! backend = "sqlite"
//! connection_string = "registrations.db"
//!
//! [wizard]
//! min_registrant_id_len = 15
//! currency_symbol = "$"
//!
//! [logging]
//! level = "debug"
//! file = "regchange.log"
//! ```
//!
//! Every table and key is optional.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use regchange_core::WizardSettings;
use regchange_core::service::ServiceConfig;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "regchange.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive; ignored when `RUST_LOG` is set.
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub wizard: WizardSettings,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid configuration")
    }

    /// Reads `path`, or `regchange.toml` when present, or falls back to
    /// defaults. An explicit path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.service.backend, "sqlite");
        assert_eq!(config.wizard.min_registrant_id_len, 15);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [service]
            connection_string = "registrations.db"

            [wizard]
            currency_symbol = "€"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.service.backend, "sqlite");
        assert_eq!(config.service.connection_string, "registrations.db");
        assert_eq!(config.wizard.currency_symbol, "€");
        assert_eq!(config.wizard.min_contact_search_len, 2);
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.file, None);
    }

    #[test]
    fn unknown_value_type_is_an_error() {
        let err = AppConfig::from_toml_str("[wizard]\nmin_registrant_id_len = \"long\"");
        assert!(err.is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/regchange.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read config file"));
    }
}
