//! Service-wide connection defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::handler::HandlerConfig;

/// Connection defaults shared by every route bound to the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Whether Sensu Go delivery is enabled.
    pub enabled: bool,
    /// Events API endpoint the alerts are posted to.
    pub url: String,
    /// Sent verbatim as the `Authorization` header.
    pub token: String,
    /// Default namespace.
    pub namespace: String,
    /// Default Sensu Go handlers.
    pub handlers: Vec<String>,
}

impl Config {
    /// Check that an enabled service has a backend URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingUrl`] when `enabled` is set and `url` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.url.is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        Ok(())
    }

    /// Parse the `[sensugo]` table of a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or the config
    /// does not validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file = ConfigFile::from_toml_str(s)?;
        Ok(file.sensugo)
    }

    /// Load the `[sensugo]` table from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the config
    /// does not validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(ConfigFile::load(path)?.sensugo)
    }
}

/// Layout of the config file read by the binary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Service defaults.
    pub sensugo: Config,
    /// Route options used by `send`.
    pub handler: HandlerConfig,
}

impl ConfigFile {
    /// Parse a whole config document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or the service
    /// config does not validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: Self = toml::from_str(s)?;
        file.sensugo.validate()?;
        Ok(file)
    }

    /// Read and parse a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_requires_url() {
        let config = Config {
            enabled: true,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingUrl)));
    }

    #[test]
    fn test_disabled_without_url_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = Config::from_toml_str(
            r#"
            [sensugo]
            enabled = true
            url = "http://sensu:8080/api/core/v2/namespaces/default/events"
            token = "Key abc"
            namespace = "default"
            handlers = ["slack", "pagerduty"]
            "#,
        )
        .unwrap();

        assert!(config.enabled);
        assert_eq!(config.token, "Key abc");
        assert_eq!(config.handlers, vec!["slack", "pagerduty"]);
    }

    #[test]
    fn test_parse_handler_table() {
        let file = ConfigFile::from_toml_str(
            r#"
            [sensugo]
            url = "http://sensu:8080"

            [handler]
            namespace = "ops"
            entity-tag = "host"
            labels = { team = "infra" }
            "#,
        )
        .unwrap();

        assert!(!file.sensugo.enabled);
        assert_eq!(file.handler.namespace, "ops");
        assert_eq!(file.handler.entity_tag, "host");
        assert_eq!(file.handler.labels.get("team").map(String::as_str), Some("infra"));
    }

    #[test]
    fn test_parse_rejects_enabled_without_url() {
        let err = Config::from_toml_str("[sensugo]\nenabled = true\n").unwrap_err();
        assert_eq!(err.to_string(), "must specify backend URL");
    }

    #[test]
    fn test_example_config() {
        let file = ConfigFile::from_toml_str(include_str!("../sensugo.example.toml")).unwrap();
        assert!(file.sensugo.enabled);
        assert_eq!(file.handler.entity_tag, "host");
    }

    #[test]
    fn test_parse_rejects_unknown_option() {
        let err = Config::from_toml_str("[sensugo]\nurll = \"http://sensu\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_table_is_disabled_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }
}
