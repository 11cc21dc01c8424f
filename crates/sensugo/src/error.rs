//! Error types for the Sensu Go handler.

use thiserror::Error;

/// Errors raised while loading or replacing the service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The service is enabled but has no backend URL
    #[error("must specify backend URL")]
    MissingUrl,

    /// The management channel sent zero or several config objects
    #[error("expected only one new config object, got {0}")]
    Count(usize),

    /// A config object did not have the expected shape
    #[error("expected config object to be of type Config: {0}")]
    Shape(#[source] serde_json::Error),

    /// The config file could not be parsed
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when delivering an alert.
#[derive(Debug, Error)]
pub enum SensuError {
    /// Delivery attempted while the service is disabled
    #[error("service is not enabled")]
    Disabled,

    /// The outbound event could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request did not complete before the deadline
    #[error("POST to Sensu Go timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}
