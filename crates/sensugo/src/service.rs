//! Delivery of alerts to the Sensu Go events API.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{de::Error as _, Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::diagnostic::Diagnostic;
use crate::error::{ConfigError, SensuError};
use crate::event::PostEvent;
use crate::handler::{Handler, HandlerConfig};
use crate::level::Level;

/// Deadline for a single POST, measured from request creation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Fully resolved fields of one alert delivery.
///
/// Empty `namespace` and `handlers` fall back to the service defaults.
#[derive(Debug, Clone, Copy)]
pub struct AlertRequest<'a> {
    /// Check name
    pub check: &'a str,
    /// Entity name, may be empty
    pub entity: &'a str,
    /// Check output
    pub message: &'a str,
    /// Namespace override
    pub namespace: &'a str,
    /// Sensu Go handlers override
    pub handlers: &'a [String],
    /// Labels for both the entity and the check
    pub labels: &'a HashMap<String, String>,
    /// Severity, mapped to the check status
    pub level: Level,
}

/// Canned values used to exercise the delivery path end to end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestOptions {
    pub check: String,
    pub entity: String,
    pub entity_tag: String,
    pub message: String,
    pub namespace: String,
    pub handlers: Vec<String>,
    pub labels: HashMap<String, String>,
    pub level: Level,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            check: "testName".to_string(),
            entity: "testEntity".to_string(),
            entity_tag: "testEntityTag".to_string(),
            message: "testMessage".to_string(),
            namespace: "test".to_string(),
            handlers: vec![],
            labels: HashMap::new(),
            level: Level::Critical,
        }
    }
}

impl TestOptions {
    /// Borrow these options as an alert.
    #[must_use]
    pub fn request(&self) -> AlertRequest<'_> {
        AlertRequest {
            check: &self.check,
            entity: &self.entity,
            message: &self.message,
            namespace: &self.namespace,
            handlers: &self.handlers,
            labels: &self.labels,
            level: self.level,
        }
    }
}

/// Posts alerts to Sensu Go using a hot-swappable configuration.
///
/// Every call to [`Service::alert`] takes one snapshot of the configuration
/// and uses it for the whole delivery; [`Service::update`] publishes a new
/// snapshot without disturbing calls already in flight.
pub struct Service {
    config: RwLock<Arc<Config>>,
    diag: Arc<dyn Diagnostic>,
    client: reqwest::Client,
    timeout: Duration,
}

impl Service {
    /// Create a service with the initial configuration.
    #[must_use]
    pub fn new(config: Config, diag: Arc<dyn Diagnostic>) -> Self {
        Self {
            config: RwLock::new(Arc::new(config)),
            diag,
            client: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the request deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Lifecycle hook called by the host when the service starts.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the host's service contract.
    #[allow(clippy::unused_self)]
    pub const fn open(&self) -> Result<(), SensuError> {
        Ok(())
    }

    /// Lifecycle hook called by the host when the service stops.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the host's service contract.
    #[allow(clippy::unused_self)]
    pub const fn close(&self) -> Result<(), SensuError> {
        Ok(())
    }

    /// Current configuration snapshot.
    #[must_use]
    pub fn config(&self) -> Arc<Config> {
        let guard = self.config.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the configuration wholesale.
    pub fn set(&self, config: Config) {
        let config = Arc::new(config);
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    /// Apply a configuration update from the management channel.
    ///
    /// # Errors
    ///
    /// Fails unless exactly one payload is given, the payload is an object
    /// holding only [`Config`] options and that config validates. The
    /// current configuration is left untouched on failure.
    pub fn update(&self, payloads: Vec<serde_json::Value>) -> Result<(), ConfigError> {
        let [payload] = <[serde_json::Value; 1]>::try_from(payloads)
            .map_err(|payloads| ConfigError::Count(payloads.len()))?;

        // Structs also deserialize from sequences; only objects are configs.
        if !payload.is_object() {
            return Err(ConfigError::Shape(serde_json::Error::custom(format!(
                "expected a config object, got {payload}"
            ))));
        }

        let config: Config = serde_json::from_value(payload).map_err(ConfigError::Shape)?;
        config.validate()?;

        debug!(enabled = config.enabled, url = %config.url, "Sensu Go config updated");
        self.set(config);
        Ok(())
    }

    /// Values for [`Service::test`].
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn test_options(&self) -> TestOptions {
        TestOptions::default()
    }

    /// Send a test alert built from `options`.
    ///
    /// # Errors
    ///
    /// Returns whatever [`Service::alert`] returns.
    pub async fn test(&self, options: &TestOptions) -> Result<(), SensuError> {
        self.alert(&options.request()).await
    }

    /// Post one alert to Sensu Go.
    ///
    /// A non-2xx response is reported through the diagnostics sink but is
    /// not an error: the event reached the backend.
    ///
    /// # Errors
    ///
    /// - [`SensuError::Disabled`] without touching the network when the
    ///   service is disabled
    /// - [`SensuError::Serialization`] if the event cannot be encoded
    /// - [`SensuError::Timeout`] if the deadline expires
    /// - [`SensuError::Http`] on any other transport failure
    pub async fn alert(&self, alert: &AlertRequest<'_>) -> Result<(), SensuError> {
        let config = self.config();

        if !config.enabled {
            return Err(SensuError::Disabled);
        }

        let namespace = if alert.namespace.is_empty() {
            config.namespace.as_str()
        } else {
            alert.namespace
        };

        let handlers = if alert.handlers.is_empty() {
            config.handlers.as_slice()
        } else {
            alert.handlers
        };

        let event = PostEvent::new(alert, namespace, handlers, Utc::now());
        let body = serde_json::to_vec(&event)?;

        debug!(
            check = alert.check,
            entity = alert.entity,
            status = event.check.status,
            "Sending event to Sensu Go"
        );

        let result = self
            .client
            .post(config.url.as_str())
            .header(AUTHORIZATION, config.token.as_str())
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.timeout)
            .body(body)
            .send()
            .await;

        let mut response = result.map_err(|err| self.transport_error(err))?;
        let status = response.status();

        // Release the connection whatever the status. The deadline still
        // applies while the body is read.
        while response
            .chunk()
            .await
            .map_err(|err| self.transport_error(err))?
            .is_some()
        {}

        if status.is_success() {
            debug!(status = %status, "Event sent to Sensu Go");
        } else {
            let code = status.as_u16().to_string();
            self.diag.error(
                &format!("POST returned non 2xx status code ({code})"),
                None,
                &[("code", code.as_str())],
            );
        }

        Ok(())
    }

    /// Report a failed POST and classify it.
    fn transport_error(&self, err: reqwest::Error) -> SensuError {
        self.diag.error("failed to POST to Sensu Go", Some(&err), &[]);
        if err.is_timeout() {
            SensuError::Timeout(self.timeout)
        } else {
            SensuError::Http(err)
        }
    }

    /// Bind a route to this service.
    ///
    /// `ctx` is attached to every diagnostic the handler reports.
    #[must_use]
    pub fn handler(self: &Arc<Self>, config: HandlerConfig, ctx: &[(&str, &str)]) -> Handler {
        Handler::new(Arc::clone(self), config, self.diag.with_context(ctx))
    }
}
