//! Route handlers that adapt alert events into Sensu Go deliveries.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alert::AlertEvent;
use crate::diagnostic::Diagnostic;
use crate::service::{AlertRequest, Service};

/// Trait for handlers the alerting engine dispatches events to.
#[async_trait]
pub trait AlertHandler: Send + Sync {
    /// Handle one alert event. Failures are reported, never returned.
    async fn handle(&self, event: &AlertEvent);
}

/// Per-route options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Backend URL for this route. Deliveries currently always use the
    /// service URL.
    pub url: String,

    /// Namespace, empty for the service default.
    pub namespace: String,

    /// Metadata labels put on both the entity and the check.
    pub labels: HashMap<String, String>,

    /// Sensu Go handlers, empty for the service default.
    pub handlers: Vec<String>,

    /// Check name. Events always use their alert id.
    pub check: String,

    /// Static entity name.
    pub entity: String,

    /// Tag holding the entity name, consulted when `entity` is empty.
    #[serde(rename = "entity-tag")]
    pub entity_tag: String,
}

impl HandlerConfig {
    /// Entity name for an event carrying `tags`.
    ///
    /// Returns an empty name if neither a static entity nor the tag is
    /// available.
    #[must_use]
    pub fn resolve_entity(&self, tags: &HashMap<String, String>) -> String {
        if !self.entity.is_empty() {
            return self.entity.clone();
        }

        if self.entity_tag.is_empty() {
            return String::new();
        }

        tags.get(&self.entity_tag).cloned().unwrap_or_default()
    }
}

/// One route bound to a [`Service`].
pub struct Handler {
    service: Arc<Service>,
    config: HandlerConfig,
    diag: Arc<dyn Diagnostic>,
}

impl Handler {
    pub(crate) fn new(
        service: Arc<Service>,
        config: HandlerConfig,
        diag: Arc<dyn Diagnostic>,
    ) -> Self {
        Self {
            service,
            config,
            diag,
        }
    }

    /// Route options this handler was bound with.
    #[must_use]
    pub const fn config(&self) -> &HandlerConfig {
        &self.config
    }
}

#[async_trait]
impl AlertHandler for Handler {
    async fn handle(&self, event: &AlertEvent) {
        let entity = self.config.resolve_entity(&event.data.tags);

        let alert = AlertRequest {
            check: &event.state.id,
            entity: &entity,
            message: &event.state.message,
            namespace: &self.config.namespace,
            handlers: &self.config.handlers,
            labels: &self.config.labels,
            level: event.state.level,
        };

        match self.service.alert(&alert).await {
            Ok(()) => debug!(check = alert.check, entity = %entity, "Alert handled"),
            Err(err) => self
                .diag
                .error("failed to send event to Sensu Go", Some(&err), &[]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_entity_from_tag() {
        let config = HandlerConfig {
            entity_tag: "host".to_string(),
            ..HandlerConfig::default()
        };
        assert_eq!(config.resolve_entity(&tags(&[("host", "db1")])), "db1");
    }

    #[test]
    fn test_static_entity_wins() {
        let config = HandlerConfig {
            entity: "fixed".to_string(),
            entity_tag: "host".to_string(),
            ..HandlerConfig::default()
        };
        assert_eq!(config.resolve_entity(&tags(&[("host", "db1")])), "fixed");
        assert_eq!(config.resolve_entity(&tags(&[])), "fixed");
    }

    #[test]
    fn test_missing_tag_yields_empty_entity() {
        let config = HandlerConfig {
            entity_tag: "host".to_string(),
            ..HandlerConfig::default()
        };
        assert_eq!(config.resolve_entity(&tags(&[("region", "eu")])), "");
    }

    #[test]
    fn test_no_entity_rule() {
        let config = HandlerConfig::default();
        assert_eq!(config.resolve_entity(&tags(&[("host", "db1")])), "");
    }

    #[test]
    fn test_deserialize_route_options() {
        let config: HandlerConfig = serde_json::from_value(serde_json::json!({
            "namespace": "ops",
            "entity-tag": "host",
            "handlers": ["pagerduty"],
            "labels": { "team": "infra" }
        }))
        .unwrap();

        assert_eq!(config.namespace, "ops");
        assert_eq!(config.entity_tag, "host");
        assert_eq!(config.handlers, vec!["pagerduty"]);
        assert!(config.entity.is_empty());
    }
}
