//! Event posted to the Sensu Go events API.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::service::AlertRequest;

/// Entity class of every entity created by this handler.
pub const ENTITY_CLASS_PROXY: &str = "proxy";

/// Request body of `POST /events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostEvent {
    /// Monitored resource the check result belongs to
    pub entity: Entity,
    /// The check result itself
    pub check: Check,
}

/// Entity section of a [`PostEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    /// Always [`ENTITY_CLASS_PROXY`]
    pub entity_class: String,
    pub metadata: EntityMetadata,
}

/// Object metadata of an [`Entity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityMetadata {
    /// Entity name
    pub name: String,
    /// Resolved namespace
    pub namespace: String,
    pub labels: HashMap<String, String>,
}

/// Check section of a [`PostEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    /// Alert message
    pub output: String,
    /// 0 passing, 1 warning, 2 critical, 3 unknown
    pub status: i32,
    pub metadata: CheckMetadata,
    /// Unix seconds
    pub issued: i64,
    /// Unix seconds, equal to `issued`
    pub executed: i64,
    /// Resolved Sensu Go handlers
    pub handlers: Vec<String>,
}

/// Object metadata of a [`Check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckMetadata {
    /// Check name
    pub name: String,
    pub labels: HashMap<String, String>,
}

impl PostEvent {
    /// Build a proxy-entity event for `alert`, with the namespace and
    /// handlers already resolved against the service defaults.
    ///
    /// `issued` and `executed` are both set to `now`.
    #[must_use]
    pub fn new(
        alert: &AlertRequest<'_>,
        namespace: &str,
        handlers: &[String],
        now: DateTime<Utc>,
    ) -> Self {
        let timestamp = now.timestamp();

        Self {
            entity: Entity {
                entity_class: ENTITY_CLASS_PROXY.to_string(),
                metadata: EntityMetadata {
                    name: alert.entity.to_string(),
                    namespace: namespace.to_string(),
                    labels: alert.labels.clone(),
                },
            },
            check: Check {
                output: alert.message.to_string(),
                status: alert.level.status(),
                metadata: CheckMetadata {
                    name: alert.check.to_string(),
                    labels: alert.labels.clone(),
                },
                issued: timestamp,
                executed: timestamp,
                handlers: handlers.to_vec(),
            },
        }
    }
}
