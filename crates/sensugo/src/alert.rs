//! Alert events received from the alerting engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::level::Level;

/// One alert event as handed to a route handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub state: EventState,
    #[serde(default)]
    pub data: EventData,
}

/// State of the alert that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventState {
    /// Alert identifier, used as the check name
    pub id: String,
    #[serde(default)]
    pub message: String,
    pub level: Level,
}

/// Data the alert was evaluated on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_event() {
        let event: AlertEvent = serde_json::from_str(
            r#"{
                "state": { "id": "cpu:host=db1", "message": "cpu is high", "level": "CRITICAL" },
                "data": { "tags": { "host": "db1" } }
            }"#,
        )
        .unwrap();

        assert_eq!(event.state.id, "cpu:host=db1");
        assert_eq!(event.state.level, Level::Critical);
        assert_eq!(event.data.tags.get("host").map(String::as_str), Some("db1"));
    }

    #[test]
    fn test_data_is_optional() {
        let event: AlertEvent =
            serde_json::from_str(r#"{ "state": { "id": "cpu", "level": "ok" } }"#).unwrap();

        assert!(event.state.message.is_empty());
        assert!(event.data.tags.is_empty());
    }
}
