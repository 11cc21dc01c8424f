//! Sensu Go alert handler.
//!
//! This crate forwards alert events from an alerting engine to a Sensu Go
//! events API as proxy-entity check results.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use sensugo::{AlertHandler, Config, HandlerConfig, Service, TracingDiagnostic};
//!
//! # async fn run(event: sensugo::AlertEvent) {
//! let service = Arc::new(Service::new(
//!     Config {
//!         enabled: true,
//!         url: "http://sensu:8080/api/core/v2/namespaces/default/events".to_string(),
//!         token: "Key 0123abcd".to_string(),
//!         namespace: "default".to_string(),
//!         handlers: vec!["slack".to_string()],
//!     },
//!     Arc::new(TracingDiagnostic::new()),
//! ));
//!
//! let handler = service.handler(
//!     HandlerConfig {
//!         entity_tag: "host".to_string(),
//!         ..HandlerConfig::default()
//!     },
//!     &[("task", "cpu_alert")],
//! );
//!
//! // Failures are logged, never returned to the engine.
//! handler.handle(&event).await;
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`Service`] holds the hot-swappable [`Config`] and posts events
//! - [`Handler`] binds one route's [`HandlerConfig`] to the service and
//!   implements [`AlertHandler`]
//! - [`Diagnostic`] is the sink delivery failures are reported to;
//!   [`TracingDiagnostic`] writes them as `tracing` events

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod alert;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod event;
pub mod handler;
pub mod level;
pub mod service;

pub use alert::{AlertEvent, EventData, EventState};
pub use config::{Config, ConfigFile};
pub use diagnostic::{Diagnostic, TracingDiagnostic};
pub use error::{ConfigError, SensuError};
pub use event::PostEvent;
pub use handler::{AlertHandler, Handler, HandlerConfig};
pub use level::Level;
pub use service::{AlertRequest, Service, TestOptions, DEFAULT_TIMEOUT};
