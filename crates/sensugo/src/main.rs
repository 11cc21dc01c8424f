//! sensugo CLI - send alert events to a Sensu Go backend.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sensugo::{AlertEvent, AlertHandler, ConfigFile, Level, Service, TracingDiagnostic};

/// Forward alert events to a Sensu Go events API.
#[derive(Parser)]
#[command(name = "sensugo")]
#[command(about = "Forward alert events to a Sensu Go events API")]
#[command(version)]
pub struct Cli {
    /// Config file with a [sensugo] table and an optional [handler] table
    #[arg(short, long, default_value = "./sensugo.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a canned test event and report whether it was delivered
    Test {
        /// Check name
        #[arg(long)]
        check: Option<String>,

        /// Entity name
        #[arg(long)]
        entity: Option<String>,

        /// Check output
        #[arg(long)]
        message: Option<String>,

        /// Namespace, empty for the configured default
        #[arg(long)]
        namespace: Option<String>,

        /// Sensu Go handler (repeatable)
        #[arg(long = "handler")]
        handlers: Vec<String>,

        /// Alert level (OK, INFO, WARNING, CRITICAL)
        #[arg(long)]
        level: Option<Level>,
    },

    /// Route an alert event through the [handler] options
    Send {
        /// Event JSON file, `-` for stdin
        #[arg(long, default_value = "-")]
        event: String,
    },
}

fn read_event(source: &str) -> Result<AlertEvent> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read event file {source}"))?
    };

    serde_json::from_str(&raw).context("Failed to parse alert event")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("sensugo=debug,info")
    } else {
        EnvFilter::new("sensugo=info,warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let file = ConfigFile::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    let service = Arc::new(Service::new(
        file.sensugo,
        Arc::new(TracingDiagnostic::new()),
    ));
    service.open()?;

    match cli.command {
        Commands::Test {
            check,
            entity,
            message,
            namespace,
            handlers,
            level,
        } => {
            let mut options = service.test_options();
            if let Some(check) = check {
                options.check = check;
            }
            if let Some(entity) = entity {
                options.entity = entity;
            }
            if let Some(message) = message {
                options.message = message;
            }
            if let Some(namespace) = namespace {
                options.namespace = namespace;
            }
            if !handlers.is_empty() {
                options.handlers = handlers;
            }
            if let Some(level) = level {
                options.level = level;
            }

            service
                .test(&options)
                .await
                .context("Test event was not delivered")?;
            info!(check = %options.check, "Test event sent");
        }

        Commands::Send { event } => {
            let event = read_event(&event)?;
            let handler = service.handler(file.handler, &[("source", "cli")]);
            handler.handle(&event).await;
            info!(check = %event.state.id, "Event handled");
        }
    }

    service.close()?;
    Ok(())
}
