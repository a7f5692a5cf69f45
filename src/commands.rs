//! CLI command handlers.
//!
//! Loads the desired-state document, wires the reconciler to the Kafka admin
//! client and the selected report sink, and runs it.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use kafcfg_admin::KafkaConnector;
use kafcfg_core::{AclConfig, ClusterSettings, TopicConfig};
use kafcfg_reconciler::{
    AclReconciler, AdminClient, AdminConnector, BrokerError, JsonLinesSink, Mode, Reconciler,
    ReportSink, RunSummary, TextSink, TopicReconciler,
};
use tracing::debug;

use crate::cli::{Commands, OutputFormat};

/// Execute a CLI command against the cluster named by the environment.
///
/// Cluster settings are only read in apply mode; a plan never connects.
///
/// # Errors
///
/// Returns the first settings, document, connection, creation or output error.
pub async fn execute_command(command: &Commands) -> Result<RunSummary> {
    let connector: Arc<dyn AdminConnector> = match command.args().mode() {
        Mode::Plan => Arc::new(Offline),
        Mode::Apply => {
            let settings = ClusterSettings::from_env().context("Failed to read cluster settings")?;
            debug!(?settings, "Cluster settings");
            Arc::new(KafkaConnector::new(settings).context("Failed to configure admin client")?)
        }
    };

    let mut stdout = io::stdout();
    run(command, connector, &mut stdout).await
}

/// Connector for plan mode, which never opens a session.
#[derive(Debug)]
struct Offline;

#[async_trait]
impl AdminConnector for Offline {
    async fn connect(&self) -> std::result::Result<Box<dyn AdminClient>, BrokerError> {
        Err(BrokerError::transport("plan mode does not connect"))
    }
}

/// Execute a command with an explicit connector and output.
///
/// # Errors
///
/// Returns the first document, connection, creation or output error.
pub async fn run<W: Write>(
    command: &Commands,
    connector: Arc<dyn AdminConnector>,
    out: &mut W,
) -> Result<RunSummary> {
    let args = command.args();
    let mode = args.mode();
    let kind = command.kind();

    let mut sink: Box<dyn ReportSink + '_> = match args.format {
        OutputFormat::Text => Box::new(TextSink::new(out)),
        OutputFormat::Json => Box::new(JsonLinesSink::new(out)),
    };
    let reconciler = Reconciler::new(connector);
    let document = || format!("Failed to load {}", args.file.display());

    let summary = match command {
        Commands::Topics(_) => {
            let config = TopicConfig::load(&args.file).with_context(document)?;
            reconciler
                .run(&TopicReconciler::new(config), mode, sink.as_mut())
                .await
        }
        Commands::Acls(_) => {
            let config = AclConfig::load(&args.file).with_context(document)?;
            reconciler
                .run(&AclReconciler::new(config), mode, sink.as_mut())
                .await
        }
    };

    summary.with_context(|| format!("Failed to {mode} {kind}"))
}
