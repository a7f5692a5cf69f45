//! Reconciler implementation.
//!
//! One plan/apply state machine, shared by every resource kind:
//!
//! ```text
//! Start -> units() -> Plan  -> plan(unit) for each unit          -> Finished
//!                  -> Apply -> connect -> apply(unit) for each unit -> Finished
//! ```
//!
//! Units are processed strictly in order and the first error ends the run.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::admin::{AdminClient, AdminConnector};
use crate::error::{Error, Result};
use crate::report::{ReportEntry, ReportSink};
use crate::types::{Mode, ResourceKind, RunSummary};

/// A resource kind that can be planned and applied.
#[async_trait]
pub trait Reconcilable: Send + Sync {
    /// One independent piece of work: a topic, or one user's ACL batch.
    type Unit: Send + Sync;

    /// The resource kind, for logging and summaries.
    fn kind(&self) -> ResourceKind;

    /// Validate and translate the desired state into ordered work units.
    ///
    /// Runs before any network I/O in both modes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the desired state is invalid.
    fn units(&self) -> Result<Vec<Self::Unit>>;

    /// Describe what applying `unit` would create.
    fn plan(&self, unit: &Self::Unit) -> Vec<ReportEntry>;

    /// Create `unit` on the cluster and describe what was created.
    ///
    /// # Errors
    ///
    /// Returns a connection or creation error.
    async fn apply(&self, admin: &mut dyn AdminClient, unit: &Self::Unit) -> Result<Vec<ReportEntry>>;
}

/// Runs [`Reconcilable`] resources in plan or apply mode.
pub struct Reconciler {
    connector: Arc<dyn AdminConnector>,
}

impl Reconciler {
    /// Create a reconciler that opens admin sessions through `connector`.
    pub fn new(connector: Arc<dyn AdminConnector>) -> Self {
        Self { connector }
    }

    /// Reconcile `resource`, streaming report entries into `sink`.
    ///
    /// Plan mode never calls the connector. Apply mode opens exactly one
    /// session, which is dropped before this returns on every path.
    ///
    /// # Errors
    ///
    /// Returns the first configuration, connection, creation or report error.
    pub async fn run<R: Reconcilable>(
        &self,
        resource: &R,
        mode: Mode,
        sink: &mut dyn ReportSink,
    ) -> Result<RunSummary> {
        let kind = resource.kind();
        let units = resource.units()?;

        info!(kind = %kind, mode = %mode, units = units.len(), "Starting reconciliation");

        let entries = match mode {
            Mode::Plan => Self::plan_all(resource, &units, sink)?,
            Mode::Apply => self.apply_all(resource, &units, sink).await?,
        };

        info!(kind = %kind, mode = %mode, entries, "Reconciliation complete");

        Ok(RunSummary {
            kind,
            mode,
            units: units.len(),
            entries,
        })
    }

    fn plan_all<R: Reconcilable>(
        resource: &R,
        units: &[R::Unit],
        sink: &mut dyn ReportSink,
    ) -> Result<usize> {
        let mut emitted = 0;
        for unit in units {
            emitted += emit_all(sink, &resource.plan(unit))?;
        }
        Ok(emitted)
    }

    async fn apply_all<R: Reconcilable>(
        &self,
        resource: &R,
        units: &[R::Unit],
        sink: &mut dyn ReportSink,
    ) -> Result<usize> {
        if units.is_empty() {
            debug!(kind = %resource.kind(), "Nothing to apply, skipping connection");
            return Ok(0);
        }

        let mut admin = self
            .connector
            .connect()
            .await
            .map_err(|e| Error::connection(e.to_string()))?;

        let mut emitted = 0;
        for unit in units {
            let entries = resource.apply(admin.as_mut(), unit).await?;
            emitted += emit_all(sink, &entries)?;
        }
        Ok(emitted)
    }
}

fn emit_all(sink: &mut dyn ReportSink, entries: &[ReportEntry]) -> Result<usize> {
    entries.iter().try_for_each(|entry| sink.emit(entry))?;
    Ok(entries.len())
}
