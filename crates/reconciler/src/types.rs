//! Core types for the reconciler.

use std::fmt;

use serde::Serialize;

/// What a run does with the desired state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Report what would be created; never touches the network.
    Plan,
    /// Create everything against the cluster.
    Apply,
}

impl Mode {
    /// Plan when `plan` is set, apply otherwise.
    #[must_use]
    pub const fn from_plan_flag(plan: bool) -> Self {
        if plan { Self::Plan } else { Self::Apply }
    }

    /// Report tag, as in `[PLAN]`.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Plan => "PLAN",
            Self::Apply => "APPLY",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plan => f.write_str("plan"),
            Self::Apply => f.write_str("apply"),
        }
    }
}

/// The resource kind a reconciler manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Topics,
    Acls,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topics => f.write_str("topics"),
            Self::Acls => f.write_str("acls"),
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub kind: ResourceKind,
    pub mode: Mode,
    /// Work units processed: topics, or users with at least one rule.
    pub units: usize,
    /// Report entries emitted.
    pub entries: usize,
}
