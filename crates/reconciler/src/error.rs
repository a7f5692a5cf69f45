//! Error types for the reconciler crate.

use thiserror::Error;

use crate::admin::BrokerError;

/// Result type alias for reconciler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reconciler error types.
///
/// Every variant is fatal for the run: the first one raised stops all
/// remaining work.
#[derive(Debug, Error)]
pub enum Error {
    /// The desired state could not be loaded, validated or translated.
    #[error(transparent)]
    Config(#[from] kafcfg_core::Error),

    /// The cluster could not be reached or the controller discovered.
    #[error("connection error: {reason}")]
    Connection { reason: String },

    /// The broker rejected a topic creation.
    #[error("failed to create topic '{topic}': {cause}")]
    TopicCreationFailed { topic: String, cause: BrokerError },

    /// The broker rejected at least one entry of an ACL batch.
    #[error("failed to create ACLs for '{principal}': {cause}")]
    AclCreationFailed { principal: String, cause: BrokerError },

    /// A report entry could not be written.
    #[error("failed to write report: {reason}")]
    ReportFailed { reason: String },
}

impl Error {
    /// Create a connection error.
    pub fn connection(reason: impl Into<String>) -> Self {
        Self::Connection {
            reason: reason.into(),
        }
    }

    /// Create a topic creation error.
    pub fn topic_creation_failed(topic: impl Into<String>, cause: BrokerError) -> Self {
        Self::TopicCreationFailed {
            topic: topic.into(),
            cause,
        }
    }

    /// Create an ACL creation error.
    pub fn acl_creation_failed(principal: impl Into<String>, cause: BrokerError) -> Self {
        Self::AclCreationFailed {
            principal: principal.into(),
            cause,
        }
    }

    /// Create a report write error.
    pub fn report_failed(reason: impl Into<String>) -> Self {
        Self::ReportFailed {
            reason: reason.into(),
        }
    }

    /// Machine-readable error code (`SCREAMING_SNAKE_CASE`).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(inner) => inner.code(),
            Self::Connection { .. } => "CONNECTION_ERROR",
            Self::TopicCreationFailed { .. } => "TOPIC_CREATION_FAILED",
            Self::AclCreationFailed { .. } => "ACL_CREATION_FAILED",
            Self::ReportFailed { .. } => "REPORT_FAILED",
        }
    }

    /// Semantic process exit code.
    ///
    /// 1 = configuration, 2 = connection, 3 = broker rejection, 4 = other.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 1,
            Self::Connection { .. } => 2,
            Self::TopicCreationFailed { .. } | Self::AclCreationFailed { .. } => 3,
            Self::ReportFailed { .. } => 4,
        }
    }
}
