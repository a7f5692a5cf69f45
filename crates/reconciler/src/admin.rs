//! The seam between reconciliation and the cluster.
//!
//! The reconciler only ever talks to an [`AdminConnector`], and only in apply
//! mode. A connector hands out one [`AdminClient`] session per run; the session
//! owns its network connections and releases them when dropped, whichever way
//! the run ends.

use async_trait::async_trait;
use kafcfg_core::{AclOperation, AclPermission, PatternType, ResolvedAclRule, ResourceType, TopicSpec};
use thiserror::Error;

/// Failure reported by the admin client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// The request never got a usable answer.
    #[error("transport error: {reason}")]
    Transport { reason: String },

    /// The broker answered with a non-zero error code.
    #[error("broker error {code}: {message}")]
    Rejected { code: i16, message: String },

    /// The broker answered with something that does not match the request.
    #[error("malformed response: {reason}")]
    Malformed { reason: String },
}

impl BrokerError {
    /// Create a transport error.
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Create a rejection error.
    pub fn rejected(code: i16, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }

    /// Create a malformed response error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

/// A "create topic" request entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopic {
    pub name: String,
    pub partitions: i32,
    pub replication_factor: i16,
    pub configs: Vec<(String, String)>,
}

impl From<&TopicSpec> for NewTopic {
    fn from(spec: &TopicSpec) -> Self {
        Self {
            name: spec.name.clone(),
            partitions: spec.partitions,
            replication_factor: spec.replicas,
            configs: spec
                .config
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

/// A "create ACL" request entry, in wire vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclEntry {
    pub resource_type: ResourceType,
    pub resource_name: String,
    pub pattern_type: PatternType,
    pub principal: String,
    pub host: String,
    pub operation: AclOperation,
    pub permission: AclPermission,
}

impl AclEntry {
    /// Bind a resolved rule to a principal.
    pub fn new(principal: impl Into<String>, rule: &ResolvedAclRule) -> Self {
        Self {
            resource_type: rule.resource_type,
            resource_name: rule.name.clone(),
            pattern_type: rule.pattern_type,
            principal: principal.into(),
            host: rule.host.clone(),
            operation: rule.operation,
            permission: rule.permission,
        }
    }
}

/// An open admin session against the cluster.
#[async_trait]
pub trait AdminClient: Send {
    /// Create topics.
    ///
    /// # Errors
    ///
    /// Returns the first failure, request-level or per topic.
    async fn create_topics(&mut self, topics: &[NewTopic]) -> Result<(), BrokerError>;

    /// Create ACL entries in one batch.
    ///
    /// Returns one slot per entry, in request order; `None` means created.
    ///
    /// # Errors
    ///
    /// Returns an error if the request as a whole failed.
    async fn create_acls(
        &mut self,
        entries: &[AclEntry],
    ) -> Result<Vec<Option<BrokerError>>, BrokerError>;
}

/// Opens admin sessions.
#[async_trait]
pub trait AdminConnector: Send + Sync {
    /// Dial the cluster, discover the controller, and return a ready session.
    ///
    /// # Errors
    ///
    /// Returns an error if no broker or controller could be reached.
    async fn connect(&self) -> Result<Box<dyn AdminClient>, BrokerError>;
}
