//! Desired-state model: topics, ACL rules, roles and users.
//!
//! Every mapping is a `BTreeMap`, so iteration is lexicographic by key and
//! reports come out in a stable order from run to run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::result::Result;

/// Settings for one topic as written under `topics:`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicDefinition {
    pub partitions: i32,
    pub replicas: i16,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

/// A topic to create, keyed by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicSpec {
    pub name: String,
    pub partitions: i32,
    pub replicas: i16,
    pub config: BTreeMap<String, String>,
}

impl TopicSpec {
    /// Create a topic spec with no configuration entries.
    pub fn new(name: impl Into<String>, partitions: i32, replicas: i16) -> Self {
        Self {
            name: name.into(),
            partitions,
            replicas,
            config: BTreeMap::new(),
        }
    }

    /// Add a configuration entry.
    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Check the locally enforceable invariants.
    ///
    /// Whether `replicas` fits the number of brokers is left to the broker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTopic`] for an empty name or a non-positive count.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_topic(&self.name, "name must not be empty"));
        }
        if self.partitions <= 0 {
            return Err(Error::invalid_topic(
                &self.name,
                format!("partitions must be positive, got {}", self.partitions),
            ));
        }
        if self.replicas <= 0 {
            return Err(Error::invalid_topic(
                &self.name,
                format!("replicas must be positive, got {}", self.replicas),
            ));
        }
        Ok(())
    }
}

/// The `topics` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfig {
    #[serde(default)]
    pub topics: BTreeMap<String, TopicDefinition>,
}

impl TopicConfig {
    /// Topic specs in name order.
    pub fn specs(&self) -> impl Iterator<Item = TopicSpec> + '_ {
        self.topics.iter().map(|(name, def)| TopicSpec {
            name: name.clone(),
            partitions: def.partitions,
            replicas: def.replicas,
            config: def.config.clone(),
        })
    }

    /// Validate every topic.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::InvalidTopic`] found, in name order.
    pub fn validate(&self) -> Result<()> {
        self.specs().try_for_each(|spec| spec.validate())
    }

    /// Number of topics declared.
    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Whether no topics are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

/// One ACL rule inside a role, with its enum fields still in configuration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclRule {
    /// Resource name the ACL matches.
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub pattern: String,
    pub host: String,
    pub operation: String,
    pub permission: String,
}

/// A principal and the roles it holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub principal: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// The `acls` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclConfig {
    #[serde(default)]
    pub roles: BTreeMap<String, Vec<AclRule>>,
    #[serde(default)]
    pub users: BTreeMap<String, User>,
}
