//! Core types for kafcfg: the desired state of a Kafka cluster's topics and ACLs.
//!
//! - [`model`] - topics, ACL rules, roles and users as declared in YAML
//! - [`acl`] - translation of configuration strings into the admin protocol's ACL enums
//! - [`roles`] - expansion of a user's roles into concrete ACL rules
//! - [`document`] - YAML loading
//! - [`settings`] - cluster connection settings injected from the environment

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod acl;
pub mod document;
pub mod error;
pub mod model;
pub mod result;
pub mod roles;
pub mod settings;

pub use acl::{AclOperation, AclPermission, PatternType, ResolvedAclRule, ResourceType};
pub use error::{EnumCategory, Error};
pub use model::{AclConfig, AclRule, TopicConfig, TopicDefinition, TopicSpec, User};
pub use result::Result;
pub use roles::{UserGrants, expand_roles, expand_users};
pub use settings::{ClusterSettings, SaslSettings, TlsSettings};
