//! Translation of configuration strings into the ACL vocabulary of the admin protocol.
//!
//! Every lookup upper-cases its input before matching, so `topic`, `Topic` and
//! `TOPIC` are equivalent. Unmatched input is an [`Error::UnknownEnumValue`]
//! naming the category and the raw string; nothing falls back to a default.
//!
//! The `code()` of each variant is the `INT8` value the broker expects on the wire.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{EnumCategory, Error};
use crate::model::AclRule;
use crate::result::Result;

/// Kind of resource an ACL applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    Topic,
    Group,
    Cluster,
}

impl ResourceType {
    /// Wire value of this resource type.
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::Topic => 2,
            Self::Group => 3,
            Self::Cluster => 4,
        }
    }

    /// Canonical configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Topic => "TOPIC",
            Self::Group => "GROUP",
            Self::Cluster => "CLUSTER",
        }
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.to_uppercase().as_str() {
            "TOPIC" => Ok(Self::Topic),
            "GROUP" => Ok(Self::Group),
            "CLUSTER" => Ok(Self::Cluster),
            _ => Err(Error::unknown_enum_value(EnumCategory::ResourceType, raw)),
        }
    }
}

/// How an ACL's resource name is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternType {
    Literal,
    Prefixed,
}

impl PatternType {
    /// Wire value of this pattern type.
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::Literal => 3,
            Self::Prefixed => 4,
        }
    }

    /// Canonical configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Literal => "LITERAL",
            Self::Prefixed => "PREFIXED",
        }
    }
}

impl FromStr for PatternType {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.to_uppercase().as_str() {
            "LITERAL" => Ok(Self::Literal),
            "PREFIXED" => Ok(Self::Prefixed),
            _ => Err(Error::unknown_enum_value(EnumCategory::PatternType, raw)),
        }
    }
}

/// Operation granted or denied by an ACL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AclOperation {
    All,
    Read,
    Write,
    Create,
    Delete,
    Alter,
    Describe,
    ClusterAction,
    DescribeConfigs,
    AlterConfigs,
    IdempotentWrite,
}

impl AclOperation {
    /// Wire value of this operation.
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::All => 2,
            Self::Read => 3,
            Self::Write => 4,
            Self::Create => 5,
            Self::Delete => 6,
            Self::Alter => 7,
            Self::Describe => 8,
            Self::ClusterAction => 9,
            Self::DescribeConfigs => 10,
            Self::AlterConfigs => 11,
            Self::IdempotentWrite => 12,
        }
    }

    /// Canonical configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Create => "CREATE",
            Self::Delete => "DELETE",
            Self::Alter => "ALTER",
            Self::Describe => "DESCRIBE",
            Self::ClusterAction => "CLUSTER_ACTION",
            Self::DescribeConfigs => "DESCRIBE_CONFIGS",
            Self::AlterConfigs => "ALTER_CONFIGS",
            Self::IdempotentWrite => "IDEMPOTENT_WRITE",
        }
    }
}

impl FromStr for AclOperation {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.to_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "READ" => Ok(Self::Read),
            "WRITE" => Ok(Self::Write),
            "CREATE" => Ok(Self::Create),
            "DELETE" => Ok(Self::Delete),
            "ALTER" => Ok(Self::Alter),
            "DESCRIBE" => Ok(Self::Describe),
            "CLUSTER_ACTION" => Ok(Self::ClusterAction),
            "DESCRIBE_CONFIGS" => Ok(Self::DescribeConfigs),
            "ALTER_CONFIGS" => Ok(Self::AlterConfigs),
            "IDEMPOTENT_WRITE" => Ok(Self::IdempotentWrite),
            _ => Err(Error::unknown_enum_value(EnumCategory::Operation, raw)),
        }
    }
}

/// Whether an ACL allows or denies its operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AclPermission {
    Any,
    Deny,
    Allow,
}

impl AclPermission {
    /// Wire value of this permission.
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::Any => 1,
            Self::Deny => 2,
            Self::Allow => 3,
        }
    }

    /// Canonical configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::Deny => "DENY",
            Self::Allow => "ALLOW",
        }
    }
}

impl FromStr for AclPermission {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.to_uppercase().as_str() {
            "ALLOW" => Ok(Self::Allow),
            "DENY" => Ok(Self::Deny),
            "ANY" => Ok(Self::Any),
            _ => Err(Error::unknown_enum_value(EnumCategory::Permission, raw)),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_str!(ResourceType, PatternType, AclOperation, AclPermission);

/// An [`AclRule`] with every enum field translated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAclRule {
    pub name: String,
    pub resource_type: ResourceType,
    pub pattern_type: PatternType,
    pub host: String,
    pub operation: AclOperation,
    pub permission: AclPermission,
}

impl ResolvedAclRule {
    /// Translate every enum field of `rule`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEnumValue`] for the first field that does not translate,
    /// checked in the order type, pattern, operation, permission.
    pub fn resolve(rule: &AclRule) -> Result<Self> {
        Ok(Self {
            name: rule.name.clone(),
            resource_type: rule.resource_type.parse()?,
            pattern_type: rule.pattern.parse()?,
            host: rule.host.clone(),
            operation: rule.operation.parse()?,
            permission: rule.permission.parse()?,
        })
    }
}
