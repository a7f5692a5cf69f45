//! Report entries and the sinks that render them.
//!
//! Text rendering keeps the block layout operators already grep for:
//!
//! ```text
//! -----------------------
//! [PLAN] Create Topic
//!   -  Topic: orders
//!   -  Partitions: 3
//!   -  Replicas: 2
//!   -  Config:
//!   -  retention.ms: 3600000
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

use kafcfg_core::{AclOperation, AclPermission, PatternType, ResolvedAclRule, ResourceType, TopicSpec};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::Mode;

const SEPARATOR: &str = "-----------------------";

/// A topic as reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicReport {
    pub topic: String,
    pub partitions: i32,
    pub replicas: i16,
    pub config: BTreeMap<String, String>,
}

/// An ACL as reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AclReport {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub principal: String,
    pub pattern: PatternType,
    pub host: String,
    pub operation: AclOperation,
    pub permission: AclPermission,
}

/// What a report entry is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "resource", rename_all = "lowercase")]
pub enum ReportResource {
    Topic(TopicReport),
    Acl(AclReport),
}

/// One planned or applied creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub mode: Mode,
    #[serde(flatten)]
    pub resource: ReportResource,
}

impl ReportEntry {
    /// Entry for a topic.
    #[must_use]
    pub fn topic(mode: Mode, spec: &TopicSpec) -> Self {
        Self {
            mode,
            resource: ReportResource::Topic(TopicReport {
                topic: spec.name.clone(),
                partitions: spec.partitions,
                replicas: spec.replicas,
                config: spec.config.clone(),
            }),
        }
    }

    /// Entry for an ACL rule bound to `principal`.
    #[must_use]
    pub fn acl(mode: Mode, principal: &str, rule: &ResolvedAclRule) -> Self {
        Self {
            mode,
            resource: ReportResource::Acl(AclReport {
                name: rule.name.clone(),
                resource_type: rule.resource_type,
                principal: principal.to_string(),
                pattern: rule.pattern_type,
                host: rule.host.clone(),
                operation: rule.operation,
                permission: rule.permission,
            }),
        }
    }

    fn headline(&self) -> String {
        let noun = match self.resource {
            ReportResource::Topic(_) => "Topic",
            ReportResource::Acl(_) => "ACL",
        };
        match self.mode {
            Mode::Plan => format!("[{}] Create {noun}", self.mode.tag()),
            Mode::Apply => format!("[{}] Created {noun}", self.mode.tag()),
        }
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{SEPARATOR}")?;
        writeln!(f, "{}", self.headline())?;
        match &self.resource {
            ReportResource::Topic(topic) => {
                writeln!(f, "  -  Topic: {}", topic.topic)?;
                writeln!(f, "  -  Partitions: {}", topic.partitions)?;
                writeln!(f, "  -  Replicas: {}", topic.replicas)?;
                if !topic.config.is_empty() {
                    writeln!(f, "  -  Config:")?;
                    for (key, value) in &topic.config {
                        writeln!(f, "  -  {key}: {value}")?;
                    }
                }
            }
            ReportResource::Acl(acl) => {
                writeln!(f, "  -  Name: {}", acl.name)?;
                writeln!(f, "  -  Type: {}", acl.resource_type)?;
                writeln!(f, "  -  Principal: {}", acl.principal)?;
                writeln!(f, "  -  Pattern: {}", acl.pattern)?;
                writeln!(f, "  -  Host: {}", acl.host)?;
                writeln!(f, "  -  Operation: {}", acl.operation)?;
                writeln!(f, "  -  Permission: {}", acl.permission)?;
            }
        }
        Ok(())
    }
}

/// Destination for report entries, written as the run progresses.
pub trait ReportSink {
    /// Emit one entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReportFailed`] if the entry cannot be written.
    fn emit(&mut self, entry: &ReportEntry) -> Result<()>;
}

/// Collects entries in memory.
impl ReportSink for Vec<ReportEntry> {
    fn emit(&mut self, entry: &ReportEntry) -> Result<()> {
        self.push(entry.clone());
        Ok(())
    }
}

/// Renders entries as text blocks.
pub struct TextSink<W> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn emit(&mut self, entry: &ReportEntry) -> Result<()> {
        write!(self.out, "{entry}")
            .and_then(|()| self.out.flush())
            .map_err(|e| Error::report_failed(e.to_string()))
    }
}

/// Renders entries as one JSON object per line.
pub struct JsonLinesSink<W> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonLinesSink<W> {
    fn emit(&mut self, entry: &ReportEntry) -> Result<()> {
        serde_json::to_writer(&mut self.out, entry).map_err(|e| Error::report_failed(e.to_string()))?;
        writeln!(self.out)
            .and_then(|()| self.out.flush())
            .map_err(|e| Error::report_failed(e.to_string()))
    }
}
