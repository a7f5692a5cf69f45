//! Topic reconciliation.

use async_trait::async_trait;
use kafcfg_core::{TopicConfig, TopicSpec};
use tracing::{info, warn};

use crate::admin::{AdminClient, BrokerError, NewTopic};
use crate::error::{Error, Result};
use crate::reconciler::Reconcilable;
use crate::report::ReportEntry;
use crate::types::{Mode, ResourceKind};

/// Creates every topic of a [`TopicConfig`], one request per topic.
#[derive(Debug, Clone)]
pub struct TopicReconciler {
    config: TopicConfig,
}

impl TopicReconciler {
    #[must_use]
    pub const fn new(config: TopicConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Reconcilable for TopicReconciler {
    type Unit = TopicSpec;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Topics
    }

    fn units(&self) -> Result<Vec<TopicSpec>> {
        self.config
            .specs()
            .map(|spec| spec.validate().map(|()| spec))
            .collect::<kafcfg_core::Result<Vec<_>>>()
            .map_err(Error::from)
    }

    fn plan(&self, spec: &TopicSpec) -> Vec<ReportEntry> {
        vec![ReportEntry::topic(Mode::Plan, spec)]
    }

    async fn apply(&self, admin: &mut dyn AdminClient, spec: &TopicSpec) -> Result<Vec<ReportEntry>> {
        let request = NewTopic::from(spec);

        admin
            .create_topics(std::slice::from_ref(&request))
            .await
            .map_err(|cause| {
                warn!(topic = %spec.name, error = %cause, "Failed to create topic");
                match cause {
                    BrokerError::Transport { reason } => Error::connection(reason),
                    cause => Error::topic_creation_failed(&spec.name, cause),
                }
            })?;

        info!(
            topic = %spec.name,
            partitions = spec.partitions,
            replicas = spec.replicas,
            configs = spec.config.len(),
            "Created topic"
        );

        Ok(vec![ReportEntry::topic(Mode::Apply, spec)])
    }
}
