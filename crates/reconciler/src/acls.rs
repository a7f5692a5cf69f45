//! ACL reconciliation.
//!
//! Each user's roles are expanded and translated into one batch; the batch is
//! submitted as a single "create ACLs" request. Translation happens for every
//! user before anything is sent, so an unknown enum value never leaves a
//! half-applied document behind.

use async_trait::async_trait;
use itertools::Itertools;
use kafcfg_core::{AclConfig, ResolvedAclRule, expand_users};
use tracing::{debug, info, warn};

use crate::admin::{AclEntry, AdminClient, BrokerError};
use crate::error::{Error, Result};
use crate::reconciler::Reconcilable;
use crate::report::ReportEntry;
use crate::types::{Mode, ResourceKind};

/// One user's translated rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBatch {
    /// Key of the user in the `users` mapping.
    pub user: String,
    pub principal: String,
    pub rules: Vec<ResolvedAclRule>,
}

impl UserBatch {
    /// The wire entries of this batch, in rule order.
    #[must_use]
    pub fn entries(&self) -> Vec<AclEntry> {
        self.rules
            .iter()
            .map(|rule| AclEntry::new(&self.principal, rule))
            .collect_vec()
    }

    fn report(&self, mode: Mode) -> Vec<ReportEntry> {
        self.rules
            .iter()
            .map(|rule| ReportEntry::acl(mode, &self.principal, rule))
            .collect_vec()
    }
}

/// Creates the ACLs implied by an [`AclConfig`], one batch per user.
#[derive(Debug, Clone)]
pub struct AclReconciler {
    config: AclConfig,
}

impl AclReconciler {
    #[must_use]
    pub const fn new(config: AclConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Reconcilable for AclReconciler {
    type Unit = UserBatch;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Acls
    }

    fn units(&self) -> Result<Vec<UserBatch>> {
        let mut batches = Vec::with_capacity(self.config.users.len());

        for grants in expand_users(&self.config) {
            if grants.is_empty() {
                debug!(user = grants.user, principal = grants.principal, "User has no rules");
                continue;
            }

            let rules = grants
                .rules
                .iter()
                .map(|rule| ResolvedAclRule::resolve(rule))
                .collect::<kafcfg_core::Result<Vec<_>>>()
                .inspect_err(|e| {
                    warn!(user = grants.user, principal = grants.principal, error = %e, "Rejected ACL rule");
                })?;

            batches.push(UserBatch {
                user: grants.user.to_string(),
                principal: grants.principal.to_string(),
                rules,
            });
        }

        Ok(batches)
    }

    fn plan(&self, batch: &UserBatch) -> Vec<ReportEntry> {
        batch.report(Mode::Plan)
    }

    async fn apply(&self, admin: &mut dyn AdminClient, batch: &UserBatch) -> Result<Vec<ReportEntry>> {
        let entries = batch.entries();

        let results = admin.create_acls(&entries).await.map_err(|cause| match cause {
            BrokerError::Transport { reason } => Error::connection(reason),
            cause => Error::acl_creation_failed(&batch.principal, cause),
        })?;

        if results.len() != entries.len() {
            return Err(Error::acl_creation_failed(
                &batch.principal,
                BrokerError::malformed(format!(
                    "expected {} results, got {}",
                    entries.len(),
                    results.len()
                )),
            ));
        }

        if let Some(cause) = results.into_iter().flatten().next() {
            warn!(principal = %batch.principal, error = %cause, "Broker rejected ACL batch");
            return Err(Error::acl_creation_failed(&batch.principal, cause));
        }

        info!(user = %batch.user, principal = %batch.principal, acls = entries.len(), "Created ACLs");

        Ok(batch.report(Mode::Apply))
    }
}
