//! Role expansion: user -> roles -> ACL rules.

use std::collections::BTreeMap;

use itertools::Itertools;
use tracing::debug;

use crate::model::{AclConfig, AclRule, User};

/// The flattened rule set of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserGrants<'a> {
    /// Key of the user in the `users` mapping.
    pub user: &'a str,
    pub principal: &'a str,
    pub rules: Vec<&'a AclRule>,
}

impl UserGrants<'_> {
    /// Whether the user's roles imply no rules at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Expand a user's roles into the rules they imply.
///
/// Rules are concatenated in the user's role order, each role contributing its
/// rules in registered order. Duplicates are kept. A role missing from `roles`
/// contributes nothing.
#[must_use]
pub fn expand_roles<'a>(roles: &'a BTreeMap<String, Vec<AclRule>>, user: &User) -> Vec<&'a AclRule> {
    user.roles
        .iter()
        .flat_map(|role| match roles.get(role) {
            Some(rules) => rules.as_slice(),
            None => {
                debug!(principal = %user.principal, role = %role, "Role not defined, skipping");
                &[][..]
            }
        })
        .collect_vec()
}

/// Expand every user of `config`, in user-key order.
#[must_use]
pub fn expand_users(config: &AclConfig) -> Vec<UserGrants<'_>> {
    config
        .users
        .iter()
        .map(|(key, user)| UserGrants {
            user: key.as_str(),
            principal: user.principal.as_str(),
            rules: expand_roles(&config.roles, user),
        })
        .collect_vec()
}
