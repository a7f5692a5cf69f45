//! Plan/apply reconciliation of Kafka topics and ACLs.
//!
//! This crate turns a desired state into either a plan report or a series of
//! create requests:
//!
//! - **Desired State**: a [`kafcfg_core::TopicConfig`] or [`kafcfg_core::AclConfig`]
//! - **Units**: independent pieces of work (one topic, one user's ACL batch)
//! - **Plan**: report each unit without touching the network
//! - **Apply**: open one admin session, create each unit, report what was created
//!
//! There is no diff against existing cluster state; every unit is created.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use kafcfg_reconciler::{Mode, Reconciler, TextSink, TopicReconciler};
//!
//! let reconciler = Reconciler::new(Arc::new(connector));
//! let mut sink = TextSink::new(std::io::stdout());
//! let summary = reconciler
//!     .run(&TopicReconciler::new(config), Mode::Plan, &mut sink)
//!     .await?;
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod acls;
pub mod admin;
pub mod error;
pub mod reconciler;
pub mod report;
pub mod topics;
pub mod types;

// Re-export main types
pub use acls::{AclReconciler, UserBatch};
pub use admin::{AclEntry, AdminClient, AdminConnector, BrokerError, NewTopic};
pub use error::{Error, Result};
pub use reconciler::{Reconcilable, Reconciler};
pub use report::{AclReport, JsonLinesSink, ReportEntry, ReportResource, ReportSink, TextSink, TopicReport};
pub use topics::TopicReconciler;
pub use types::{Mode, ResourceKind, RunSummary};
