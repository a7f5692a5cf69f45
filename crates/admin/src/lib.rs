//! Kafka admin client for kafcfg.
//!
//! Implements the reconciler's [`kafcfg_reconciler::AdminConnector`] seam over
//! the Kafka wire protocol: plain TCP or TLS, optional SASL/PLAIN, controller
//! discovery through cluster metadata, and the `CreateTopics` and `CreateAcls`
//! requests.
//!
//! ```ignore
//! let connector = KafkaConnector::new(ClusterSettings::from_env()?)?;
//! let reconciler = Reconciler::new(Arc::new(connector));
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod client;
pub mod connection;
pub mod error;
#[cfg(test)]
mod fake_broker;
pub mod sasl;
pub mod tls;

pub use client::{KafkaConnector, KafkaSession};
pub use error::{Error, Result};
