#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # kafcfg
//!
//! Declarative creation of Kafka topics and ACLs.
//!
//! This library holds the binary's command layer; the domain lives in the
//! workspace crates it re-exports.

pub use kafcfg_admin;
pub use kafcfg_core;
pub use kafcfg_reconciler;

pub mod cli;
pub mod commands;
pub mod json;
