//! CLI command definitions using clap.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use kafcfg_reconciler::{Mode, ResourceKind};

/// kafcfg - declarative Kafka topics and ACLs
#[derive(Parser, Debug)]
#[command(name = "kafcfg")]
#[command(version)]
#[command(about = "Create Kafka topics and ACLs from a YAML document")]
#[command(
    long_about = "kafcfg reads a desired-state document and either reports what it would create (--plan) or creates every topic or ACL it describes. Cluster connection settings come from KAFKA_* environment variables."
)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Exit status for a failed parse: 0 for `--help` and `--version`, 1 for
/// usage errors, which count as configuration errors.
#[must_use]
pub fn usage_exit_code(err: &clap::Error) -> u8 {
    u8::from(err.use_stderr())
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the topics described by a topics document
    Topics(RunArgs),

    /// Create the ACLs described by a roles/users document
    Acls(RunArgs),
}

impl Commands {
    /// Resource kind this command manages.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Topics(_) => ResourceKind::Topics,
            Self::Acls(_) => ResourceKind::Acls,
        }
    }

    /// Arguments shared by every command.
    #[must_use]
    pub const fn args(&self) -> &RunArgs {
        match self {
            Self::Topics(args) | Self::Acls(args) => args,
        }
    }
}

/// Arguments shared by `topics` and `acls`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Desired-state YAML document
    #[arg(short, long = "file", value_name = "FILE")]
    pub file: PathBuf,

    /// Report what would be created without contacting the cluster
    #[arg(long, default_value_t = false)]
    pub plan: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl RunArgs {
    /// Run mode selected by `--plan`.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        Mode::from_plan_flag(self.plan)
    }
}

/// How report entries and errors are written.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable blocks
    #[default]
    Text,
    /// One JSON object per line
    Json,
}
