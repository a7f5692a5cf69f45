//! # kafcfg
//!
//! Entry point for the `kafcfg` binary.
//!
//! ## Output
//!
//! Report entries go to stdout, logs go to stderr. On failure the diagnostic is
//! written to stderr (as a JSON object with `--format json`) and the process
//! exits with the error's semantic exit code:
//!
//! | code | meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | configuration, validation or command-line usage error |
//! | 2 | connection error |
//! | 3 | broker rejected a request |
//! | 4 | anything else |

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use kafcfg::cli::{Cli, OutputFormat, usage_exit_code};
use kafcfg::commands::execute_command;
use kafcfg::json::{JsonError, classify};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(usage_exit_code(&err));
        }
    };
    init_tracing(cli.verbose);

    let format = cli.command.args().format;
    match execute_command(&cli.command).await {
        Ok(summary) => {
            debug!(?summary, "Run finished");
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_error(&err, format);
            let (_, exit_code) = classify(&err);
            ExitCode::from(u8::try_from(exit_code).unwrap_or(4))
        }
    }
}

/// Initialize tracing on stderr.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn report_error(err: &anyhow::Error, format: OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("Error: {err:#}"),
        OutputFormat::Json => match JsonError::from_anyhow(err).to_json() {
            Ok(json) => eprintln!("{json}"),
            Err(e) => eprintln!("Error: {err:#} (failed to serialize error: {e})"),
        },
    }
}
