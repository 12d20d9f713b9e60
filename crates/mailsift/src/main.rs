//! `mailsift` - search a mail store and extract matching emails to JSON.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match extract(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn extract(cli: Cli) -> Result<()> {
    let config = cli.into_config()?;
    debug!("Running with {:?}", config);

    let report = mailsift_core::run(&config)?;
    println!(
        "Successfully extracted {} emails to '{}'.",
        report.written,
        report.output_path.display()
    );
    Ok(())
}

/// Logs go to stderr so stdout carries only the result line.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "mailsift=debug,mailsift_core=debug"
    } else {
        "mailsift=info,mailsift_core=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
