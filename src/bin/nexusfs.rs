//! Nexusfs CLI Binary
//!
//! Command-line interface for browsing a repository manager as a filesystem.

use anyhow::Context;
use clap::Parser;
use nexusfs::logging::init_logging;
use nexusfs::tooling::cli::{Cli, CliContext};
use std::process;

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = cli.load_config().context("loading configuration")?;
    init_logging(Some(&config.logging)).context("initializing logging")?;

    let context = CliContext::new(&cli.root, &config)
        .with_context(|| format!("opening {:?}", config.endpoint))?;
    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
