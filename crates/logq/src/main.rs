//! Command-line interface for the `logq` query tool.
//!
//! `logq` parses log search queries and prints them in the canonical condition form, as an
//! AST tree, or as JSON. It also manages `.logq.toml` configuration files.

mod cli;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::{args::Cli, commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    commands::run(cli.command)
}
