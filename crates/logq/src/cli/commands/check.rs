//! Implementation of `logq check`.

use std::{path::PathBuf, process::ExitCode};

use logq_config::{Config, ConfigScope, ConfigWarning, discover_config_files};

use crate::cli::context::CommandContext;

/// Exit codes for `logq check`.
mod exit_codes {
    use std::process::ExitCode;

    /// Configuration is valid with no warnings.
    pub const OK: ExitCode = ExitCode::SUCCESS;
    /// Configuration has warnings but is usable.
    pub const WARNINGS: ExitCode = ExitCode::FAILURE;
    /// Configuration has errors and cannot be used.
    pub const ERROR: ExitCode = ExitCode::FAILURE;
}

/// Validates configuration files and reports problems.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let sources = discover_config_files(&ctx.cwd);

    println!("Checking configuration...");
    println!();

    if sources.is_empty() {
        println!("No configuration files found.");
        println!();
        println!("Run 'logq init' to create a configuration file.");
        return exit_codes::OK;
    }

    println!("Config files (highest precedence first):");
    for source in &sources {
        println!("  {} ({})", source.path.display(), source.scope);
    }
    if let Some(root) = sources.iter().find(|s| s.scope == ConfigScope::Root) {
        println!(
            "Lookup stopped at {}: parent directories and the global config are ignored.",
            root.path.display()
        );
    }
    println!();

    let config_files: Vec<PathBuf> = sources.into_iter().map(|s| s.path).collect();

    let config = match Config::load_from_files(&config_files) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return exit_codes::ERROR;
        }
    };

    println!("Parser:");
    println!("  default_field = {:?}", config.parser.default_field);
    println!("Output:");
    println!("  format = {}", config.output.format);
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return exit_codes::OK;
    }

    println!("Warnings ({}):", warnings.len());
    for warning in &warnings {
        println!("  - {warning}");
    }
    println!();

    print_hints(&warnings);

    exit_codes::WARNINGS
}

/// Prints hints for resolving warnings, without repeats.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings.iter().map(ConfigWarning::hint).collect();
    hints.sort_unstable();
    hints.dedup();

    if !hints.is_empty() {
        println!("Hints:");
        for hint in hints {
            println!("  - {hint}");
        }
    }
}
