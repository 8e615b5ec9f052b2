//! Implementation of `logq init`.

use std::{fs, process::ExitCode};

use logq_config::{CONFIG_FILENAME, ConfigError, TemplateKind, global_config_path, template};

use crate::cli::{args::InitCommand, context::CommandContext};

/// Initializes a `.logq.toml` configuration file.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let cwd = &ctx.cwd;

    let is_home_dir = global_config_path()
        .and_then(|p| p.parent().map(|h| h == cwd))
        .unwrap_or(false);

    let use_global = cmd.global || is_home_dir;

    let config_path = if use_global {
        match global_config_path() {
            Some(path) => path,
            None => {
                eprintln!("error: {}", ConfigError::NoHomeDirectory);
                return ExitCode::FAILURE;
            }
        }
    } else {
        cwd.join(CONFIG_FILENAME)
    };

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let kind = if use_global {
        TemplateKind::Global
    } else {
        TemplateKind::Project
    };
    let template = match template(kind) {
        Ok(template) => template,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = fs::write(&config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!("Created {}", config_path.display());
    println!();
    println!("Configuration written:");
    for line in template.lines() {
        println!("  {line}");
    }

    ExitCode::SUCCESS
}
