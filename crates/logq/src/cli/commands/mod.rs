//! Command implementations and dispatch.

pub mod check;
pub mod config;
pub mod init;
pub mod parse;
pub mod tokens;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
///
/// `tokens` needs no context. `init` and `check` must work with a broken config, so they
/// skip loading it.
pub fn run(command: Commands) -> ExitCode {
    match command {
        Commands::Tokens(cmd) => tokens::run(&cmd),
        Commands::Parse(cmd) => with_context(CommandContext::load(), |ctx| parse::run(ctx, &cmd)),
        Commands::Config => with_context(CommandContext::load(), config::run),
        Commands::Init(cmd) => {
            with_context(CommandContext::load_cwd_only(), |ctx| init::run(ctx, &cmd))
        }
        Commands::Check => with_context(CommandContext::load_cwd_only(), check::run),
    }
}

/// Runs `command` with a loaded context, or returns the exit code of the failed load.
fn with_context(
    ctx: Result<CommandContext, ExitCode>,
    command: impl FnOnce(&CommandContext) -> ExitCode,
) -> ExitCode {
    match ctx {
        Ok(ctx) => command(&ctx),
        Err(code) => code,
    }
}
