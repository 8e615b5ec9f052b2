//! Implementation of `logq parse`.

use std::process::ExitCode;

use logq_query::LogParser;
use tracing::debug;

use crate::cli::{args::ParseCommand, context::CommandContext, output::print_queries};

/// Parses each query and prints the results in the selected format.
///
/// Every query is attempted; the command fails if any of them does not parse.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let mut options = ctx.config.parser.options();
    if let Some(field) = &cmd.field {
        options.default_field.clone_from(field);
    }
    let format = cmd.output.format(ctx.config.output.format);
    debug!(default_field = %options.default_field, %format, "parsing queries");

    let parser = LogParser::with_options(options);
    let mut parsed = Vec::with_capacity(cmd.queries.len());
    let mut failed = false;

    for query in &cmd.queries {
        match parser.parse(query) {
            Ok(result) => parsed.push((query.as_str(), result)),
            Err(e) => {
                eprintln!("error: {e}");
                failed = true;
            }
        }
    }

    let code = print_queries(&parsed, format);
    if failed { ExitCode::FAILURE } else { code }
}
